use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use sharebook_core::{DomainResult, EmailAddress, Entity, SoftDelete, UserId};

/// A registered user: the principal identity tokens are issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    /// Lowercased at creation; unique among active users.
    pub email: String,
    /// Password verification material (PHC string), never the plaintext.
    pub password_hash: String,
    pub name: String,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(
        email: EmailAddress,
        password_hash: String,
        name: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UserId::new(),
            email: email.as_str().to_string(),
            password_hash,
            name,
            profile_image: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            profile_image: self.profile_image.clone(),
        }
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl SoftDelete for User {
    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    fn mark_deleted(&mut self, at: DateTime<Utc>) {
        self.deleted_at.get_or_insert(at);
    }
}

/// Public view of a user, safe to embed in responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub profile_image: Option<String>,
}

/// User records keyed by id and email.
///
/// Every lookup only ever sees active (non soft-deleted) users.
pub trait PrincipalStore: Send + Sync {
    /// `email` must already be normalized.
    fn find_by_email(&self, email: &str) -> DomainResult<Option<User>>;
    fn find_by_id(&self, id: UserId) -> DomainResult<Option<User>>;
    fn exists_by_email(&self, email: &str) -> DomainResult<bool>;
    /// Active users among `ids`; unknown or deleted ids are skipped.
    fn find_many(&self, ids: &[UserId]) -> DomainResult<Vec<User>>;
    /// Insert or replace by id.
    fn save(&self, user: User) -> DomainResult<()>;
    /// Apply `change` to the user while it is still active and return the
    /// result. `None` when the user is unknown or deleted; nothing is written.
    fn update_active(
        &self,
        id: UserId,
        change: &mut dyn FnMut(&mut User),
    ) -> DomainResult<Option<User>>;
}

impl<S> PrincipalStore for Arc<S>
where
    S: PrincipalStore + ?Sized,
{
    fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        (**self).find_by_email(email)
    }

    fn find_by_id(&self, id: UserId) -> DomainResult<Option<User>> {
        (**self).find_by_id(id)
    }

    fn exists_by_email(&self, email: &str) -> DomainResult<bool> {
        (**self).exists_by_email(email)
    }

    fn find_many(&self, ids: &[UserId]) -> DomainResult<Vec<User>> {
        (**self).find_many(ids)
    }

    fn save(&self, user: User) -> DomainResult<()> {
        (**self).save(user)
    }

    fn update_active(
        &self,
        id: UserId,
        change: &mut dyn FnMut(&mut User),
    ) -> DomainResult<Option<User>> {
        (**self).update_active(id, change)
    }
}
