//! Profile operations on the signed-in user.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use sharebook_auth::{
    PasswordVerifier, PrincipalStore, RefreshTokenStore, TokenLifecycleManager, User,
};
use sharebook_core::{DomainError, DomainResult, SoftDelete, UserId, Validator};

pub const NAME_MAX_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            profile_image: u.profile_image,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Partial update: `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub profile_image: Option<String>,
}

pub struct UserService<P, R, H> {
    principals: P,
    lifecycle: Arc<TokenLifecycleManager<R, P>>,
    passwords: H,
    min_password_length: usize,
}

impl<P, R, H> UserService<P, R, H>
where
    P: PrincipalStore,
    R: RefreshTokenStore,
    H: PasswordVerifier,
{
    pub fn new(
        principals: P,
        lifecycle: Arc<TokenLifecycleManager<R, P>>,
        passwords: H,
        min_password_length: usize,
    ) -> Self {
        Self {
            principals,
            lifecycle,
            passwords,
            min_password_length,
        }
    }

    pub fn get_profile(&self, user_id: UserId) -> DomainResult<UserProfile> {
        let user = self.require(user_id)?;
        tracing::debug!(user_id = %user_id, "profile read");
        Ok(user.into())
    }

    pub fn update_profile(
        &self,
        user_id: UserId,
        input: UpdateProfile,
    ) -> DomainResult<UserProfile> {
        let mut v = Validator::new();
        v.optional_nonblank("name", input.name.as_deref(), NAME_MAX_LEN);
        v.finish()?;

        let name = input.name.map(|n| n.trim().to_string());
        let now = Utc::now();
        let user = self.update(user_id, &mut |user| {
            if let Some(name) = &name {
                user.name = name.clone();
            }
            if let Some(image) = &input.profile_image {
                user.profile_image = Some(image.clone());
            }
            user.updated_at = now;
        })?;

        tracing::info!(user_id = %user_id, "profile updated");
        Ok(user.into())
    }

    pub fn change_password(&self, user_id: UserId, current: &str, new: &str) -> DomainResult<()> {
        let mut v = Validator::new();
        if current.is_empty() {
            v.push("current_password", "Current password is required");
        }
        if new.is_empty() {
            v.push("new_password", "New password is required");
        } else {
            v.min_length("new_password", new, self.min_password_length);
        }
        v.finish()?;

        let user = self.require(user_id)?;
        if !self.passwords.verify(current, &user.password_hash)? {
            return Err(DomainError::bad_request("Current password is incorrect"));
        }

        let hash = self.passwords.hash(new)?;
        let now = Utc::now();
        self.update(user_id, &mut |user| {
            user.password_hash = hash.clone();
            user.updated_at = now;
        })?;

        tracing::info!(user_id = %user_id, "password changed");
        Ok(())
    }

    /// Soft delete the account and revoke its refresh tokens.
    pub fn delete(&self, user_id: UserId) -> DomainResult<()> {
        let now = Utc::now();
        self.update(user_id, &mut |user| user.mark_deleted(now))?;
        self.lifecycle.revoke_all(user_id)?;

        tracing::info!(user_id = %user_id, "user deleted");
        Ok(())
    }

    fn require(&self, user_id: UserId) -> DomainResult<User> {
        self.principals
            .find_by_id(user_id)?
            .ok_or_else(|| DomainError::not_found("User not found"))
    }

    /// Write through the store's guarded update so a concurrent delete is
    /// never undone.
    fn update(&self, user_id: UserId, change: &mut dyn FnMut(&mut User)) -> DomainResult<User> {
        self.principals
            .update_active(user_id, change)?
            .ok_or_else(|| DomainError::not_found("User not found"))
    }
}
