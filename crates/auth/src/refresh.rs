use std::sync::Arc;

use chrono::{DateTime, Utc};

use sharebook_core::{DomainResult, RefreshTokenId, UserId};

/// Persisted record of an issued refresh token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshToken {
    pub id: RefreshTokenId,
    pub user_id: UserId,
    /// The signed token string as handed to the client. Unique.
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    pub fn new(
        user_id: UserId,
        token: String,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RefreshTokenId::new(),
            user_id,
            token,
            expires_at,
            created_at: now,
            revoked_at: None,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Valid means not revoked and not past expiry.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.is_revoked() && !self.is_expired(now)
    }
}

/// Store of issued refresh tokens.
///
/// `consume_valid` is the only way rotation reads a token: it checks validity
/// and revokes in one step, so a token value can be consumed at most once no
/// matter how many callers race on it.
pub trait RefreshTokenStore: Send + Sync {
    /// Fails when the token string is already stored.
    fn insert(&self, token: RefreshToken) -> DomainResult<()>;
    fn find_by_token(&self, token: &str) -> DomainResult<Option<RefreshToken>>;
    fn find_valid(&self, token: &str, now: DateTime<Utc>) -> DomainResult<Option<RefreshToken>>;
    /// Atomically revoke the row if it is currently valid. Returns the row as
    /// it was before revocation, or `None` if it was missing or invalid.
    fn consume_valid(&self, token: &str, now: DateTime<Utc>) -> DomainResult<Option<RefreshToken>>;
    /// Returns `false` when the id is unknown or already revoked.
    fn revoke(&self, id: RefreshTokenId, now: DateTime<Utc>) -> DomainResult<bool>;
    /// Revoke every non-revoked row of the user; returns how many changed.
    fn revoke_all_for_user(&self, user_id: UserId, now: DateTime<Utc>) -> DomainResult<usize>;
    /// Delete rows whose expiry is before `now`; returns how many were removed.
    fn purge_expired(&self, now: DateTime<Utc>) -> DomainResult<usize>;
}

impl<S> RefreshTokenStore for Arc<S>
where
    S: RefreshTokenStore + ?Sized,
{
    fn insert(&self, token: RefreshToken) -> DomainResult<()> {
        (**self).insert(token)
    }

    fn find_by_token(&self, token: &str) -> DomainResult<Option<RefreshToken>> {
        (**self).find_by_token(token)
    }

    fn find_valid(&self, token: &str, now: DateTime<Utc>) -> DomainResult<Option<RefreshToken>> {
        (**self).find_valid(token, now)
    }

    fn consume_valid(&self, token: &str, now: DateTime<Utc>) -> DomainResult<Option<RefreshToken>> {
        (**self).consume_valid(token, now)
    }

    fn revoke(&self, id: RefreshTokenId, now: DateTime<Utc>) -> DomainResult<bool> {
        (**self).revoke(id, now)
    }

    fn revoke_all_for_user(&self, user_id: UserId, now: DateTime<Utc>) -> DomainResult<usize> {
        (**self).revoke_all_for_user(user_id, now)
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> DomainResult<usize> {
        (**self).purge_expired(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn validity_needs_both_unexpired_and_unrevoked() {
        let now = Utc::now();
        let mut t = RefreshToken::new(UserId::new(), "t".into(), now + Duration::hours(1), now);
        assert!(t.is_valid(now));
        assert!(!t.is_valid(now + Duration::hours(1)));

        t.revoked_at = Some(now);
        assert!(!t.is_valid(now));
    }
}
