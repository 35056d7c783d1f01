use std::collections::HashMap;

use chrono::{DateTime, Utc};

use sharebook_auth::{RefreshToken, RefreshTokenStore};
use sharebook_core::{DomainError, DomainResult, RefreshTokenId, UserId};

use super::Table;

/// Refresh tokens keyed by their token string (the unique lookup key).
#[derive(Debug)]
pub struct InMemoryRefreshTokenStore {
    tokens: Table<String, RefreshToken>,
}

impl InMemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self {
            tokens: Table::new("refresh_token"),
        }
    }

    pub fn len(&self) -> DomainResult<usize> {
        Ok(self.tokens.read()?.len())
    }

    pub fn is_empty(&self) -> DomainResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl Default for InMemoryRefreshTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

fn by_id(
    rows: &mut HashMap<String, RefreshToken>,
    id: RefreshTokenId,
) -> Option<&mut RefreshToken> {
    rows.values_mut().find(|t| t.id == id)
}

impl RefreshTokenStore for InMemoryRefreshTokenStore {
    fn insert(&self, token: RefreshToken) -> DomainResult<()> {
        let mut rows = self.tokens.write()?;
        if rows.contains_key(&token.token) {
            return Err(DomainError::storage("duplicate refresh token"));
        }
        rows.insert(token.token.clone(), token);
        Ok(())
    }

    fn find_by_token(&self, token: &str) -> DomainResult<Option<RefreshToken>> {
        Ok(self.tokens.read()?.get(token).cloned())
    }

    fn find_valid(&self, token: &str, now: DateTime<Utc>) -> DomainResult<Option<RefreshToken>> {
        Ok(self
            .tokens
            .read()?
            .get(token)
            .filter(|t| t.is_valid(now))
            .cloned())
    }

    fn consume_valid(&self, token: &str, now: DateTime<Utc>) -> DomainResult<Option<RefreshToken>> {
        // Check and revoke under one write guard: a second caller always sees
        // the revocation.
        let mut rows = self.tokens.write()?;
        match rows.get_mut(token) {
            Some(row) if row.is_valid(now) => {
                let before = row.clone();
                row.revoked_at = Some(now);
                Ok(Some(before))
            }
            _ => Ok(None),
        }
    }

    fn revoke(&self, id: RefreshTokenId, now: DateTime<Utc>) -> DomainResult<bool> {
        let mut rows = self.tokens.write()?;
        match by_id(&mut rows, id) {
            Some(row) if row.revoked_at.is_none() => {
                row.revoked_at = Some(now);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn revoke_all_for_user(&self, user_id: UserId, now: DateTime<Utc>) -> DomainResult<usize> {
        let mut rows = self.tokens.write()?;
        let mut revoked = 0;
        for row in rows
            .values_mut()
            .filter(|t| t.user_id == user_id && t.revoked_at.is_none())
        {
            row.revoked_at = Some(now);
            revoked += 1;
        }
        Ok(revoked)
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> DomainResult<usize> {
        let mut rows = self.tokens.write()?;
        let before = rows.len();
        rows.retain(|_, t| t.expires_at >= now);
        Ok(before - rows.len())
    }
}
