//! Access/refresh token issuance, verification, rotation and revocation.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use sharebook_core::{DomainError, DomainResult, UserId};

use crate::claims::{JwtClaims, TokenKind};
use crate::codec::TokenCodec;
use crate::config::AuthConfig;
use crate::principal::PrincipalStore;
use crate::refresh::{RefreshToken, RefreshTokenStore};

/// A freshly minted access + refresh token pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
}

/// Owns the credential lifecycle.
///
/// Access tokens are stateless and never consult the store. Refresh tokens are
/// persisted so they can be rotated once and revoked en masse.
pub struct TokenLifecycleManager<R, P> {
    codec: TokenCodec,
    refresh_tokens: R,
    principals: P,
    access_ttl_secs: u64,
    refresh_ttl_secs: u64,
}

impl<R, P> core::fmt::Debug for TokenLifecycleManager<R, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenLifecycleManager")
            .field("access_ttl_secs", &self.access_ttl_secs)
            .field("refresh_ttl_secs", &self.refresh_ttl_secs)
            .finish_non_exhaustive()
    }
}

impl<R, P> TokenLifecycleManager<R, P>
where
    R: RefreshTokenStore,
    P: PrincipalStore,
{
    pub fn new(config: &AuthConfig, refresh_tokens: R, principals: P) -> Self {
        Self {
            codec: TokenCodec::new(config.jwt_secret.as_bytes()),
            refresh_tokens,
            principals,
            access_ttl_secs: config.access_token_ttl_secs,
            refresh_ttl_secs: config.refresh_token_ttl_secs,
        }
    }

    pub fn refresh_tokens(&self) -> &R {
        &self.refresh_tokens
    }

    /// Mint an access token and a refresh token and persist the latter.
    pub fn issue_token_pair(&self, user_id: UserId, email: &str) -> DomainResult<TokenPair> {
        self.issue_at(user_id, email, Utc::now())
    }

    fn issue_at(
        &self,
        user_id: UserId,
        email: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<TokenPair> {
        let iat = now.timestamp();

        let access = JwtClaims {
            sub: user_id,
            kind: TokenKind::Access,
            email: Some(email.to_string()),
            jti: None,
            iat,
            exp: expires_at(now, self.access_ttl_secs)?.timestamp(),
        };
        let refresh_expires_at = expires_at(now, self.refresh_ttl_secs)?;
        let refresh = JwtClaims {
            sub: user_id,
            kind: TokenKind::Refresh,
            email: None,
            jti: Some(Uuid::new_v4().to_string()),
            iat,
            exp: refresh_expires_at.timestamp(),
        };

        let access_token = self.codec.issue(&access)?;
        let refresh_token = self.codec.issue(&refresh)?;

        self.refresh_tokens.insert(RefreshToken::new(
            user_id,
            refresh_token.clone(),
            refresh_expires_at,
            now,
        ))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.access_ttl_secs,
        })
    }

    /// Verify an access token and return its subject.
    pub fn authenticate(&self, access_token: &str) -> DomainResult<UserId> {
        match self.codec.parse_kind(access_token, TokenKind::Access) {
            Ok(claims) => Ok(claims.sub),
            Err(e) => {
                tracing::warn!(reason = %e, "access token rejected");
                Err(DomainError::InvalidToken)
            }
        }
    }

    /// Exchange a valid refresh token for a new pair. The presented token is
    /// consumed; presenting it again fails.
    pub fn rotate_refresh_token(&self, token: &str) -> DomainResult<TokenPair> {
        self.rotate_at(token, Utc::now())
    }

    fn rotate_at(&self, token: &str, now: DateTime<Utc>) -> DomainResult<TokenPair> {
        let claims = self
            .codec
            .parse_kind(token, TokenKind::Refresh)
            .map_err(|e| {
                tracing::warn!(reason = %e, "refresh token rejected");
                DomainError::InvalidToken
            })?;

        let Some(row) = self.refresh_tokens.consume_valid(token, now)? else {
            tracing::warn!(user_id = %claims.sub, "refresh token unknown, expired or already used");
            return Err(DomainError::InvalidToken);
        };

        if row.user_id != claims.sub {
            tracing::warn!(
                user_id = %claims.sub,
                owner = %row.user_id,
                "refresh token owner mismatch"
            );
            return Err(DomainError::InvalidToken);
        }

        let Some(user) = self.principals.find_by_id(row.user_id)? else {
            tracing::warn!(user_id = %row.user_id, "refresh token owner no longer active");
            return Err(DomainError::InvalidToken);
        };

        let pair = self.issue_at(user.id, &user.email, now)?;
        tracing::info!(user_id = %user.id, "refresh token rotated");
        Ok(pair)
    }

    /// Revoke every outstanding refresh token of the user. Idempotent.
    pub fn revoke_all(&self, user_id: UserId) -> DomainResult<usize> {
        let revoked = self.refresh_tokens.revoke_all_for_user(user_id, Utc::now())?;
        tracing::info!(user_id = %user_id, revoked, "refresh tokens revoked");
        Ok(revoked)
    }
}

/// `now + ttl_secs`, failing instead of wrapping when the lifetime is out of range.
fn expires_at(now: DateTime<Utc>, ttl_secs: u64) -> DomainResult<DateTime<Utc>> {
    i64::try_from(ttl_secs)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| {
            DomainError::storage(format!("token lifetime of {ttl_secs}s is out of range"))
        })
}
