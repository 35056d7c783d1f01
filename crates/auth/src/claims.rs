use serde::{Deserialize, Serialize};
use thiserror::Error;

use sharebook_core::{DomainError, UserId};

/// Which half of a token pair a token is.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Signed token claims (transport-agnostic).
///
/// Timestamps are Unix seconds, as registered JWT claims require.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject / user identifier.
    pub sub: UserId,

    #[serde(rename = "type")]
    pub kind: TokenKind,

    /// Present on access tokens only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Unique id, present on refresh tokens so two tokens minted in the same
    /// second never collide.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,

    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,

    #[error("unexpected token type")]
    WrongKind,

    #[error("token is malformed or its signature does not verify")]
    Malformed,

    #[error("token could not be signed: {0}")]
    Signing(String),
}

impl From<TokenValidationError> for DomainError {
    fn from(value: TokenValidationError) -> Self {
        match value {
            // Signing is our failure, not the caller's.
            TokenValidationError::Signing(msg) => DomainError::storage(msg),
            _ => DomainError::InvalidToken,
        }
    }
}

/// Deterministically validate the time window of decoded claims.
///
/// Signature checks happen in the codec; this only looks at the numbers.
pub fn validate_claims(claims: &JwtClaims, now: i64) -> Result<(), TokenValidationError> {
    if claims.exp <= claims.iat {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.iat {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.exp {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}
