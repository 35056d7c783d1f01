//! Domain error model.

use serde::Serialize;
use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Domain-level error.
///
/// Every failure raised by the services is one of these kinds. They are raised
/// at the point of detection and propagated unchanged to the boundary, which
/// maps them onto a transport status.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed, expired, unverifiable, unknown or revoked credential.
    ///
    /// The message is deliberately fixed so callers cannot tell which.
    #[error("invalid token")]
    InvalidToken,

    /// Missing or unverifiable principal identity (e.g. bad login).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated principal lacks the role/ownership for the action.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Referenced resource does not exist or is soft-deleted.
    #[error("not found: {0}")]
    NotFound(String),

    /// Structurally valid request that violates a domain invariant.
    #[error("bad request: {message}")]
    BadRequest {
        message: String,
        field_errors: Vec<FieldError>,
    },

    /// Backing store failure (not a domain decision).
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Discriminant of [`DomainError`] without the payload.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidToken,
    Unauthorized,
    Forbidden,
    NotFound,
    BadRequest,
    Storage,
}

impl ErrorKind {
    /// Stable machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::InvalidToken => "invalid_token",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::NotFound => "not_found",
            ErrorKind::BadRequest => "bad_request",
            ErrorKind::Storage => "storage_error",
        }
    }
}

impl DomainError {
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// `"<resource> not found with id: <id>"`.
    pub fn resource_not_found(resource: &str, id: impl core::fmt::Display) -> Self {
        Self::NotFound(format!("{resource} not found with id: {id}"))
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest {
            message: msg.into(),
            field_errors: Vec::new(),
        }
    }

    pub fn validation(field_errors: Vec<FieldError>) -> Self {
        Self::BadRequest {
            message: "Validation failed".to_string(),
            field_errors,
        }
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Shorthand for "not a member of this ledger".
    pub fn not_a_member() -> Self {
        Self::Forbidden("You are not a member of this ledger".to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::InvalidToken => ErrorKind::InvalidToken,
            DomainError::Unauthorized(_) => ErrorKind::Unauthorized,
            DomainError::Forbidden(_) => ErrorKind::Forbidden,
            DomainError::NotFound(_) => ErrorKind::NotFound,
            DomainError::BadRequest { .. } => ErrorKind::BadRequest,
            DomainError::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Human-readable message without the kind prefix.
    pub fn message(&self) -> String {
        match self {
            DomainError::InvalidToken => "Invalid or expired token".to_string(),
            DomainError::Unauthorized(m)
            | DomainError::Forbidden(m)
            | DomainError::NotFound(m)
            | DomainError::Storage(m) => m.clone(),
            DomainError::BadRequest { message, .. } => message.clone(),
        }
    }

    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            DomainError::BadRequest { field_errors, .. } => field_errors,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_have_stable_codes() {
        assert_eq!(DomainError::InvalidToken.kind().code(), "invalid_token");
        assert_eq!(DomainError::forbidden("x").kind().code(), "forbidden");
        assert_eq!(DomainError::bad_request("x").kind().code(), "bad_request");
    }

    #[test]
    fn invalid_token_message_does_not_leak_reason() {
        assert_eq!(DomainError::InvalidToken.message(), "Invalid or expired token");
    }

    #[test]
    fn validation_carries_field_errors() {
        let err = DomainError::validation(vec![FieldError::new("email", "Invalid email format")]);
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(err.field_errors().len(), 1);
        assert_eq!(err.field_errors()[0].field, "email");
    }

    #[test]
    fn resource_not_found_names_resource() {
        let err = DomainError::resource_not_found("Ledger", "abc");
        assert_eq!(err.message(), "Ledger not found with id: abc");
    }
}
