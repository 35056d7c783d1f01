//! `sharebook-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod entity;
pub mod error;
pub mod id;
pub mod validation;
pub mod value_object;

pub use entity::{Entity, SoftDelete};
pub use error::{DomainError, DomainResult, ErrorKind, FieldError};
pub use id::{CategoryId, ExpenseId, LedgerId, MemberId, RefreshTokenId, UserId};
pub use validation::Validator;
pub use value_object::{Amount, AmountError, EmailAddress, HexColor, ValueObject};
