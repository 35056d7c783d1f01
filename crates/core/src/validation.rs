//! Request-field validation with accumulated field errors.

use crate::error::{DomainError, DomainResult, FieldError};
use crate::value_object::{EmailAddress, HexColor};

/// Collects field-level failures and turns them into a single
/// `BadRequest("Validation failed")` carrying every failure.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// Required, non-blank, at most `max` characters.
    pub fn required_text(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        if value.trim().is_empty() {
            self.push(field, format!("{} is required", label(field)));
        } else if value.chars().count() > max {
            self.push(
                field,
                format!("{} must be at most {max} characters", label(field)),
            );
        }
        self
    }

    /// Optional text bounded to `max` characters.
    pub fn optional_text(&mut self, field: &str, value: Option<&str>, max: usize) -> &mut Self {
        if let Some(v) = value {
            if v.chars().count() > max {
                self.push(
                    field,
                    format!("{} must be at most {max} characters", label(field)),
                );
            }
        }
        self
    }

    /// Optional text that, when present, must be non-blank and within `max`.
    pub fn optional_nonblank(&mut self, field: &str, value: Option<&str>, max: usize) -> &mut Self {
        if let Some(v) = value {
            self.required_text(field, v, max);
        }
        self
    }

    /// Validate and normalize an e-mail address.
    pub fn email(&mut self, field: &str, value: &str) -> Option<EmailAddress> {
        if value.trim().is_empty() {
            self.push(field, "Email is required");
            return None;
        }
        let parsed = EmailAddress::parse(value);
        if parsed.is_none() {
            self.push(field, "Invalid email format");
        }
        parsed
    }

    pub fn min_length(&mut self, field: &str, value: &str, min: usize) -> &mut Self {
        if value.chars().count() < min {
            self.push(
                field,
                format!("{} must be at least {min} characters", label(field)),
            );
        }
        self
    }

    pub fn hex_color(&mut self, field: &str, value: Option<&str>) -> Option<HexColor> {
        let raw = value?;
        let parsed = HexColor::parse(raw);
        if parsed.is_none() {
            self.push(field, "Color must be a valid hex color code (e.g., #FF5733)");
        }
        parsed
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok(())` when nothing failed, otherwise one `BadRequest` with every
    /// recorded field error.
    pub fn finish(self) -> DomainResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(DomainError::validation(self.errors))
        }
    }
}

/// `payment_method` -> `Payment method`.
fn label(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
