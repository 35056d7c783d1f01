//! Password hashing and verification using Argon2id.

use std::sync::Arc;

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier as _};

use sharebook_core::{DomainError, DomainResult};

/// One-way hash + verify capability.
pub trait PasswordVerifier: Send + Sync {
    /// Hash a plaintext into PHC-format verification material.
    fn hash(&self, plaintext: &str) -> DomainResult<String>;

    /// `Ok(true)` on match, `Ok(false)` on mismatch. Malformed material is an
    /// error, not a mismatch.
    fn verify(&self, plaintext: &str, material: &str) -> DomainResult<bool>;
}

impl<S> PasswordVerifier for Arc<S>
where
    S: PasswordVerifier + ?Sized,
{
    fn hash(&self, plaintext: &str) -> DomainResult<String> {
        (**self).hash(plaintext)
    }

    fn verify(&self, plaintext: &str, material: &str) -> DomainResult<bool> {
        (**self).verify(plaintext, material)
    }
}

/// Argon2id with the crate's default parameters and a random salt per hash.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2PasswordVerifier;

impl Argon2PasswordVerifier {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordVerifier for Argon2PasswordVerifier {
    fn hash(&self, plaintext: &str) -> DomainResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| DomainError::storage(format!("password hash error: {e}")))
    }

    fn verify(&self, plaintext: &str, material: &str) -> DomainResult<bool> {
        let parsed = PasswordHash::new(material)
            .map_err(|e| DomainError::storage(format!("invalid hash format: {e}")))?;

        match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(DomainError::storage(format!("verify error: {e}"))),
        }
    }
}
