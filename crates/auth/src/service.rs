//! Authentication service: signup, login, refresh and logout orchestration.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use sharebook_core::{DomainError, DomainResult, UserId, Validator};

use crate::lifecycle::{TokenLifecycleManager, TokenPair};
use crate::password::PasswordVerifier;
use crate::principal::{PrincipalStore, User, UserSummary};
use crate::refresh::RefreshTokenStore;

pub const NAME_MAX_LEN: usize = 50;

#[derive(Debug, Clone)]
pub struct SignupInput {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Tokens plus the profile of the user they were issued for.
#[derive(Debug, Clone, Serialize)]
pub struct AuthOutput {
    #[serde(flatten)]
    pub tokens: TokenPair,
    pub user: UserSummary,
}

/// Authentication service.
///
/// Generic over its stores so that the auth layer has no dependency on the
/// infrastructure crate.
pub struct AuthService<P, R, H> {
    principals: P,
    lifecycle: Arc<TokenLifecycleManager<R, P>>,
    passwords: H,
    min_password_length: usize,
}

impl<P, R, H> AuthService<P, R, H>
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

    pub fn lifecycle(&self) -> &Arc<TokenLifecycleManager<R, P>> {
        &self.lifecycle
    }

    /// Register a new user and issue their first token pair.
    pub fn signup(&self, input: SignupInput) -> DomainResult<AuthOutput> {
        let mut v = Validator::new();
        let email = v.email("email", &input.email);
        if input.password.is_empty() {
            v.push("password", "Password is required");
        } else {
            v.min_length("password", &input.password, self.min_password_length);
        }
        v.required_text("name", &input.name, NAME_MAX_LEN);
        v.finish()?;
        let email = email.ok_or_else(|| DomainError::bad_request("Invalid email format"))?;

        if self.principals.exists_by_email(email.as_str())? {
            return Err(DomainError::bad_request(format!(
                "Email already registered: {email}"
            )));
        }

        let hash = self.passwords.hash(&input.password)?;
        let user = User::new(email, hash, input.name.trim().to_string(), Utc::now());
        self.principals.save(user.clone())?;
        tracing::info!(user_id = %user.id, "user registered");

        self.respond(&user)
    }

    /// Verify credentials and issue a new token pair. Earlier pairs stay valid.
    pub fn login(&self, email: &str, password: &str) -> DomainResult<AuthOutput> {
        let invalid = || DomainError::unauthorized("Invalid email or password");

        let normalized = email.trim().to_lowercase();
        let user = self.principals.find_by_email(&normalized)?.ok_or_else(invalid)?;
        if !self.passwords.verify(password, &user.password_hash)? {
            tracing::info!(user_id = %user.id, "login rejected");
            return Err(invalid());
        }

        tracing::info!(user_id = %user.id, "user logged in");
        self.respond(&user)
    }

    /// Rotate a refresh token.
    pub fn refresh(&self, refresh_token: &str) -> DomainResult<AuthOutput> {
        let tokens = self.lifecycle.rotate_refresh_token(refresh_token)?;
        let user_id = self.lifecycle.authenticate(&tokens.access_token)?;
        let user = self
            .principals
            .find_by_id(user_id)?
            .ok_or(DomainError::InvalidToken)?;
        Ok(AuthOutput {
            tokens,
            user: user.summary(),
        })
    }

    /// Revoke all refresh tokens of the user. Access tokens already handed out
    /// stay usable until they expire.
    pub fn logout(&self, user_id: UserId) -> DomainResult<()> {
        self.lifecycle.revoke_all(user_id)?;
        tracing::info!(user_id = %user_id, "user logged out");
        Ok(())
    }

    fn respond(&self, user: &User) -> DomainResult<AuthOutput> {
        let tokens = self.lifecycle.issue_token_pair(user.id, &user.email)?;
        Ok(AuthOutput {
            tokens,
            user: user.summary(),
        })
    }
}
