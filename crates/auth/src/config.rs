//! Authentication configuration.

/// Settings the credential lifecycle receives from the outside.
///
/// There are no defaults here; the configuration layer owns them.
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 signing secret.
    pub jwt_secret: String,
    /// Access token lifetime in seconds.
    pub access_token_ttl_secs: u64,
    /// Refresh token lifetime in seconds.
    pub refresh_token_ttl_secs: u64,
    /// Minimum accepted password length (characters).
    pub min_password_length: usize,
}

impl core::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("access_token_ttl_secs", &self.access_token_ttl_secs)
            .field("refresh_token_ttl_secs", &self.refresh_token_ttl_secs)
            .field("min_password_length", &self.min_password_length)
            .finish()
    }
}
