//! Process configuration loaded from the environment.

use std::net::SocketAddr;
use std::time::Duration;

use sharebook_auth::AuthConfig;

pub const ENV_JWT_SECRET: &str = "SHAREBOOK_JWT_SECRET";
pub const ENV_ACCESS_TOKEN_TTL_SECS: &str = "SHAREBOOK_ACCESS_TOKEN_TTL_SECS";
pub const ENV_REFRESH_TOKEN_TTL_SECS: &str = "SHAREBOOK_REFRESH_TOKEN_TTL_SECS";
pub const ENV_BIND_ADDR: &str = "SHAREBOOK_BIND_ADDR";
pub const ENV_TOKEN_SWEEP_INTERVAL_SECS: &str = "SHAREBOOK_TOKEN_SWEEP_INTERVAL_SECS";
pub const ENV_MIN_PASSWORD_LENGTH: &str = "SHAREBOOK_MIN_PASSWORD_LENGTH";

pub const DEFAULT_ACCESS_TOKEN_TTL_SECS: u64 = 3_600;
pub const DEFAULT_REFRESH_TOKEN_TTL_SECS: u64 = 604_800;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_TOKEN_SWEEP_INTERVAL_SECS: u64 = 3_600;
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;
/// HS256 secrets shorter than this are refused.
pub const MIN_JWT_SECRET_BYTES: usize = 32;
/// Upper bound on either token lifetime (ten years).
pub const MAX_TOKEN_TTL_SECS: u64 = 315_360_000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} must be at least {min} bytes")]
    SecretTooShort { name: &'static str, min: usize },

    #[error("{name} is invalid: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("{name} must not exceed {max}")]
    TooLarge { name: &'static str, max: u64 },
}

#[derive(Clone)]
pub struct AppConfig {
    pub jwt_secret: String,
    pub access_token_ttl_secs: u64,
    pub refresh_token_ttl_secs: u64,
    pub bind_addr: SocketAddr,
    pub token_sweep_interval: Duration,
    pub min_password_length: usize,
}

impl core::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppConfig")
            .field("jwt_secret", &"<redacted>")
            .field("access_token_ttl_secs", &self.access_token_ttl_secs)
            .field("refresh_token_ttl_secs", &self.refresh_token_ttl_secs)
            .field("bind_addr", &self.bind_addr)
            .field("token_sweep_interval", &self.token_sweep_interval)
            .field("min_password_length", &self.min_password_length)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source; `from_env` passes the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup(ENV_JWT_SECRET)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing(ENV_JWT_SECRET))?;
        if jwt_secret.len() < MIN_JWT_SECRET_BYTES {
            return Err(ConfigError::SecretTooShort {
                name: ENV_JWT_SECRET,
                min: MIN_JWT_SECRET_BYTES,
            });
        }

        let access_token_ttl_secs =
            ttl(&lookup, ENV_ACCESS_TOKEN_TTL_SECS, DEFAULT_ACCESS_TOKEN_TTL_SECS)?;
        let refresh_token_ttl_secs =
            ttl(&lookup, ENV_REFRESH_TOKEN_TTL_SECS, DEFAULT_REFRESH_TOKEN_TTL_SECS)?;
        let sweep_secs = positive(
            &lookup,
            ENV_TOKEN_SWEEP_INTERVAL_SECS,
            DEFAULT_TOKEN_SWEEP_INTERVAL_SECS,
        )?;
        let min_password_length = positive(
            &lookup,
            ENV_MIN_PASSWORD_LENGTH,
            DEFAULT_MIN_PASSWORD_LENGTH as u64,
        )? as usize;

        let raw_addr = lookup(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr.parse().map_err(|_| ConfigError::Invalid {
            name: ENV_BIND_ADDR,
            value: raw_addr.clone(),
        })?;

        Ok(Self {
            jwt_secret,
            access_token_ttl_secs,
            refresh_token_ttl_secs,
            bind_addr,
            token_sweep_interval: Duration::from_secs(sweep_secs),
            min_password_length,
        })
    }

    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            jwt_secret: self.jwt_secret.clone(),
            access_token_ttl_secs: self.access_token_ttl_secs,
            refresh_token_ttl_secs: self.refresh_token_ttl_secs,
            min_password_length: self.min_password_length,
        }
    }
}

fn positive<F>(lookup: &F, name: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(v) if v > 0 => Ok(v),
            _ => Err(ConfigError::Invalid { name, value: raw }),
        },
    }
}

fn ttl<F>(lookup: &F, name: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let secs = positive(lookup, name, default)?;
    if secs > MAX_TOKEN_TTL_SECS {
        return Err(ConfigError::TooLarge {
            name,
            max: MAX_TOKEN_TTL_SECS,
        });
    }
    Ok(secs)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| env.get(k).cloned())
    }

    #[test]
    fn defaults_apply_when_only_the_secret_is_set() {
        let cfg = load(&[(ENV_JWT_SECRET, SECRET)]).unwrap();
        assert_eq!(cfg.access_token_ttl_secs, 3_600);
        assert_eq!(cfg.refresh_token_ttl_secs, 604_800);
        assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(cfg.token_sweep_interval, Duration::from_secs(3_600));
        assert_eq!(cfg.min_password_length, 6);

        let auth = cfg.auth_config();
        assert_eq!(auth.jwt_secret, SECRET);
        assert_eq!(auth.access_token_ttl_secs, 3_600);
    }

    #[test]
    fn secret_is_required_and_must_be_long_enough() {
        assert_eq!(load(&[]).unwrap_err(), ConfigError::Missing(ENV_JWT_SECRET));
        assert!(matches!(
            load(&[(ENV_JWT_SECRET, "short")]).unwrap_err(),
            ConfigError::SecretTooShort { .. }
        ));
    }

    #[test]
    fn overrides_are_parsed() {
        let cfg = load(&[
            (ENV_JWT_SECRET, SECRET),
            (ENV_ACCESS_TOKEN_TTL_SECS, "60"),
            (ENV_REFRESH_TOKEN_TTL_SECS, "120"),
            (ENV_BIND_ADDR, "127.0.0.1:9000"),
            (ENV_TOKEN_SWEEP_INTERVAL_SECS, "5"),
            (ENV_MIN_PASSWORD_LENGTH, "10"),
        ])
        .unwrap();
        assert_eq!(cfg.access_token_ttl_secs, 60);
        assert_eq!(cfg.refresh_token_ttl_secs, 120);
        assert_eq!(cfg.bind_addr.port(), 9000);
        assert_eq!(cfg.token_sweep_interval, Duration::from_secs(5));
        assert_eq!(cfg.min_password_length, 10);
    }

    #[test]
    fn zero_or_garbage_numbers_are_rejected() {
        for bad in ["0", "-1", "soon"] {
            let err =
                load(&[(ENV_JWT_SECRET, SECRET), (ENV_ACCESS_TOKEN_TTL_SECS, bad)]).unwrap_err();
            let expected = ConfigError::Invalid {
                name: ENV_ACCESS_TOKEN_TTL_SECS,
                value: bad.to_string(),
            };
            assert_eq!(err, expected);
        }
        assert!(load(&[(ENV_JWT_SECRET, SECRET), (ENV_BIND_ADDR, "nowhere")]).is_err());
    }

    #[test]
    fn token_lifetimes_are_capped() {
        let huge = u64::MAX.to_string();
        for name in [ENV_ACCESS_TOKEN_TTL_SECS, ENV_REFRESH_TOKEN_TTL_SECS] {
            let err = load(&[(ENV_JWT_SECRET, SECRET), (name, huge.as_str())]).unwrap_err();
            assert_eq!(
                err,
                ConfigError::TooLarge {
                    name,
                    max: MAX_TOKEN_TTL_SECS
                }
            );
        }

        let at_cap = MAX_TOKEN_TTL_SECS.to_string();
        let pairs = [(ENV_JWT_SECRET, SECRET), (ENV_REFRESH_TOKEN_TTL_SECS, at_cap.as_str())];
        let cfg = load(&pairs).unwrap();
        assert_eq!(cfg.refresh_token_ttl_secs, MAX_TOKEN_TTL_SECS);
    }

    #[test]
    fn debug_hides_the_secret() {
        let cfg = load(&[(ENV_JWT_SECRET, SECRET)]).unwrap();
        assert!(!format!("{cfg:?}").contains(SECRET));
    }
}
