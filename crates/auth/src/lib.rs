//! `sharebook-auth`: credential lifecycle and ledger-scoped authorization.
//!
//! This crate is intentionally decoupled from HTTP and storage: stores are
//! traits, implemented elsewhere.

pub mod authorize;
pub mod claims;
pub mod codec;
pub mod config;
pub mod lifecycle;
pub mod membership;
pub mod password;
pub mod permissions;
pub mod principal;
pub mod refresh;
pub mod roles;
pub mod service;

pub use authorize::{AuthzError, authorize};
pub use claims::{JwtClaims, TokenKind, TokenValidationError, validate_claims};
pub use codec::TokenCodec;
pub use config::AuthConfig;
pub use lifecycle::{TokenLifecycleManager, TokenPair};
pub use membership::{Membership, MembershipResolver, MembershipStore};
pub use password::{Argon2PasswordVerifier, PasswordVerifier};
pub use permissions::LedgerAction;
pub use principal::{PrincipalStore, User, UserSummary};
pub use refresh::{RefreshToken, RefreshTokenStore};
pub use roles::MemberRole;
pub use service::{AuthOutput, AuthService, SignupInput};
