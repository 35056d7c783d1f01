//! HS256 signing and verification of compact tokens.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::claims::{JwtClaims, TokenKind, TokenValidationError, validate_claims};

/// Signs and parses tokens with one process-wide symmetric secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl core::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["sub", "exp", "iat"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn issue(&self, claims: &JwtClaims) -> Result<String, TokenValidationError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| TokenValidationError::Signing(e.to_string()))
    }

    /// Verify signature and expiry and return the claims.
    pub fn parse(&self, token: &str) -> Result<JwtClaims, TokenValidationError> {
        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenValidationError::Expired,
                _ => TokenValidationError::Malformed,
            })?;

        validate_claims(&data.claims, Utc::now().timestamp())?;
        Ok(data.claims)
    }

    /// Like [`TokenCodec::parse`] but also requires the given kind.
    pub fn parse_kind(
        &self,
        token: &str,
        kind: TokenKind,
    ) -> Result<JwtClaims, TokenValidationError> {
        let claims = self.parse(token)?;
        if claims.kind != kind {
            return Err(TokenValidationError::WrongKind);
        }
        Ok(claims)
    }
}
