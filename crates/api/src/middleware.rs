use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use sharebook_core::{DomainError, DomainResult};

use crate::app::errors;
use crate::app::services::Lifecycle;
use crate::context::PrincipalContext;

#[derive(Clone)]
pub struct AuthState {
    pub lifecycle: Arc<Lifecycle>,
}

/// Verify the bearer access token and attach the caller's identity.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let user_id = extract_bearer(req.headers())
        .and_then(|token| state.lifecycle.authenticate(token))
        .map_err(errors::domain_error_to_response)?;

    req.extensions_mut().insert(PrincipalContext::new(user_id));

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> DomainResult<&str> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| DomainError::unauthorized("Authentication required"))?;

    let header = header.to_str().map_err(|_| DomainError::InvalidToken)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(DomainError::InvalidToken)?
        .trim();
    if token.is_empty() {
        return Err(DomainError::InvalidToken);
    }

    Ok(token)
}
