use std::str::FromStr;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use sharebook_core::{DomainError, DomainResult};

use crate::app::errors;

/// Map a service result onto a JSON response with `status` on success.
pub fn respond<T: Serialize>(
    status: StatusCode,
    result: DomainResult<T>,
) -> axum::response::Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// `204 No Content` on success.
pub fn no_content(result: DomainResult<()>) -> axum::response::Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Parse a path segment into a typed id.
pub fn parse_id<T>(raw: &str) -> DomainResult<T>
where
    T: FromStr<Err = DomainError>,
{
    T::from_str(raw)
}

/// Parse the two ids of a nested resource path, outer segment first.
pub fn parse_pair<A, B>(a: &str, b: &str) -> DomainResult<(A, B)>
where
    A: FromStr<Err = DomainError>,
    B: FromStr<Err = DomainError>,
{
    Ok((parse_id(a)?, parse_id(b)?))
}

/// Run password hashing and other CPU-heavy service calls off the async
/// workers.
pub async fn blocking<T, F>(f: F) -> DomainResult<T>
where
    F: FnOnce() -> DomainResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .unwrap_or_else(|e| Err(DomainError::storage(format!("worker task failed: {e}"))))
}
