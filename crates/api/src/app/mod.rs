//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store and service construction
//! - `routes/`: handlers, one file per resource
//! - `dto.rs`: request bodies and their mapping onto service inputs
//! - `errors.rs`: `DomainError` to JSON error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::{AppServices, build_services};

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(services: Arc<AppServices>) -> Router {
    let auth_state = middleware::AuthState {
        lifecycle: services.lifecycle.clone(),
    };

    // Everything except signup/login/refresh requires a valid access token.
    let protected = routes::protected_router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    let api = routes::public_router().merge(protected);

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api/v1", api)
        .layer(ServiceBuilder::new().layer(Extension(services)))
}
