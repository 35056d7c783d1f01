use axum::Router;

pub mod auth;
pub mod categories;
pub mod common;
pub mod expenses;
pub mod ledgers;
pub mod members;
pub mod system;
pub mod users;

/// Endpoints reachable without an access token.
pub fn public_router() -> Router {
    Router::new().nest("/auth", auth::public_router())
}

/// Endpoints behind the bearer-token middleware.
pub fn protected_router() -> Router {
    Router::new()
        .nest("/auth", auth::protected_router())
        .nest("/users", users::router())
        .nest("/ledgers", ledgers::router())
        .nest("/ledgers/:ledger_id/members", members::router())
        .nest("/ledgers/:ledger_id/categories", categories::router())
        .nest("/ledgers/:ledger_id/expenses", expenses::router())
}
