use std::sync::Arc;

use axum::{
    Router,
    extract::{Extension, Json, rejection::JsonRejection},
    http::StatusCode,
    routing::post,
};

use crate::app::routes::common::{blocking, no_content, respond};
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn public_router() -> Router {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
}

pub fn protected_router() -> Router {
    Router::new().route("/logout", post(logout))
}

pub async fn signup(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::SignupRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection(e),
    };
    let result = blocking(move || services.auth.signup(body.into())).await;
    respond(StatusCode::CREATED, result)
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::LoginRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection(e),
    };
    let result = blocking(move || services.auth.login(&body.email, &body.password)).await;
    respond(StatusCode::OK, result)
}

pub async fn refresh(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::RefreshRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection(e),
    };
    respond(StatusCode::OK, services.auth.refresh(&body.refresh_token))
}

pub async fn logout(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    no_content(services.auth.logout(principal.user_id()))
}
