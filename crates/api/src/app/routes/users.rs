use std::sync::Arc;

use axum::{
    Router,
    extract::{Extension, Json, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, patch},
};

use crate::app::routes::common::{blocking, no_content, respond};
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/me", get(get_me).patch(update_me).delete(delete_me))
        .route("/me/password", patch(change_password))
}

pub async fn get_me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    respond(StatusCode::OK, services.users.get_profile(principal.user_id()))
}

pub async fn update_me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<dto::UpdateUserRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection(e),
    };
    respond(
        StatusCode::OK,
        services.users.update_profile(principal.user_id(), body.into()),
    )
}

pub async fn delete_me(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    no_content(services.users.delete(principal.user_id()))
}

pub async fn change_password(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<dto::ChangePasswordRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection(e),
    };
    let user_id = principal.user_id();
    let result = blocking(move || {
        services
            .users
            .change_password(user_id, &body.current_password, &body.new_password)
    })
    .await;
    no_content(result)
}
