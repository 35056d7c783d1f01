use std::sync::Arc;

use axum::{
    Router,
    extract::{Extension, Json, Path, rejection::JsonRejection},
    http::StatusCode,
    routing::{delete, get},
};

use sharebook_core::{CategoryId, LedgerId};

use crate::app::routes::common::{no_content, parse_id, parse_pair, respond};
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/:category_id", delete(delete_category))
}

pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(ledger_id): Path<String>,
) -> axum::response::Response {
    let result = parse_id::<LedgerId>(&ledger_id)
        .and_then(|id| services.categories.list(principal.user_id(), id));
    respond(StatusCode::OK, result)
}

pub async fn create_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(ledger_id): Path<String>,
    body: Result<Json<dto::CreateCategoryRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection(e),
    };
    let result = parse_id::<LedgerId>(&ledger_id)
        .and_then(|id| services.categories.create(principal.user_id(), id, body.into()));
    respond(StatusCode::CREATED, result)
}

pub async fn delete_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path((ledger_id, category_id)): Path<(String, String)>,
) -> axum::response::Response {
    let result = parse_pair::<LedgerId, CategoryId>(&ledger_id, &category_id)
        .and_then(|(ledger_id, category_id)| {
            services
                .categories
                .delete(principal.user_id(), ledger_id, category_id)
        });
    no_content(result)
}
