use std::sync::Arc;

use axum::{
    Router,
    extract::{Extension, Json, Path, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};

use sharebook_core::LedgerId;

use crate::app::routes::common::{no_content, parse_id, respond};
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_ledgers).post(create_ledger))
        .route(
            "/:ledger_id",
            get(get_ledger).patch(update_ledger).delete(delete_ledger),
        )
}

pub async fn create_ledger(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    body: Result<Json<dto::CreateLedgerRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection(e),
    };
    respond(
        StatusCode::CREATED,
        services.ledgers.create(principal.user_id(), body.into()),
    )
}

pub async fn list_ledgers(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    respond(StatusCode::OK, services.ledgers.list_mine(principal.user_id()))
}

pub async fn get_ledger(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(ledger_id): Path<String>,
) -> axum::response::Response {
    let result = parse_id::<LedgerId>(&ledger_id)
        .and_then(|id| services.ledgers.get(principal.user_id(), id));
    respond(StatusCode::OK, result)
}

pub async fn update_ledger(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(ledger_id): Path<String>,
    body: Result<Json<dto::UpdateLedgerRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection(e),
    };
    let result = parse_id::<LedgerId>(&ledger_id)
        .and_then(|id| services.ledgers.update(principal.user_id(), id, body.into()));
    respond(StatusCode::OK, result)
}

pub async fn delete_ledger(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(ledger_id): Path<String>,
) -> axum::response::Response {
    let result = parse_id::<LedgerId>(&ledger_id)
        .and_then(|id| services.ledgers.delete(principal.user_id(), id));
    no_content(result)
}
