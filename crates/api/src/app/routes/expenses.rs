use std::sync::Arc;

use axum::{
    Router,
    extract::{
        Extension, Json, Path, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    routing::get,
};

use sharebook_core::{ExpenseId, LedgerId};

use crate::app::routes::common::{no_content, parse_id, parse_pair, respond};
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_expenses).post(create_expense))
        .route(
            "/:expense_id",
            get(get_expense).patch(update_expense).delete(delete_expense),
        )
}

pub async fn list_expenses(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(ledger_id): Path<String>,
    query: Result<Query<dto::ExpenseQuery>, QueryRejection>,
) -> axum::response::Response {
    let Query(query) = match query {
        Ok(q) => q,
        Err(e) => return errors::query_rejection(e),
    };
    let result = parse_id::<LedgerId>(&ledger_id)
        .and_then(|ledger_id| {
            let (filter, page) = query.into_parts()?;
            services
                .expenses
                .list(principal.user_id(), ledger_id, &filter, page)
        });
    respond(StatusCode::OK, result)
}

pub async fn get_expense(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path((ledger_id, expense_id)): Path<(String, String)>,
) -> axum::response::Response {
    let result = parse_pair::<LedgerId, ExpenseId>(&ledger_id, &expense_id)
        .and_then(|(ledger_id, expense_id)| {
            services
                .expenses
                .get(principal.user_id(), ledger_id, expense_id)
        });
    respond(StatusCode::OK, result)
}

pub async fn create_expense(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(ledger_id): Path<String>,
    body: Result<Json<dto::CreateExpenseRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection(e),
    };
    let result = parse_id::<LedgerId>(&ledger_id)
        .and_then(|ledger_id| {
            let input = body.into_input()?;
            services
                .expenses
                .create(principal.user_id(), ledger_id, input)
        });
    respond(StatusCode::CREATED, result)
}

pub async fn update_expense(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path((ledger_id, expense_id)): Path<(String, String)>,
    body: Result<Json<dto::UpdateExpenseRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection(e),
    };
    let result = parse_pair::<LedgerId, ExpenseId>(&ledger_id, &expense_id)
        .and_then(|(ledger_id, expense_id)| {
            let input = body.into_input()?;
            services
                .expenses
                .update(principal.user_id(), ledger_id, expense_id, input)
        });
    respond(StatusCode::OK, result)
}

pub async fn delete_expense(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path((ledger_id, expense_id)): Path<(String, String)>,
) -> axum::response::Response {
    let result = parse_pair::<LedgerId, ExpenseId>(&ledger_id, &expense_id)
        .and_then(|(ledger_id, expense_id)| {
            services
                .expenses
                .delete(principal.user_id(), ledger_id, expense_id)
        });
    no_content(result)
}
