use std::sync::Arc;

use axum::{
    Router,
    extract::{Extension, Json, Path, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, patch, post},
};

use sharebook_core::{LedgerId, MemberId};

use crate::app::routes::common::{no_content, parse_id, parse_pair, respond};
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_members))
        .route("/invite", post(invite_member))
        .route("/:member_id", patch(update_member_role).delete(remove_member))
}

pub async fn list_members(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(ledger_id): Path<String>,
) -> axum::response::Response {
    let result = parse_id::<LedgerId>(&ledger_id)
        .and_then(|id| services.members.list(principal.user_id(), id));
    respond(StatusCode::OK, result)
}

pub async fn invite_member(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(ledger_id): Path<String>,
    body: Result<Json<dto::InviteMemberRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection(e),
    };
    let result = parse_id::<LedgerId>(&ledger_id)
        .and_then(|id| {
            let role = dto::parse_role(body.role.as_deref())?;
            services
                .members
                .invite(principal.user_id(), id, &body.email, role)
        });
    respond(StatusCode::CREATED, result)
}

pub async fn update_member_role(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path((ledger_id, member_id)): Path<(String, String)>,
    body: Result<Json<dto::UpdateMemberRoleRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(b) => b,
        Err(e) => return errors::json_rejection(e),
    };
    let result = parse_pair::<LedgerId, MemberId>(&ledger_id, &member_id)
        .and_then(|(ledger_id, member_id)| {
            let role = dto::parse_role(body.role.as_deref())?;
            services
                .members
                .update_role(principal.user_id(), ledger_id, member_id, role)
        });
    respond(StatusCode::OK, result)
}

pub async fn remove_member(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path((ledger_id, member_id)): Path<(String, String)>,
) -> axum::response::Response {
    let result = parse_pair::<LedgerId, MemberId>(&ledger_id, &member_id)
        .and_then(|(ledger_id, member_id)| {
            services
                .members
                .remove(principal.user_id(), ledger_id, member_id)
        });
    no_content(result)
}
