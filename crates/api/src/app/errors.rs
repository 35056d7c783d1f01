use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use sharebook_core::{DomainError, ErrorKind};

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidToken | ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
        ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let kind = err.kind();
    let status = status_for(kind);

    if kind == ErrorKind::Storage {
        // Internal details stay in the log.
        tracing::error!(error = %err, "request failed");
        return json_error(status, kind.code(), "Internal server error");
    }

    if err.field_errors().is_empty() {
        return json_error(status, kind.code(), err.message());
    }

    (
        status,
        axum::Json(json!({
            "error": kind.code(),
            "message": err.message(),
            "field_errors": err.field_errors(),
        })),
    )
        .into_response()
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn json_rejection(rejection: JsonRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "bad_request", rejection.body_text())
}

pub fn query_rejection(rejection: QueryRejection) -> axum::response::Response {
    json_error(StatusCode::BAD_REQUEST, "bad_request", rejection.body_text())
}
