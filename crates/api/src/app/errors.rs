use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use jawara_core::{DomainError, ErrorKind};

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let status = match err.kind() {
        ErrorKind::InvalidParameter => StatusCode::BAD_REQUEST,
        ErrorKind::InsufficientData => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::DuplicateName => StatusCode::CONFLICT,
        ErrorKind::Unauthorized => StatusCode::FORBIDDEN,
    };
    json_error(status, err.kind().as_str(), err.message())
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
