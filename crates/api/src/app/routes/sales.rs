use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(record_sales))
        .route("/products", get(list_products))
}

pub async fn record_sales(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::RecordSalesRequest>,
) -> axum::response::Response {
    match services.record_sales(body.records, principal.principal()) {
        Ok(recorded) => {
            (StatusCode::CREATED, Json(dto::RecordSalesResponse { recorded })).into_response()
        }
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.forecasts.list_products(principal.principal()) {
        Ok(products) => Json(dto::ProductListResponse { products }).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
