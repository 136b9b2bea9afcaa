use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use jawara_infra::GenerateForecast;

use crate::app::{dto, errors};
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(generate_forecast))
        .route("/latest", get(get_latest))
        .route("/projects", get(list_projects).delete(reset_projects))
        .route(
            "/project/:name",
            get(get_project).put(rename_project).delete(delete_project),
        )
}

pub async fn generate_forecast(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<GenerateForecast>,
) -> axum::response::Response {
    // SES over the whole catalog is CPU-bound; keep it off the async workers.
    let outcome = tokio::task::spawn_blocking(move || {
        services
            .forecasts
            .generate_forecast(&body, principal.principal())
    })
    .await;

    match outcome {
        Ok(Ok(run)) => {
            let status = if run.is_named() { StatusCode::CREATED } else { StatusCode::OK };
            (status, Json(dto::RunResponse::from(run))).into_response()
        }
        Ok(Err(e)) => errors::domain_error_to_response(e),
        Err(e) => {
            tracing::error!("forecast task failed: {e}");
            errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "forecast task failed",
            )
        }
    }
}

pub async fn get_latest(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.forecasts.get_latest(principal.principal()) {
        Ok(run) => Json(dto::RunResponse::from(run)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_projects(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.forecasts.list_projects(principal.principal()) {
        Ok(projects) => Json(dto::ProjectListResponse { projects }).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn reset_projects(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.forecasts.reset_projects(principal.principal()) {
        Ok(removed) => Json(dto::ResetResponse { removed }).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_project(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(name): Path<String>,
) -> axum::response::Response {
    match services.forecasts.get_project(&name, principal.principal()) {
        Ok(run) => Json(dto::RunResponse::from(run)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn rename_project(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(name): Path<String>,
    Query(query): Query<dto::RenameQuery>,
) -> axum::response::Response {
    match services
        .forecasts
        .rename_project(&name, &query.new_name, principal.principal())
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_project(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(name): Path<String>,
) -> axum::response::Response {
    match services.forecasts.delete_project(&name, principal.principal()) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
