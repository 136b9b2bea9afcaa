use axum::{routing::get, Router};

pub mod forecast;
pub mod sales;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/forecast", forecast::router())
        .nest("/sales", sales::router())
}
