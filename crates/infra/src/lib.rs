//! Infrastructure layer: project persistence, sales read model, service wiring.

pub mod forecast_service;
pub mod projects;
pub mod read_model;

pub use forecast_service::{ForecastService, GenerateForecast};
pub use projects::{InMemoryProjectStore, ProjectStore};
pub use read_model::InMemorySalesLedger;
