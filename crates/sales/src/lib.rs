//! Sales data consumed by the forecasting engine.
//!
//! This crate only models the data and the provider seams; storage lives in
//! `jawara-infra` (or in whatever external system implements the traits).

pub mod provider;
pub mod record;

pub use provider::{ProductCatalog, SalesSeriesProvider};
pub use record::{SalesRecord, SeriesPoint};
