//! `jawara-forecast`
//!
//! **Responsibility:** single exponential smoothing over daily sales.
//!
//! - [`engine`] computes one product's trace, MAPE and next-period forecast.
//! - [`aggregator`] fans a request out over one or all products and assembles a [`ForecastRun`].
//! - [`result`] holds the immutable run model.
//!
//! Nothing here performs IO or holds shared state; persistence belongs to `jawara-infra`.

pub mod accuracy;
pub mod aggregator;
pub mod engine;
pub mod result;

pub use accuracy::AccuracyGrade;
pub use aggregator::MultiProductAggregator;
pub use engine::{forecast_product, next_forecast, smooth};
pub use result::{
    CreatedBy, ExclusionWarning, ForecastRun, ForecastStep, ProductForecastResult, ProjectSummary,
};
