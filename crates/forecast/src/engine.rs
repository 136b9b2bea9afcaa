//! Single exponential smoothing for one product.
//!
//! Model:
//! - `F[1] = A[1]` (no prior forecast, so period 1 has zero error).
//! - `F[t] = alpha * A[t-1] + (1 - alpha) * F[t-1]` for `t > 1`.
//! - next period: `alpha * A[n] + (1 - alpha) * F[n]`.
//!
//! MAPE averages `|A - F| / A * 100` over periods with `A != 0`; zero-sales
//! periods are flagged and skipped rather than producing an infinite term.

use jawara_core::{Alpha, DomainError, DomainResult};
use jawara_sales::SeriesPoint;

use crate::accuracy::mean;
use crate::result::{ForecastStep, ProductForecastResult};

/// One-step-ahead SES forecasts aligned with `actuals`.
///
/// Returns an empty vector for an empty input.
pub fn smooth(actuals: &[f64], alpha: Alpha) -> Vec<f64> {
    let Some(&first) = actuals.first() else {
        return Vec::new();
    };

    let mut forecasts = Vec::with_capacity(actuals.len());
    forecasts.push(first);
    for t in 1..actuals.len() {
        let prev = forecasts[t - 1];
        forecasts.push(next_forecast(actuals[t - 1], prev, alpha));
    }
    forecasts
}

/// Blend the latest actual with the latest forecast.
pub fn next_forecast(actual: f64, forecast: f64, alpha: Alpha) -> f64 {
    alpha.value() * actual + alpha.complement() * forecast
}

/// Full SES trace, MAPE and next-period forecast for one product.
///
/// Fails `InsufficientData` for an empty series or when every period has zero
/// sales (MAPE undefined).
pub fn forecast_product(
    product_name: &str,
    series: &[SeriesPoint],
    alpha: Alpha,
) -> DomainResult<ProductForecastResult> {
    if series.is_empty() {
        return Err(DomainError::insufficient_data(format!(
            "no sales recorded for '{product_name}'"
        )));
    }

    let actuals: Vec<f64> = series.iter().map(|p| f64::from(p.actual)).collect();
    let forecasts = smooth(&actuals, alpha);

    let steps: Vec<ForecastStep> = series
        .iter()
        .zip(&forecasts)
        .enumerate()
        .map(|(i, (point, &forecast))| ForecastStep::new(i + 1, point.date, point.actual, forecast))
        .collect();

    let mape = mean(steps.iter().filter_map(|s| s.error_percent)).ok_or_else(|| {
        DomainError::insufficient_data(format!(
            "all {} period(s) of '{product_name}' have zero sales; MAPE is undefined",
            steps.len()
        ))
    })?;

    let n = actuals.len() - 1;
    let next_period_forecast = next_forecast(actuals[n], forecasts[n], alpha);

    Ok(ProductForecastResult {
        product_name: product_name.to_string(),
        steps,
        mape,
        next_period_forecast,
    })
}
