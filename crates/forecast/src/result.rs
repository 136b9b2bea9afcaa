use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use jawara_auth::{Principal, PrincipalId, Role};
use jawara_core::Alpha;

use crate::accuracy::AccuracyGrade;

/// One period of a product's SES trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastStep {
    /// 1-based position in the series.
    pub period: usize,
    pub date: NaiveDate,
    pub actual: u32,
    pub forecast: f64,
    pub absolute_error: f64,
    /// `None` when `actual == 0`; such steps do not count towards MAPE.
    pub error_percent: Option<f64>,
    /// `100 - error_percent`; may go negative when the forecast misses by more than the actual.
    pub accuracy_percent: Option<f64>,
    pub excluded: bool,
}

impl ForecastStep {
    pub(crate) fn new(period: usize, date: NaiveDate, actual: u32, forecast: f64) -> Self {
        let absolute_error = (f64::from(actual) - forecast).abs();
        let error_percent = if actual == 0 {
            None
        } else {
            Some(absolute_error / f64::from(actual) * 100.0)
        };
        Self {
            period,
            date,
            actual,
            forecast,
            absolute_error,
            excluded: error_percent.is_none(),
            accuracy_percent: error_percent.map(|e| 100.0 - e),
            error_percent,
        }
    }
}

/// SES output for a single product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductForecastResult {
    pub product_name: String,
    pub steps: Vec<ForecastStep>,
    pub mape: f64,
    pub next_period_forecast: f64,
}

impl ProductForecastResult {
    pub fn grade(&self) -> AccuracyGrade {
        AccuracyGrade::from_mape(self.mape)
    }

    pub fn excluded_periods(&self) -> usize {
        self.steps.iter().filter(|s| s.excluded).count()
    }
}

/// Who generated a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedBy {
    pub principal_id: PrincipalId,
    pub roles: Vec<Role>,
}

impl From<&Principal> for CreatedBy {
    fn from(principal: &Principal) -> Self {
        Self {
            principal_id: principal.principal_id,
            roles: principal.roles.clone(),
        }
    }
}

/// A product the aggregator dropped from a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionWarning {
    pub product_name: String,
    pub reason: String,
}

/// One generation of forecasts under a single alpha ("project" once named).
///
/// Built whole by the aggregator and never mutated afterwards; regenerating
/// produces a new run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRun {
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: CreatedBy,
    pub alpha: Alpha,
    /// Keyed by product name (ordered, so serialization is reproducible).
    pub results: BTreeMap<String, ProductForecastResult>,
    /// Mean of the included products' MAPE, one weight per product.
    pub overall_mape: f64,
    #[serde(default)]
    pub warnings: Vec<ExclusionWarning>,
}

impl ForecastRun {
    pub fn product_count(&self) -> usize {
        self.results.len()
    }

    pub fn grade(&self) -> AccuracyGrade {
        AccuracyGrade::from_mape(self.overall_mape)
    }

    pub fn is_named(&self) -> bool {
        self.name.is_some()
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Listing entry for a stored project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub created_by: CreatedBy,
    pub alpha: Alpha,
    pub product_count: usize,
    pub overall_mape: f64,
}

impl ProjectSummary {
    pub fn of(name: impl Into<String>, run: &ForecastRun) -> Self {
        Self {
            name: name.into(),
            created_at: run.created_at,
            created_by: run.created_by.clone(),
            alpha: run.alpha,
            product_count: run.product_count(),
            overall_mape: run.overall_mape,
        }
    }
}
