use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use jawara_forecast::{AccuracyGrade, ForecastRun, ProjectSummary};
use jawara_sales::SalesRecord;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RenameQuery {
    pub new_name: String,
}

#[derive(Debug, Deserialize)]
pub struct RecordSalesRequest {
    pub records: Vec<SalesRecord>,
}

// -------------------------
// Response DTOs
// -------------------------

/// A run plus the grades a dashboard shows next to it.
#[derive(Debug, Serialize)]
pub struct RunResponse {
    #[serde(flatten)]
    pub run: ForecastRun,
    pub grade: AccuracyGrade,
    pub product_count: usize,
    pub product_grades: BTreeMap<String, AccuracyGrade>,
}

impl From<ForecastRun> for RunResponse {
    fn from(run: ForecastRun) -> Self {
        let product_grades = run
            .results
            .iter()
            .map(|(name, r)| (name.clone(), r.grade()))
            .collect();
        Self {
            grade: run.grade(),
            product_count: run.product_count(),
            product_grades,
            run,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    pub projects: Vec<ProjectSummary>,
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RecordSalesResponse {
    pub recorded: usize,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub removed: usize,
}
