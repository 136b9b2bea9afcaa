use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use jawara_core::DomainError;

/// One day of sales for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub product_name: String,
    pub date: NaiveDate,
    #[serde(alias = "qty")]
    pub quantity: u32,
}

impl SalesRecord {
    pub fn new(product_name: impl Into<String>, date: NaiveDate, quantity: u32) -> Self {
        Self {
            product_name: product_name.into(),
            date,
            quantity,
        }
    }

    /// Trimmed, non-empty product name.
    pub fn validated(mut self) -> Result<Self, DomainError> {
        let trimmed = self.product_name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_parameter("product_name cannot be empty"));
        }
        if trimmed.len() != self.product_name.len() {
            self.product_name = trimmed.to_string();
        }
        Ok(self)
    }

    pub fn point(&self) -> SeriesPoint {
        SeriesPoint {
            date: self.date,
            actual: self.quantity,
        }
    }
}

/// One `(date, actual)` observation of a product's series.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub actual: u32,
}

impl SeriesPoint {
    pub fn new(date: NaiveDate, actual: u32) -> Self {
        Self { date, actual }
    }
}
