//! Smoothing factor for single exponential smoothing.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_object::ValueObject;

/// Weight given to the most recent actual value, strictly inside (0, 1).
///
/// Deserialization goes through [`Alpha::new`], so an out-of-range value can
/// never be smuggled in through JSON.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Alpha(f64);

impl Alpha {
    pub fn new(value: f64) -> Result<Self, DomainError> {
        // NaN fails both comparisons.
        if value > 0.0 && value < 1.0 {
            Ok(Self(value))
        } else {
            Err(DomainError::invalid_parameter(format!(
                "alpha must be strictly between 0 and 1, got {value}"
            )))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// `1 - alpha`, the weight carried over from the previous forecast.
    pub fn complement(&self) -> f64 {
        1.0 - self.0
    }
}

impl ValueObject for Alpha {}

impl TryFrom<f64> for Alpha {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Alpha> for f64 {
    fn from(value: Alpha) -> Self {
        value.0
    }
}

impl core::fmt::Display for Alpha {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}
