use serde::{Deserialize, Serialize};

/// Coarse reading of a MAPE value for dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccuracyGrade {
    /// MAPE below 15%.
    Excellent,
    /// MAPE in [15%, 25%).
    Good,
    Poor,
}

impl AccuracyGrade {
    pub const EXCELLENT_BELOW: f64 = 15.0;
    pub const GOOD_BELOW: f64 = 25.0;

    pub fn from_mape(mape: f64) -> Self {
        if mape < Self::EXCELLENT_BELOW {
            AccuracyGrade::Excellent
        } else if mape < Self::GOOD_BELOW {
            AccuracyGrade::Good
        } else {
            AccuracyGrade::Poor
        }
    }
}

/// Arithmetic mean; `None` for an empty input.
pub(crate) fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, n) = values
        .into_iter()
        .fold((0.0_f64, 0_usize), |(s, n), v| (s + v, n + 1));
    if n == 0 { None } else { Some(sum / n as f64) }
}
