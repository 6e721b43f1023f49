use serde::{Deserialize, Serialize};

use crate::error::IndicatorError;
use crate::series::{self, Series};

/// Declarative description of a single-series indicator run, as found in
/// config files: `{"kind": "roc", "period": 24, "fraction_digits": 1}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndicatorSpec {
    Sma {
        period: usize,
        #[serde(default)]
        fraction_digits: u32,
    },
    Roc {
        period: usize,
        #[serde(default = "default_roc_digits")]
        fraction_digits: u32,
    },
    StdDev {
        period: usize,
        #[serde(default = "default_std_dev_digits")]
        fraction_digits: u32,
    },
}

fn default_roc_digits() -> u32 {
    series::DEFAULT_ROC_FRACTION_DIGITS
}

fn default_std_dev_digits() -> u32 {
    series::DEFAULT_STD_DEV_FRACTION_DIGITS
}

impl Default for IndicatorSpec {
    fn default() -> Self {
        IndicatorSpec::Roc {
            period: series::DEFAULT_ROC_PERIOD,
            fraction_digits: series::DEFAULT_ROC_FRACTION_DIGITS,
        }
    }
}

impl IndicatorSpec {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn period(&self) -> usize {
        match *self {
            IndicatorSpec::Sma { period, .. }
            | IndicatorSpec::Roc { period, .. }
            | IndicatorSpec::StdDev { period, .. } => period,
        }
    }

    /// Runs the matching batch driver over `prices` (oldest first).
    pub fn evaluate(&self, prices: &[f64]) -> Result<Series, IndicatorError> {
        match *self {
            IndicatorSpec::Sma { period, fraction_digits } => {
                series::get_sma(prices, period, fraction_digits)
            }
            IndicatorSpec::Roc { period, fraction_digits } => {
                series::get_roc(prices, period, fraction_digits)
            }
            IndicatorSpec::StdDev { period, fraction_digits } => {
                series::get_std_dev(prices, period, fraction_digits)
            }
        }
    }

    /// Most recent value of [`evaluate`](Self::evaluate), `None` while the
    /// series is still warming up.
    pub fn latest(&self, prices: &[f64]) -> Result<Option<f64>, IndicatorError> {
        Ok(self.evaluate(prices)?.last().copied().flatten())
    }
}
