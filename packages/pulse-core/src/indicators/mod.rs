//! Incremental indicators.

mod correlation;
mod deviation;
mod roc;
mod sma;

pub use correlation::Correlation;
pub use deviation::{MeanAbsoluteDeviation, StandardDeviation};
pub use roc::RateOfChange;
pub use sma::SimpleMovingAverage;

use serde::{Deserialize, Serialize};

/// Lifecycle of an indicator. `Warmup -> Steady` happens exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Warmup,
    Steady,
}

/// Single-series indicator fed one sample at a time.
pub trait Indicator {
    /// Window size.
    fn period(&self) -> usize;

    fn phase(&self) -> Phase;

    /// Commits `value` and returns the new statistic, `None` while warming up.
    fn next_value(&mut self, value: f64) -> Option<f64>;

    /// What `next_value(value)` would return, without committing anything.
    fn moment_value(&self, value: f64) -> Option<f64>;

    fn is_ready(&self) -> bool {
        self.phase() == Phase::Steady
    }
}
