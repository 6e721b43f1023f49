//! Rate of change (momentum): percent change against the sample `period`
//! steps back.
//!
//! ROC = (value - value[n]) / value[n] * 100
//!
//! A zero reference sample is not special-cased: the result is `±inf`
//! (or `NaN` for 0 → 0).

use super::{Indicator, Phase};
use crate::common::RingBuffer;

#[derive(Debug, Clone)]
pub struct RateOfChange {
    values: RingBuffer<f64>,
    period: usize,
    phase: Phase,
}

impl RateOfChange {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "period must be > 0");
        Self {
            values: RingBuffer::new(period),
            period,
            phase: Phase::Warmup,
        }
    }

    #[inline]
    fn percent_change(from: f64, to: f64) -> f64 {
        (to - from) / from * 100.0
    }
}

impl Indicator for RateOfChange {
    fn period(&self) -> usize {
        self.period
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn next_value(&mut self, value: f64) -> Option<f64> {
        let evicted = self.values.push(value)?;
        self.phase = Phase::Steady;
        Some(Self::percent_change(evicted, value))
    }

    /// Compares against the oldest held sample, so during warm-up this
    /// previews against a shorter lookback than `next_value` will use.
    fn moment_value(&self, value: f64) -> Option<f64> {
        let oldest = self.values.peek()?;
        Some(Self::percent_change(oldest, value))
    }
}
