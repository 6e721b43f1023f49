//! Simple moving average.
//!
//! O(1) per sample once warm: the running sum is adjusted by the evicted
//! sample instead of rescanning the window.

use super::{Indicator, Phase};
use crate::common::RingBuffer;

#[derive(Debug, Clone)]
pub struct SimpleMovingAverage {
    window: RingBuffer<f64>,
    period: usize,
    sum: f64,
    phase: Phase,
}

impl SimpleMovingAverage {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "period must be > 0");
        Self {
            window: RingBuffer::new(period),
            period,
            sum: 0.0,
            phase: Phase::Warmup,
        }
    }

    #[inline]
    fn mean(&self) -> f64 {
        self.sum / self.period as f64
    }
}

impl Indicator for SimpleMovingAverage {
    fn period(&self) -> usize {
        self.period
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn next_value(&mut self, value: f64) -> Option<f64> {
        match self.phase {
            Phase::Warmup => {
                self.window.push(value);
                self.sum += value;
                if !self.window.is_filled() {
                    return None;
                }
                self.phase = Phase::Steady;
            }
            Phase::Steady => {
                // Full window: push always evicts.
                let evicted = self.window.push(value).unwrap_or_default();
                self.sum = self.sum - evicted + value;
            }
        }
        Some(self.mean())
    }

    fn moment_value(&self, value: f64) -> Option<f64> {
        if self.phase == Phase::Warmup {
            return None;
        }
        let oldest = self.window.peek()?;
        Some((self.sum - oldest + value) / self.period as f64)
    }
}
