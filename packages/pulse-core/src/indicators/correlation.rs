//! Pearson correlation of two series sampled in lockstep.
//!
//! r = Σ(x-x̄)(y-ȳ) / sqrt(Σ(x-x̄)² · Σ(y-ȳ)²)
//!
//! Both series must be fed with the same cadence; there is no alignment.
//! A flat window on either side gives 0/0 = `NaN`.

use super::{Indicator, Phase, SimpleMovingAverage};
use crate::common::RingBuffer;

#[derive(Debug, Clone)]
pub struct Correlation {
    xs: RingBuffer<f64>,
    ys: RingBuffer<f64>,
    sma_x: SimpleMovingAverage,
    sma_y: SimpleMovingAverage,
    period: usize,
    phase: Phase,
}

impl Correlation {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "period must be > 0");
        Self {
            xs: RingBuffer::new(period),
            ys: RingBuffer::new(period),
            sma_x: SimpleMovingAverage::new(period),
            sma_y: SimpleMovingAverage::new(period),
            period,
            phase: Phase::Warmup,
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn pearson<X, Y>(xs: X, ys: Y, mean_x: f64, mean_y: f64) -> f64
    where
        X: Iterator<Item = f64>,
        Y: Iterator<Item = f64>,
    {
        let mut ss_xy = 0.0;
        let mut ss_xx = 0.0;
        let mut ss_yy = 0.0;
        for (x, y) in xs.zip(ys) {
            let dx = x - mean_x;
            let dy = y - mean_y;
            ss_xy += dx * dy;
            ss_xx += dx * dx;
            ss_yy += dy * dy;
        }
        ss_xy / (ss_xx * ss_yy).sqrt()
    }

    /// Commits one `(x, y)` pair. `None` until both windows are full.
    pub fn next_value(&mut self, x: f64, y: f64) -> Option<f64> {
        self.xs.push(x);
        self.ys.push(y);
        let mean_x = self.sma_x.next_value(x);
        let mean_y = self.sma_y.next_value(y);

        let (mean_x, mean_y) = mean_x.zip(mean_y)?;
        self.phase = Phase::Steady;
        Some(Self::pearson(self.xs.iter(), self.ys.iter(), mean_x, mean_y))
    }

    /// Correlation after a hypothetical `(x, y)` pair, without committing it.
    pub fn moment_value(&self, x: f64, y: f64) -> Option<f64> {
        let mean_x = self.sma_x.moment_value(x)?;
        let mean_y = self.sma_y.moment_value(y)?;
        Some(Self::pearson(
            self.xs.iter_pushed(x),
            self.ys.iter_pushed(y),
            mean_x,
            mean_y,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_series_correlate_to_one() {
        let mut c = Correlation::new(4);
        let xs = [1.0, 3.0, 2.0, 5.0, 4.0, 6.0];
        let out: Vec<_> = xs.iter().map(|&x| c.next_value(x, x)).collect();

        assert!(out[..3].iter().all(Option::is_none));
        for r in &out[3..] {
            assert!((r.unwrap() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn negated_series_correlate_to_minus_one() {
        let mut c = Correlation::new(3);
        let mut last = None;
        for x in [2.0, 7.0, 1.0, 8.0, 3.0] {
            last = c.next_value(x, -x);
        }
        assert!((last.unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn flat_window_is_nan() {
        let mut c = Correlation::new(2);
        c.next_value(1.0, 5.0);
        let r = c.next_value(2.0, 5.0);
        assert!(r.is_some_and(f64::is_nan));
    }

    #[test]
    fn moment_previews_next() {
        let mut c = Correlation::new(3);
        for (x, y) in [(1.0, 2.0), (2.0, 1.0), (3.0, 4.0)] {
            c.next_value(x, y);
        }
        let preview = c.moment_value(5.0, 3.0);
        assert!(preview.is_some());
        assert_eq!(c.moment_value(5.0, 3.0), preview);
        assert_eq!(c.next_value(5.0, 3.0), preview);
    }

    #[test]
    fn warmup_until_both_windows_fill() {
        let mut c = Correlation::new(2);
        assert_eq!(c.next_value(1.0, 1.0), None);
        assert_eq!(c.moment_value(2.0, 2.0), None);
        assert_eq!(c.phase(), Phase::Warmup);
        assert!(c.next_value(2.0, 3.0).is_some());
        assert_eq!(c.phase(), Phase::Steady);
    }
}
