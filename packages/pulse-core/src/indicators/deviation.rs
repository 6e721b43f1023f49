//! Dispersion over the last `period` samples, centered on a caller-supplied
//! average.
//!
//! Both providers rescan the window on every call; periods are expected to
//! be small. Sums are always divided by `period`, not by the number of
//! samples currently held.

use super::Phase;
use crate::common::RingBuffer;

/// Mean of `|v - average|` over the window.
///
/// Stays in [`Phase::Warmup`] (buffering samples) until the first call that
/// carries an average, independent of how full the window is. `Some(NaN)`
/// counts as no average; `Some(0.0)` is a valid one.
#[derive(Debug, Clone)]
pub struct MeanAbsoluteDeviation {
    values: RingBuffer<f64>,
    period: usize,
    phase: Phase,
}

impl MeanAbsoluteDeviation {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "period must be > 0");
        Self {
            values: RingBuffer::new(period),
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

    fn centered<I: Iterator<Item = f64>>(&self, window: I, average: f64) -> f64 {
        window.map(|v| (v - average).abs()).sum::<f64>() / self.period as f64
    }

    /// Commits `value`. `average` is typically the SMA of the same stream;
    /// `None` means it is not available yet. Once steady, a missing average
    /// centers on `NaN`.
    pub fn next_value(&mut self, value: f64, average: Option<f64>) -> Option<f64> {
        if self.phase == Phase::Warmup {
            self.values.push(value);
            let average = average.filter(|a| !a.is_nan())?;
            self.phase = Phase::Steady;
            return Some(self.centered(self.values.iter(), average));
        }

        self.values.push(value);
        let average = average.unwrap_or(f64::NAN);
        Some(self.centered(self.values.iter(), average))
    }

    pub fn moment_value(&self, value: f64, average: Option<f64>) -> Option<f64> {
        if self.phase == Phase::Warmup {
            return None;
        }
        let average = average.unwrap_or(f64::NAN);
        Some(self.centered(self.values.iter_pushed(value), average))
    }
}

/// Population standard deviation of the window around `mean`.
#[derive(Debug, Clone)]
pub struct StandardDeviation {
    values: RingBuffer<f64>,
    period: usize,
    phase: Phase,
}

impl StandardDeviation {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "period must be > 0");
        Self {
            values: RingBuffer::new(period),
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

    fn deviation<I: Iterator<Item = f64>>(&self, window: I, mean: f64) -> f64 {
        let ss: f64 = window.map(|v| (v - mean) * (v - mean)).sum();
        (ss / self.period as f64).sqrt()
    }

    /// Commits `value`; `None` until the window has filled.
    pub fn next_value(&mut self, value: f64, mean: f64) -> Option<f64> {
        self.values.push(value);
        if !self.values.is_filled() {
            return None;
        }
        self.phase = Phase::Steady;
        Some(self.deviation(self.values.iter(), mean))
    }

    pub fn moment_value(&self, value: f64, mean: f64) -> Option<f64> {
        if self.phase == Phase::Warmup {
            return None;
        }
        Some(self.deviation(self.values.iter_pushed(value), mean))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mad_waits_for_first_average() {
        let mut mad = MeanAbsoluteDeviation::new(3);
        assert_eq!(mad.next_value(1.0, None), None);
        assert_eq!(mad.next_value(2.0, None), None);
        assert_eq!(mad.moment_value(3.0, Some(2.0)), None);

        // |1-2| + |2-2| + |3-2| = 2, over period 3
        let v = mad.next_value(3.0, Some(2.0)).unwrap();
        assert!((v - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(mad.phase(), Phase::Steady);
    }

    #[test]
    fn mad_nan_average_keeps_buffering() {
        let mut mad = MeanAbsoluteDeviation::new(2);
        assert_eq!(mad.next_value(1.0, Some(f64::NAN)), None);
        assert_eq!(mad.phase(), Phase::Warmup);

        // zero is a real average: window [1, 3] -> (1 + 3) / 2
        assert_eq!(mad.next_value(3.0, Some(0.0)), Some(2.0));
        assert_eq!(mad.phase(), Phase::Steady);
    }

    #[test]
    fn mad_switches_before_window_is_full() {
        let mut mad = MeanAbsoluteDeviation::new(4);
        // divided by period, not by the 1 sample held
        assert_eq!(mad.next_value(6.0, Some(2.0)), Some(1.0));
        assert_eq!(mad.phase(), Phase::Steady);
    }

    #[test]
    fn mad_moment_leaves_window_untouched() {
        let mut mad = MeanAbsoluteDeviation::new(2);
        mad.next_value(1.0, None);
        mad.next_value(3.0, Some(2.0));

        let preview = mad.moment_value(10.0, Some(5.0));
        // window would be [3, 10] -> (2 + 5) / 2
        assert_eq!(preview, Some(3.5));
        assert_eq!(mad.moment_value(10.0, Some(5.0)), preview);
        assert_eq!(mad.next_value(10.0, Some(5.0)), preview);
    }

    #[test]
    fn stddev_population_formula() {
        let mut sd = StandardDeviation::new(4);
        let samples = [2.0, 4.0, 4.0, 6.0];
        let mean = 4.0;
        for &v in &samples[..3] {
            assert_eq!(sd.next_value(v, mean), None);
        }
        let v = sd.next_value(samples[3], mean).unwrap();
        // (4 + 0 + 0 + 4) / 4 = 2
        assert!((v - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn stddev_moment_matches_next() {
        let mut sd = StandardDeviation::new(3);
        for v in [1.0, 2.0, 3.0] {
            sd.next_value(v, 2.0);
        }
        let preview = sd.moment_value(7.0, 4.0);
        let again = sd.moment_value(7.0, 4.0);
        assert_eq!(preview, again);
        assert_eq!(sd.next_value(7.0, 4.0), preview);

        // window [2, 3, 7] around 4: (4 + 1 + 9) / 3
        let expected = (14.0f64 / 3.0).sqrt();
        assert!((preview.unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn stddev_flat_window_is_zero() {
        let mut sd = StandardDeviation::new(2);
        sd.next_value(5.0, 5.0);
        assert_eq!(sd.next_value(5.0, 5.0), Some(0.0));
    }
}
