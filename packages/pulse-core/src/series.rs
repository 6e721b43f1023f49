//! Batch drivers: replay a whole price history through one fresh indicator.
//!
//! The output has one slot per input sample; warm-up slots stay `None`.
//! With `fraction_digits > 0` every value is rounded half away from zero,
//! `0` returns raw values.

use crate::error::{check_period, IndicatorError};
use crate::indicators::{Correlation, Indicator, RateOfChange, SimpleMovingAverage, StandardDeviation};

pub type Series = Vec<Option<f64>>;

pub const DEFAULT_ROC_PERIOD: usize = 24;
pub const DEFAULT_ROC_FRACTION_DIGITS: u32 = 1;
pub const DEFAULT_STD_DEV_PERIOD: usize = 8;
pub const DEFAULT_STD_DEV_FRACTION_DIGITS: u32 = 3;
pub const DEFAULT_CORRELATION_PERIOD: usize = 2;
pub const DEFAULT_CORRELATION_FRACTION_DIGITS: u32 = 2;

/// Rounds half away from zero. Non-finite values pass through.
pub fn round_to(value: f64, fraction_digits: u32) -> f64 {
    if fraction_digits == 0 || !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(fraction_digits as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

fn finish(values: Series, fraction_digits: u32) -> Series {
    if fraction_digits == 0 {
        return values;
    }
    values
        .into_iter()
        .map(|v| v.map(|v| round_to(v, fraction_digits)))
        .collect()
}

/// Replays `values` through `build(period)`.
///
/// ```
/// use pulse_core::{compute_series, SimpleMovingAverage};
///
/// let out = compute_series(&[1.0, 2.0, 3.0, 4.0, 5.0], 3, 0, SimpleMovingAverage::new).unwrap();
/// assert_eq!(out, vec![None, None, Some(2.0), Some(3.0), Some(4.0)]);
/// ```
pub fn compute_series<I: Indicator>(
    values: &[f64],
    period: usize,
    fraction_digits: u32,
    build: fn(usize) -> I,
) -> Result<Series, IndicatorError> {
    check_period(period)?;
    let mut indicator = build(period);
    let out = values.iter().map(|&v| indicator.next_value(v)).collect();
    Ok(finish(out, fraction_digits))
}

pub fn get_sma(values: &[f64], period: usize, fraction_digits: u32) -> Result<Series, IndicatorError> {
    compute_series(values, period, fraction_digits, SimpleMovingAverage::new)
}

pub fn get_roc(values: &[f64], period: usize, fraction_digits: u32) -> Result<Series, IndicatorError> {
    compute_series(values, period, fraction_digits, RateOfChange::new)
}

/// Rolling standard deviation around 0, i.e. the root mean square of each
/// window.
pub fn get_std_dev(values: &[f64], period: usize, fraction_digits: u32) -> Result<Series, IndicatorError> {
    check_period(period)?;
    let mut std_dev = StandardDeviation::new(period);
    let out = values.iter().map(|&v| std_dev.next_value(v, 0.0)).collect();
    Ok(finish(out, fraction_digits))
}

/// Rolling Pearson correlation of two equally long series.
pub fn get_correlation(
    series_a: &[f64],
    series_b: &[f64],
    period: usize,
    fraction_digits: u32,
) -> Result<Series, IndicatorError> {
    if series_a.len() != series_b.len() {
        return Err(IndicatorError::ShapeMismatch {
            left: series_a.len(),
            right: series_b.len(),
        });
    }
    check_period(period)?;
    let mut correlation = Correlation::new(period);
    let out = series_a
        .iter()
        .zip(series_b)
        .map(|(&a, &b)| correlation.next_value(a, b))
        .collect();
    Ok(finish(out, fraction_digits))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_half_away_from_zero() {
        assert_eq!(round_to(2.25, 1), 2.3);
        assert_eq!(round_to(-2.25, 1), -2.3);
        assert_eq!(round_to(1.23456, 3), 1.235);
        assert_eq!(round_to(7.5, 0), 7.5);
        assert!(round_to(f64::NAN, 2).is_nan());
        assert_eq!(round_to(f64::INFINITY, 2), f64::INFINITY);
    }

    #[test]
    fn roc_series_rounds() {
        let out = get_roc(&[3.0, 4.0, 5.0], 1, 1).unwrap();
        // 33.33.. and 25
        assert_eq!(out, vec![None, Some(33.3), Some(25.0)]);

        let raw = get_roc(&[3.0, 4.0], 1, 0).unwrap();
        assert!((raw[1].unwrap() - 100.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn sma_series() {
        let out = get_sma(&[1.0, 2.0, 3.0, 4.0, 5.0], 3, 2).unwrap();
        assert_eq!(out, vec![None, None, Some(2.0), Some(3.0), Some(4.0)]);
    }

    #[test]
    fn std_dev_series_is_root_mean_square() {
        let out = get_std_dev(&[1.0, 1.0, 1.0, 1.0], 2, 3).unwrap();
        assert_eq!(out, vec![None, Some(1.0), Some(1.0), Some(1.0)]);

        // window [3, 4]: sqrt((9 + 16) / 2)
        let out = get_std_dev(&[0.0, 3.0, 4.0], 2, 3).unwrap();
        assert_eq!(out[2], Some(3.536));
    }

    #[test]
    fn correlation_rejects_uneven_series() {
        let err = get_correlation(&[1.0, 2.0, 3.0], &[1.0, 2.0], 2, 2).unwrap_err();
        assert_eq!(err, IndicatorError::ShapeMismatch { left: 3, right: 2 });
    }

    #[test]
    fn correlation_series() {
        let a = [1.0, 2.0, 4.0, 3.0];
        let b = [2.0, 4.0, 8.0, 6.0];
        let out = get_correlation(&a, &b, 2, 2).unwrap();
        assert_eq!(out, vec![None, Some(1.0), Some(1.0), Some(1.0)]);
    }

    #[test]
    fn zero_period_is_rejected() {
        assert_eq!(
            get_roc(&[1.0], 0, 1).unwrap_err(),
            IndicatorError::InvalidPeriod { period: 0 }
        );
        assert!(get_std_dev(&[1.0], 0, 1).is_err());
        assert!(get_correlation(&[1.0], &[1.0], 0, 1).is_err());
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(get_roc(&[], DEFAULT_ROC_PERIOD, DEFAULT_ROC_FRACTION_DIGITS)
            .unwrap()
            .is_empty());
    }
}
