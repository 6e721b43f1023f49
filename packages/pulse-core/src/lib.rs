//! pulse-core: streaming technical indicators.
//!
//! Every indicator is a small state machine over a fixed-capacity
//! [`RingBuffer`]: it answers `None` while warming up and a value once its
//! window is full. `moment_value` previews the next value without
//! committing it.
//!
//! Arithmetic is plain `f64`. A zero reference price (rate of change) or a
//! flat window (correlation) yields `Some(NaN)` / `Some(±inf)`; those are
//! returned as-is, never mapped to `None`.

pub mod common;
pub mod error;
pub mod indicators;
pub mod series;
pub mod spec;

pub use common::RingBuffer;
pub use error::IndicatorError;
pub use indicators::{
    Correlation, Indicator, MeanAbsoluteDeviation, Phase, RateOfChange, SimpleMovingAverage,
    StandardDeviation,
};
pub use series::{
    compute_series, get_correlation, get_roc, get_sma, get_std_dev, round_to, Series,
};
pub use spec::IndicatorSpec;
