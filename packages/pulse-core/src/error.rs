use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndicatorError {
    #[error("period must be > 0 (got {period})")]
    InvalidPeriod { period: usize },

    #[error("paired series differ in length ({left} vs {right})")]
    ShapeMismatch { left: usize, right: usize },
}

pub(crate) fn check_period(period: usize) -> Result<(), IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::InvalidPeriod { period });
    }
    Ok(())
}
