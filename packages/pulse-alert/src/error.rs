use pulse_core::IndicatorError;
use thiserror::Error;

/// Failures of one alert evaluation. `main` wraps these with `anyhow`.
#[derive(Error, Debug)]
pub enum AlertError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("no prices returned for {slug}")]
    EmptySeries { slug: String },

    #[error("malformed market data: {0}")]
    MalformedResponse(String),

    #[error("notifier rejected message: {0}")]
    Notifier(String),

    #[error(transparent)]
    Indicator(#[from] IndicatorError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
