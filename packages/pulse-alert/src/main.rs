//! pulse-alert: scheduled price alert job.
//!
//! Fetches a month of prices per watched currency, computes the rate of
//! change, and posts a Telegram message when the currency's condition
//! holds. Runs once and exits; scheduling is external (cron, cloud timer).

mod alert;
mod cache;
mod config;
mod currency;
mod error;
mod logging;
mod market;
mod notify;

use anyhow::{Context, Result};
use pulse_core::series::DEFAULT_ROC_FRACTION_DIGITS;
use pulse_core::IndicatorSpec;
use tracing::info;

use crate::alert::{Alerter, RetryPolicy};
use crate::cache::PriceCache;
use crate::config::AppConfig;
use crate::market::CoinMarketCap;
use crate::notify::Telegram;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignore if missing).
    dotenv::dotenv().ok();

    logging::init_tracing();

    let config = AppConfig::from_env().context("failed to load configuration")?;

    info!(
        roc_period = config.roc_period,
        currencies = config.currencies.len(),
        max_retries = config.max_retry_count,
        "pulse-alert starting"
    );

    let source = CoinMarketCap::new(config.http_timeout).context("building market data client")?;
    let notifier = Telegram::new(
        config.telegram_bot_key.clone(),
        config.telegram_chat_id,
        config.http_timeout,
    )
    .context("building telegram client")?;
    let cache = PriceCache::open(&config.price_cache_path)
        .with_context(|| format!("opening price cache {}", config.price_cache_path.display()))?;
    info!(path = %cache.path().display(), "price cache ready");

    let roc = IndicatorSpec::Roc {
        period: config.roc_period,
        fraction_digits: DEFAULT_ROC_FRACTION_DIGITS,
    };
    let retry = RetryPolicy {
        max_retries: config.max_retry_count,
        delay: config.retry_delay,
    };

    let mut alerter = Alerter::new(source, notifier, cache, config.currencies, roc, retry);
    let summary = alerter.run().await;

    info!(
        sent = summary.sent,
        quiet = summary.quiet,
        failed = summary.failed,
        cache = %alerter.cache().path().display(),
        "pulse-alert finished"
    );
    Ok(())
}
