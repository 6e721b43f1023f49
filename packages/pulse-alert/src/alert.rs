//! One alert run: quote every watched currency, build the message, send it,
//! and remember the prices that were reported.

use std::collections::HashSet;
use std::time::Duration;

use pulse_core::{round_to, IndicatorSpec};
use tracing::{debug, error, info, warn};

use crate::cache::PriceCache;
use crate::currency::{Currency, CurrencyTable};
use crate::error::AlertError;
use crate::market::PriceSource;
use crate::notify::Notifier;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first failed attempt.
    pub max_retries: u32,
    pub delay: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Quote {
    /// Last price, rounded for display.
    price: f64,
    /// Last price as fetched; this is what gets cached.
    last: f64,
    roc: Option<f64>,
}

/// A composed message and the cache writes to apply once it is delivered.
#[derive(Debug, Default, PartialEq)]
pub struct Composed {
    pub message: String,
    pub prices: Vec<(String, f64)>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub sent: usize,
    pub quiet: usize,
    pub failed: usize,
}

pub struct Alerter<S, N> {
    source: S,
    notifier: N,
    cache: PriceCache,
    currencies: CurrencyTable,
    roc: IndicatorSpec,
    retry: RetryPolicy,
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map_or_else(|| "n/a".to_string(), |v| v.to_string())
}

fn head_line(currency: &Currency, quote: &Quote) -> String {
    format!(
        r#"<a href="{}">{}</a> {}$ | {}%"#,
        currency.url,
        currency.slug,
        quote.price,
        fmt_opt(quote.roc)
    )
}

fn compare_line(currency: &Currency, quote: &Quote, base_roc: Option<f64>) -> String {
    let diff = quote
        .roc
        .zip(base_roc)
        .map_or_else(|| "n/a".to_string(), |(a, b)| format!("{:.1}", (a - b).abs()));
    format!(
        "\n<a href=\"{}\">{}</a> {}$ | {}% | diff {}%",
        currency.url,
        currency.slug,
        quote.price,
        fmt_opt(quote.roc),
        diff
    )
}

impl<S: PriceSource, N: Notifier> Alerter<S, N> {
    pub fn new(
        source: S,
        notifier: N,
        cache: PriceCache,
        currencies: CurrencyTable,
        roc: IndicatorSpec,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            source,
            notifier,
            cache,
            currencies,
            roc,
            retry,
        }
    }

    pub fn cache(&self) -> &PriceCache {
        &self.cache
    }

    fn currency(&self, slug: &str) -> Result<&Currency, AlertError> {
        self.currencies
            .get(slug)
            .ok_or_else(|| AlertError::UnknownCurrency(slug.to_string()))
    }

    async fn quote(&self, currency: &Currency) -> Result<Quote, AlertError> {
        let prices = self.source.fetch_prices(currency.id).await?;
        let last = *prices.last().ok_or_else(|| AlertError::EmptySeries {
            slug: currency.slug.clone(),
        })?;
        let roc = self.roc.latest(&prices)?;
        let price = match currency.price_fraction_digits {
            0 => last.round(),
            digits => round_to(last, digits),
        };
        Ok(Quote {
            price,
            last,
            roc,
        })
    }

    /// Builds the message for `slug`. Empty when its condition does not hold.
    ///
    /// Comparisons are followed depth first through each compared
    /// currency's own `compare_with`, visiting every slug once.
    pub async fn compose(&self, slug: &str) -> Result<Composed, AlertError> {
        let currency = self.currency(slug)?;
        let quote = self.quote(currency).await?;

        let fires = currency
            .condition
            .is_some_and(|c| c.holds(quote.price, self.cache.get_price(slug)));
        if !fires {
            debug!(slug, price = quote.price, "condition not met");
            return Ok(Composed::default());
        }

        let mut composed = Composed {
            message: head_line(currency, &quote),
            prices: vec![(slug.to_string(), quote.last)],
        };

        let mut visited = HashSet::from([slug.to_string()]);
        let mut pending: Vec<(&str, Option<f64>)> = currency
            .compare_with
            .iter()
            .rev()
            .map(|s| (s.as_str(), quote.roc))
            .collect();

        while let Some((other, base_roc)) = pending.pop() {
            if !visited.insert(other.to_string()) {
                continue;
            }
            let compared = self.currency(other)?;
            let q = self.quote(compared).await?;
            composed.message.push_str(&compare_line(compared, &q, base_roc));
            composed.prices.push((other.to_string(), q.last));
            pending.extend(compared.compare_with.iter().rev().map(|s| (s.as_str(), q.roc)));
        }

        Ok(composed)
    }

    /// Compose and deliver. Returns the delivered message, `None` when the
    /// condition did not hold.
    async fn deliver(&self, slug: &str) -> Result<Option<Composed>, AlertError> {
        let composed = self.compose(slug).await?;
        if composed.message.is_empty() {
            return Ok(None);
        }
        self.notifier.send(&composed.message).await?;
        Ok(Some(composed))
    }

    /// [`deliver`](Self::deliver) with retries, then record the reported
    /// prices. A delivered message is never retried; a failure to record it
    /// is reported like a final delivery failure.
    pub async fn dispatch_with_retry(&mut self, slug: &str) -> Result<bool, AlertError> {
        let mut attempt = 0;
        let delivered = loop {
            match self.deliver(slug).await {
                Ok(delivered) => break delivered,
                Err(e) if attempt < self.retry.max_retries => {
                    attempt += 1;
                    warn!(slug, attempt, error = %e, "dispatch failed, retrying");
                    tokio::time::sleep(self.retry.delay).await;
                }
                Err(e) => {
                    error!(slug, error = %e, "dispatch failed, giving up");
                    self.report(format!("Error when fetching {slug}: {e}")).await;
                    return Err(e);
                }
            }
        };

        let Some(composed) = delivered else {
            return Ok(false);
        };
        for (other, price) in &composed.prices {
            if let Err(e) = self.cache.update_price(other, *price) {
                error!(slug, cached = %other, error = %e, "failed to record price");
                self.report(format!("Error when saving {other}: {e}")).await;
                return Err(e);
            }
        }
        Ok(true)
    }

    async fn report(&self, text: String) {
        if let Err(e) = self.notifier.send(&text).await {
            error!(error = %e, "failed to report error");
        }
    }

    /// Processes every watched currency in table order.
    pub async fn run(&mut self) -> RunSummary {
        let slugs: Vec<String> = self.currencies.watched().map(|c| c.slug.clone()).collect();
        let mut summary = RunSummary::default();

        for slug in &slugs {
            match self.dispatch_with_retry(slug).await {
                Ok(true) => {
                    info!(slug = %slug, "alert sent");
                    summary.sent += 1;
                }
                Ok(false) => summary.quiet += 1,
                Err(_) => summary.failed += 1,
            }
        }
        summary
    }
}
