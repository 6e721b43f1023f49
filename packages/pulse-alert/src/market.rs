//! Market data: price history for one currency, oldest first.

use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::AlertError;

const CMC_CHART_URL: &str = "https://api.coinmarketcap.com/data-api/v3/cryptocurrency/detail/chart";
const CMC_RANGE: &str = "1M";

pub trait PriceSource {
    async fn fetch_prices(&self, id: u64) -> Result<Vec<f64>, AlertError>;
}

/// CoinMarketCap public chart endpoint (one month of points).
#[derive(Debug, Clone)]
pub struct CoinMarketCap {
    client: reqwest::Client,
    chart_url: String,
}

impl CoinMarketCap {
    pub fn new(timeout: Duration) -> Result<Self, AlertError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            chart_url: CMC_CHART_URL.to_string(),
        })
    }
}

impl PriceSource for CoinMarketCap {
    async fn fetch_prices(&self, id: u64) -> Result<Vec<f64>, AlertError> {
        let body = self
            .client
            .get(&self.chart_url)
            .query(&[("id", id.to_string()), ("range", CMC_RANGE.to_string())])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let prices = parse_chart(&body)?;
        debug!(id, points = prices.len(), "fetched chart");
        Ok(prices)
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    data: Option<ChartData>,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    points: HashMap<String, ChartPoint>,
}

#[derive(Debug, Deserialize)]
struct ChartPoint {
    #[serde(default)]
    v: Vec<serde_json::Value>,
}

/// `data.points` is keyed by unix timestamp; `v[0]` is the price.
/// Points are sorted by timestamp; unusable points are skipped.
pub(crate) fn parse_chart(body: &str) -> Result<Vec<f64>, AlertError> {
    let response: ChartResponse = serde_json::from_str(body)?;
    let data = response
        .data
        .ok_or_else(|| AlertError::MalformedResponse("missing `data`".into()))?;

    let mut points: Vec<(i64, f64)> = Vec::with_capacity(data.points.len());
    for (key, point) in data.points {
        let Ok(ts) = key.parse::<i64>() else {
            warn!(key = %key, "skipping chart point with non-numeric timestamp");
            continue;
        };
        match point.v.first().and_then(serde_json::Value::as_f64) {
            Some(price) => points.push((ts, price)),
            None => warn!(ts, "skipping chart point without price"),
        }
    }
    points.sort_unstable_by_key(|&(ts, _)| ts);

    Ok(points.into_iter().map(|(_, price)| price).collect())
}
