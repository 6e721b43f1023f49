//! Runtime configuration, loaded from environment variables with defaults.
//!
//! | Env Var             | Default                                   |
//! |---------------------|-------------------------------------------|
//! | `TELEGRAM_BOT_KEY`  | required                                  |
//! | `TELEGRAM_CHAT_ID`  | required                                  |
//! | `ROC_PERIOD`        | 24                                        |
//! | `MAX_RETRY_COUNT`   | 1                                         |
//! | `RETRY_DELAY_MS`    | 1500                                      |
//! | `HTTP_TIMEOUT_SECS` | 10                                        |
//! | `PRICE_CACHE_PATH`  | `/function/storage/files/db.json` or `./db.json` |
//! | `CURRENCIES_PATH`   | built-in table                            |

use std::path::{Path, PathBuf};
use std::time::Duration;

use pulse_core::series::DEFAULT_ROC_PERIOD;

use crate::currency::CurrencyTable;
use crate::error::AlertError;

const CLOUD_STORAGE_DIR: &str = "/function/storage/files";
const CACHE_FILE: &str = "db.json";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub telegram_bot_key: String,
    pub telegram_chat_id: i64,
    pub roc_period: usize,
    /// Retries after the first failed attempt.
    pub max_retry_count: u32,
    pub retry_delay: Duration,
    pub http_timeout: Duration,
    pub price_cache_path: PathBuf,
    pub currencies: CurrencyTable,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AlertError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AlertError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let telegram_bot_key = get("TELEGRAM_BOT_KEY")
            .ok_or_else(|| AlertError::Config("TELEGRAM_BOT_KEY is not set".into()))?;

        let telegram_chat_id = get("TELEGRAM_CHAT_ID")
            .ok_or_else(|| AlertError::Config("TELEGRAM_CHAT_ID is not set".into()))?
            .trim()
            .parse::<i64>()
            .map_err(|e| AlertError::Config(format!("TELEGRAM_CHAT_ID: {e}")))?;

        let roc_period = parse_or(&get, "ROC_PERIOD", DEFAULT_ROC_PERIOD)?;
        if roc_period == 0 {
            return Err(AlertError::Config("ROC_PERIOD must be > 0".into()));
        }
        let max_retry_count = parse_or(&get, "MAX_RETRY_COUNT", 1)?;
        let retry_delay = Duration::from_millis(parse_or(&get, "RETRY_DELAY_MS", 1500)?);
        let http_timeout = Duration::from_secs(parse_or(&get, "HTTP_TIMEOUT_SECS", 10)?);

        let price_cache_path = get("PRICE_CACHE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_cache_path);

        let currencies = match get("CURRENCIES_PATH") {
            Some(path) => {
                let contents = std::fs::read_to_string(&path)?;
                CurrencyTable::from_json(&contents)?
            }
            None => CurrencyTable::builtin(),
        };

        Ok(Self {
            telegram_bot_key,
            telegram_chat_id,
            roc_period,
            max_retry_count,
            retry_delay,
            http_timeout,
            price_cache_path,
            currencies,
        })
    }
}

fn default_cache_path() -> PathBuf {
    let dir = Path::new(CLOUD_STORAGE_DIR);
    if dir.is_dir() {
        dir.join(CACHE_FILE)
    } else {
        PathBuf::from(CACHE_FILE)
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, AlertError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|e| AlertError::Config(format!("{key}: {e}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("TELEGRAM_BOT_KEY", "123:abc"),
            ("TELEGRAM_CHAT_ID", "-1001"),
        ]))
        .unwrap();

        assert_eq!(cfg.telegram_chat_id, -1001);
        assert_eq!(cfg.roc_period, 24);
        assert_eq!(cfg.max_retry_count, 1);
        assert_eq!(cfg.retry_delay, Duration::from_millis(1500));
        assert_eq!(cfg.http_timeout, Duration::from_secs(10));
        assert_eq!(cfg.currencies, CurrencyTable::builtin());
        assert!(cfg.price_cache_path.ends_with(CACHE_FILE));
    }

    #[test]
    fn overrides_apply() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("TELEGRAM_BOT_KEY", "k"),
            ("TELEGRAM_CHAT_ID", "7"),
            ("ROC_PERIOD", "12"),
            ("MAX_RETRY_COUNT", "3"),
            ("RETRY_DELAY_MS", "0"),
            ("PRICE_CACHE_PATH", "/tmp/prices.json"),
        ]))
        .unwrap();

        assert_eq!(cfg.roc_period, 12);
        assert_eq!(cfg.max_retry_count, 3);
        assert_eq!(cfg.retry_delay, Duration::ZERO);
        assert_eq!(cfg.price_cache_path, PathBuf::from("/tmp/prices.json"));
    }

    #[test]
    fn missing_credentials_are_errors() {
        let err = AppConfig::from_lookup(lookup(&[("TELEGRAM_CHAT_ID", "7")])).unwrap_err();
        assert!(err.to_string().contains("TELEGRAM_BOT_KEY"));

        let err = AppConfig::from_lookup(lookup(&[("TELEGRAM_BOT_KEY", "k")])).unwrap_err();
        assert!(err.to_string().contains("TELEGRAM_CHAT_ID"));

        let err = AppConfig::from_lookup(lookup(&[
            ("TELEGRAM_BOT_KEY", "k"),
            ("TELEGRAM_CHAT_ID", "not-a-number"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AlertError::Config(_)));
    }

    #[test]
    fn zero_roc_period_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[
            ("TELEGRAM_BOT_KEY", "k"),
            ("TELEGRAM_CHAT_ID", "7"),
            ("ROC_PERIOD", "0"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("ROC_PERIOD"));
    }
}
