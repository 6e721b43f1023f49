//! Watched currencies and their trigger conditions.

use serde::{Deserialize, Serialize};

use crate::error::AlertError;

/// When a watched currency produces a head line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    /// Fires when the price leaves `previous ± previous * percent / 100`,
    /// or when there is no usable previous price.
    PriceDeviation { percent: f64 },
}

impl Condition {
    pub fn holds(&self, price: f64, previous: Option<f64>) -> bool {
        match *self {
            Condition::PriceDeviation { percent } => {
                let previous = match previous {
                    Some(p) if p != 0.0 && !p.is_nan() => p,
                    _ => return true,
                };
                let band = previous * percent / 100.0;
                price < previous - band || price > previous + band
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub slug: String,
    /// Market-data id.
    pub id: u64,
    #[serde(default)]
    pub watch: bool,
    #[serde(default = "default_price_fraction_digits")]
    pub price_fraction_digits: u32,
    pub url: String,
    #[serde(default)]
    pub compare_with: Vec<String>,
    #[serde(default)]
    pub condition: Option<Condition>,
}

fn default_price_fraction_digits() -> u32 {
    3
}

/// Ordered currency table. Order decides dispatch order.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyTable {
    currencies: Vec<Currency>,
}

impl CurrencyTable {
    pub fn new(currencies: Vec<Currency>) -> Result<Self, AlertError> {
        let table = Self { currencies };
        table.validate()?;
        Ok(table)
    }

    /// JSON array of currency objects.
    pub fn from_json(json: &str) -> Result<Self, AlertError> {
        Self::new(serde_json::from_str(json)?)
    }

    pub fn builtin() -> Self {
        Self {
            currencies: vec![
                Currency {
                    slug: "ppi".into(),
                    id: 19544,
                    watch: true,
                    price_fraction_digits: 5,
                    url: "https://coinmarketcap.com/currencies/swappi-dex/".into(),
                    compare_with: vec!["cfx".into(), "abc".into()],
                    condition: Some(Condition::PriceDeviation { percent: 1.0 }),
                },
                Currency {
                    slug: "cfx".into(),
                    id: 7334,
                    watch: false,
                    price_fraction_digits: 3,
                    url: "https://coinmarketcap.com/currencies/conflux-network/".into(),
                    compare_with: vec![],
                    condition: None,
                },
                Currency {
                    slug: "abc".into(),
                    id: 24497,
                    watch: false,
                    price_fraction_digits: 3,
                    url: "https://coinmarketcap.com/currencies/abc-pos-pool/".into(),
                    compare_with: vec![],
                    condition: None,
                },
            ],
        }
    }

    fn validate(&self) -> Result<(), AlertError> {
        for (i, c) in self.currencies.iter().enumerate() {
            if self.currencies[..i].iter().any(|o| o.slug == c.slug) {
                return Err(AlertError::Config(format!("duplicate currency slug: {}", c.slug)));
            }
            if let Some(missing) = c.compare_with.iter().find(|s| self.get(s).is_none()) {
                return Err(AlertError::Config(format!(
                    "{} compares with unknown currency {missing}",
                    c.slug
                )));
            }
        }
        Ok(())
    }

    pub fn get(&self, slug: &str) -> Option<&Currency> {
        self.currencies.iter().find(|c| c.slug == slug)
    }

    pub fn watched(&self) -> impl Iterator<Item = &Currency> {
        self.currencies.iter().filter(|c| c.watch)
    }

    pub fn len(&self) -> usize {
        self.currencies.len()
    }
}
