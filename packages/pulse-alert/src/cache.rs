//! Last-seen price per currency, persisted as a small JSON file:
//! `{"price": {"ppi": 0.004, "cfx": 0.2}}`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AlertError;

#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheData {
    #[serde(default)]
    price: BTreeMap<String, f64>,
}

#[derive(Debug)]
pub struct PriceCache {
    path: PathBuf,
    data: CacheData,
}

impl PriceCache {
    /// Loads the cache file, creating it with empty defaults if missing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AlertError> {
        let path = path.into();
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                CacheData::default()
            } else {
                serde_json::from_str(&contents)?
            }
        } else {
            CacheData::default()
        };

        write_data(&path, &data)?;
        Ok(Self { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get_price(&self, slug: &str) -> Option<f64> {
        self.data.price.get(slug).copied()
    }

    /// Stores `price` and writes the file immediately. On a failed write the
    /// in-memory state is left as it was.
    pub fn update_price(&mut self, slug: &str, price: f64) -> Result<(), AlertError> {
        let mut next = CacheData {
            price: self.data.price.clone(),
        };
        next.price.insert(slug.to_string(), price);
        write_data(&self.path, &next)?;
        self.data = next;
        Ok(())
    }
}

fn write_data(path: &Path, data: &CacheData) -> Result<(), AlertError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, serde_json::to_string_pretty(data)?)?;
    debug!(path = %path.display(), entries = data.price.len(), "price cache written");
    Ok(())
}
