//! Cross-margin leverage limits: local cache file with remote refresh.
//!
//! Leverage/limit records are kept in a per-quote JSON file
//! (`cross_margin_currency_leverage_with_pairing_<QUOTE>.json`); when the
//! file is missing or has no record for a pair, the exchange's margin pair
//! listing is queried instead and the result cached in memory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::common::errors::{ExecutionError, Result};
use crate::common::traits::ExchangeApi;
use crate::common::types::{CurrencyPair, LeverageRecord};

/// In-memory leverage table, looked up by exact pair match
#[derive(Debug, Clone, Default)]
pub struct LeverageTable {
    records: HashMap<CurrencyPair, LeverageRecord>,
}

impl LeverageTable {
    pub fn from_records(records: Vec<LeverageRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|record| (record.pair.clone(), record))
                .collect(),
        }
    }

    /// Read a table from a cache file (a JSON array of records)
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ExecutionError::Configuration(format!(
                "Could not read leverage cache {}: {}",
                path.display(),
                e
            ))
        })?;
        let records: Vec<LeverageRecord> = serde_json::from_str(&raw)?;
        Ok(Self::from_records(records))
    }

    /// Cache file name for a quote currency
    pub fn cache_file_name(quote: &str) -> String {
        format!(
            "cross_margin_currency_leverage_with_pairing_{}.json",
            quote
        )
    }

    pub fn lookup(&self, pair: &CurrencyPair) -> Option<&LeverageRecord> {
        self.records.get(pair)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Leverage records for one quote currency, local-first with remote
/// fallback
#[derive(Debug)]
pub struct LeverageSource {
    quote: String,
    table: Option<LeverageTable>,
}

impl LeverageSource {
    /// A source with no local cache; every lookup goes to the exchange
    pub fn new(quote: impl Into<String>) -> Self {
        Self {
            quote: quote.into(),
            table: None,
        }
    }

    /// A source seeded with an already-loaded table
    pub fn with_table(quote: impl Into<String>, table: LeverageTable) -> Self {
        Self {
            quote: quote.into(),
            table: Some(table),
        }
    }

    /// Load the cache file for `quote` from `dir`.
    ///
    /// A missing, unreadable or empty file is not an error here: the source
    /// simply starts without a local table and the first lookup refreshes
    /// from the exchange.
    pub fn from_cache_dir(dir: &Path, quote: &str) -> Self {
        let path: PathBuf = dir.join(LeverageTable::cache_file_name(quote));
        if !path.exists() {
            debug!("No leverage cache file at {}", path.display());
            return Self::new(quote);
        }

        match LeverageTable::load(&path) {
            Ok(table) if !table.is_empty() => {
                debug!(
                    "Loaded {} leverage records from {}",
                    table.len(),
                    path.display()
                );
                Self::with_table(quote, table)
            }
            Ok(_) => {
                debug!("Leverage cache {} is empty", path.display());
                Self::new(quote)
            }
            Err(e) => {
                warn!("{}", e);
                Self::new(quote)
            }
        }
    }

    pub fn quote(&self) -> &str {
        &self.quote
    }

    /// The leverage record for `pair`: local table first, then one remote
    /// refresh.
    ///
    /// `Ok(None)` means neither source knows the pair; the caller decides
    /// whether that is an error.
    pub async fn record_for<A>(
        &mut self,
        api: &A,
        pair: &CurrencyPair,
    ) -> Result<Option<LeverageRecord>>
    where
        A: ExchangeApi + ?Sized,
    {
        if let Some(table) = &self.table {
            if let Some(record) = table.lookup(pair) {
                return Ok(Some(record.clone()));
            }
        }

        debug!("No local leverage record for {}, refreshing from exchange", pair);
        let records = api.list_margin_currency_pairs(&self.quote).await?;
        let table = LeverageTable::from_records(records);
        let record = table.lookup(pair).cloned();
        self.table = Some(table);

        Ok(record)
    }
}
