//! Capability trait for the exchange client

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::errors::Result;
use super::types::{CurrencyPair, LeverageRecord, OrderRequest, OrderResult, PairMetadata, Trade};

/// The slice of the exchange API this crate consumes.
///
/// Implemented by [`crate::gateio::rest::GateIoRestClient`]; mocked in unit
/// tests so the freshness tracker and executor can be exercised without a
/// network.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ExchangeApi: Send + Sync {
    /// Fetch the most recent trades for a pair, newest first
    async fn list_trades(&self, pair: &CurrencyPair, limit: u32) -> Result<Vec<Trade>>;

    /// Fetch trading constraints (minimum order sizes, precision) for a pair
    async fn get_currency_pair(&self, pair: &CurrencyPair) -> Result<PairMetadata>;

    /// Fetch leverage limits for all margin pairs quoted in `quote`.
    ///
    /// This is the remote refresh path behind the local leverage cache file.
    async fn list_margin_currency_pairs(&self, quote: &str) -> Result<Vec<LeverageRecord>>;

    /// Submit a spot order
    async fn create_spot_order(&self, order: &OrderRequest) -> Result<OrderResult>;

    /// Submit a cross-margin order through the loan endpoint
    async fn create_cross_margin_loan(&self, order: &OrderRequest) -> Result<OrderResult>;
}
