//! GateioExecution Library
//!
//! A Rust execution glue layer for the Gate.io exchange: last-price
//! tracking with stale-read detection, spot and cross-margin order sizing,
//! and order submission.

pub mod common;
pub mod config;
pub mod execution;
pub mod gateio;

// Re-export commonly used types
pub use common::errors::{ExecutionError, Result};
pub use common::traits::ExchangeApi;
pub use common::types::{
    AccountType, CurrencyPair, LeverageRecord, OrderRequest, OrderResult, PairMetadata, Side,
    TimeInForce, Trade,
};
pub use config::types::AppConfig;
pub use execution::executor::OrderExecutor;
pub use execution::freshness::FreshnessTracker;
pub use execution::leverage::{LeverageSource, LeverageTable};
pub use gateio::rest::GateIoRestClient;
