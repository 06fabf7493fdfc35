//! Domain types shared across the execution layer

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::errors::ExecutionError;

/// A base/quote currency pair, rendered as `BASE_QUOTE` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyPair {
    pub base: String,
    pub quote: String,
}

impl CurrencyPair {
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            quote: quote.into(),
        }
    }
}

impl std::fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.base, self.quote)
    }
}

impl std::str::FromStr for CurrencyPair {
    type Err = ExecutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('_') {
            Some((base, quote)) if !base.is_empty() && !quote.is_empty() => {
                Ok(Self::new(base, quote))
            }
            _ => Err(ExecutionError::InvalidResponse(format!(
                "Malformed currency pair: {}",
                s
            ))),
        }
    }
}

impl TryFrom<String> for CurrencyPair {
    type Error = ExecutionError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<CurrencyPair> for String {
    fn from(pair: CurrencyPair) -> Self {
        pair.to_string()
    }
}

/// Order side (buy or sell)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

impl std::str::FromStr for Side {
    type Err = ExecutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            other => Err(ExecutionError::Configuration(format!(
                "Unknown order side: {}",
                other
            ))),
        }
    }
}

/// Account an order is placed against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Spot,
    CrossMargin,
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountType::Spot => write!(f, "spot"),
            AccountType::CrossMargin => write!(f, "cross_margin"),
        }
    }
}

impl std::str::FromStr for AccountType {
    type Err = ExecutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "spot" => Ok(AccountType::Spot),
            "cross_margin" => Ok(AccountType::CrossMargin),
            other => Err(ExecutionError::Configuration(format!(
                "Unknown account type: {}",
                other
            ))),
        }
    }
}

/// Time-in-force policy, with Gate.io wire spellings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    #[serde(rename = "ioc")]
    ImmediateOrCancel,
    #[serde(rename = "gtc")]
    GoodTilCancelled,
}

impl std::fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeInForce::ImmediateOrCancel => write!(f, "ioc"),
            TimeInForce::GoodTilCancelled => write!(f, "gtc"),
        }
    }
}

/// A single trade from the exchange's trade history.
///
/// `id` is issued by the exchange and increases monotonically per pair; the
/// freshness tracker uses it as the ordering key for stale-read detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: i64,
    pub pair: CurrencyPair,
    pub create_time: DateTime<Utc>,
    pub side: Side,
    pub amount: Decimal,
    pub price: Decimal,
}

/// Trading constraints for a currency pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairMetadata {
    pub pair: CurrencyPair,
    /// Smallest order size in base currency
    pub min_base_amount: Option<Decimal>,
    /// Smallest order size in quote currency
    pub min_quote_amount: Option<Decimal>,
    /// Decimal places accepted for amounts
    pub amount_precision: Option<u32>,
    /// Decimal places accepted for prices
    pub precision: Option<u32>,
}

/// Cross-margin leverage limits for a single pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeverageRecord {
    pub pair: CurrencyPair,
    /// Multiplier applied to principal (leverage 3 on 50 quote units allows
    /// borrowing up to 100 more)
    pub leverage: Decimal,
    /// Upper bound on the borrowable quote amount for this pair
    pub max_quote_amount: Decimal,
}

/// An order ready for submission.
///
/// Built fresh for each submission and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRequest {
    pub pair: CurrencyPair,
    pub side: Side,
    /// Quantity in base currency
    pub amount: Decimal,
    /// Limit price in quote currency
    pub price: Decimal,
    pub time_in_force: TimeInForce,
    pub account: AccountType,
    pub auto_borrow: bool,
    pub auto_repay: bool,
}

/// The exchange's view of a placed order, kept for reporting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResult {
    pub id: String,
    pub side: Side,
    pub account: String,
    pub order_type: String,
    pub pair: CurrencyPair,
    pub status: String,
    pub amount: Decimal,
    pub price: Decimal,
    /// Quantity not yet filled
    pub left: Decimal,
    /// Total filled in quote currency
    pub filled_total: Decimal,
    /// Average fill price, when the exchange reports one
    pub fill_price: Option<Decimal>,
    pub fee: Decimal,
    pub fee_currency: String,
}
