//! Error types for the execution layer

use rust_decimal::Decimal;
use thiserror::Error;

use super::types::CurrencyPair;

/// Result type alias using our ExecutionError
pub type Result<T> = std::result::Result<T, ExecutionError>;

/// Main error type for execution operations
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// The trade-history fetch returned an unexpected number of records
    #[error("Expected {expected} trade(s) from trade history, got {actual}")]
    UnexpectedResultCount { expected: usize, actual: usize },

    /// The trade-history read path kept returning stale results
    #[error("Trade history still stale after {attempts} attempts")]
    StaleDataTimeout { attempts: u32 },

    /// A non-positive price was supplied to a sizing function
    #[error("Invalid price for order sizing: {0}")]
    InvalidPrice(Decimal),

    /// No leverage record matched, locally or from the exchange
    #[error("No leverage data available for {0}")]
    LeverageDataUnavailable(CurrencyPair),

    /// The exchange answered with a non-success status
    #[error("Exchange rejected the request with status {status}: {body}")]
    ExchangeRejected { status: u16, body: String },

    /// HTTP request errors
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Well-formed HTTP response carrying data we cannot interpret
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),
}
