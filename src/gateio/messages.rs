//! Gate.io-specific wire types and their conversions into domain types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::errors::{ExecutionError, Result};
use crate::common::types::{
    AccountType, CurrencyPair, LeverageRecord, OrderRequest, OrderResult, PairMetadata, Side,
    TimeInForce, Trade,
};

fn parse_decimal(value: &str, field: &str) -> Result<Decimal> {
    value
        .parse()
        .map_err(|e| ExecutionError::InvalidResponse(format!("Invalid {}: {}", field, e)))
}

/// A trade record as returned by `GET /api/v4/spot/trades`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeMessage {
    /// Numeric id, serialized as a string
    pub id: String,
    /// Seconds since epoch, as a string
    #[serde(default)]
    pub create_time: Option<String>,
    /// Milliseconds since epoch with a fractional part, as a string
    #[serde(default)]
    pub create_time_ms: Option<String>,
    pub currency_pair: String,
    pub side: Side,
    pub amount: String,
    pub price: String,
}

impl TradeMessage {
    fn timestamp(&self) -> Result<DateTime<Utc>> {
        if let Some(ms) = &self.create_time_ms {
            // "1548000000123.456" — keep the integer millisecond part
            let whole = ms.split('.').next().unwrap_or(ms.as_str());
            let millis: i64 = whole.parse().map_err(|e| {
                ExecutionError::InvalidResponse(format!("Invalid create_time_ms: {}", e))
            })?;
            return DateTime::from_timestamp_millis(millis).ok_or_else(|| {
                ExecutionError::InvalidResponse(format!("Out-of-range create_time_ms: {}", millis))
            });
        }
        if let Some(secs) = &self.create_time {
            let secs: i64 = secs.parse().map_err(|e| {
                ExecutionError::InvalidResponse(format!("Invalid create_time: {}", e))
            })?;
            return DateTime::from_timestamp(secs, 0).ok_or_else(|| {
                ExecutionError::InvalidResponse(format!("Out-of-range create_time: {}", secs))
            });
        }
        Err(ExecutionError::InvalidResponse(
            "Trade without a timestamp".to_string(),
        ))
    }
}

impl TryFrom<TradeMessage> for Trade {
    type Error = ExecutionError;

    fn try_from(msg: TradeMessage) -> Result<Trade> {
        let create_time = msg.timestamp()?;
        let id = msg
            .id
            .parse()
            .map_err(|e| ExecutionError::InvalidResponse(format!("Invalid trade id: {}", e)))?;

        Ok(Trade {
            id,
            pair: msg.currency_pair.parse()?,
            create_time,
            side: msg.side,
            amount: parse_decimal(&msg.amount, "trade amount")?,
            price: parse_decimal(&msg.price, "trade price")?,
        })
    }
}

/// Pair details from `GET /api/v4/spot/currency_pairs/{pair}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyPairMessage {
    pub id: String,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub quote: Option<String>,
    #[serde(default)]
    pub min_base_amount: Option<String>,
    #[serde(default)]
    pub min_quote_amount: Option<String>,
    #[serde(default)]
    pub amount_precision: Option<u32>,
    #[serde(default)]
    pub precision: Option<u32>,
    #[serde(default)]
    pub trade_status: Option<String>,
}

impl TryFrom<CurrencyPairMessage> for PairMetadata {
    type Error = ExecutionError;

    fn try_from(msg: CurrencyPairMessage) -> Result<PairMetadata> {
        let min_base_amount = msg
            .min_base_amount
            .as_deref()
            .map(|v| parse_decimal(v, "min_base_amount"))
            .transpose()?;
        let min_quote_amount = msg
            .min_quote_amount
            .as_deref()
            .map(|v| parse_decimal(v, "min_quote_amount"))
            .transpose()?;

        Ok(PairMetadata {
            pair: msg.id.parse()?,
            min_base_amount,
            min_quote_amount,
            amount_precision: msg.amount_precision,
            precision: msg.precision,
        })
    }
}

/// One entry of `GET /api/v4/margin/currency_pairs`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarginCurrencyPairMessage {
    pub id: String,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub quote: Option<String>,
    /// Whole-number multiplier in the JSON
    pub leverage: u32,
    #[serde(default)]
    pub max_quote_amount: Option<String>,
    #[serde(default)]
    pub status: Option<i32>,
}

impl MarginCurrencyPairMessage {
    /// Quote currency, from the explicit field or the pair id
    pub fn quote_currency(&self) -> Option<&str> {
        if let Some(quote) = self.quote.as_deref() {
            return Some(quote);
        }
        self.id.split_once('_').map(|(_, quote)| quote)
    }
}

impl TryFrom<MarginCurrencyPairMessage> for LeverageRecord {
    type Error = ExecutionError;

    fn try_from(msg: MarginCurrencyPairMessage) -> Result<LeverageRecord> {
        let max_quote_amount = msg.max_quote_amount.as_deref().ok_or_else(|| {
            ExecutionError::InvalidResponse(format!("Margin pair {} without max_quote_amount", msg.id))
        })?;

        Ok(LeverageRecord {
            pair: msg.id.parse()?,
            leverage: Decimal::from(msg.leverage),
            max_quote_amount: parse_decimal(max_quote_amount, "max_quote_amount")?,
        })
    }
}

/// Request body for `POST /api/v4/spot/orders` and
/// `POST /api/v4/margin/cross/loans`.
///
/// Quantities go out as strings; the borrow/repay flags are only sent for
/// cross-margin orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPayload {
    pub currency_pair: String,
    pub side: Side,
    pub amount: String,
    pub price: String,
    pub time_in_force: TimeInForce,
    pub account: AccountType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_borrow: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_repay: Option<bool>,
}

impl From<&OrderRequest> for OrderPayload {
    fn from(request: &OrderRequest) -> Self {
        let (auto_borrow, auto_repay) = match request.account {
            AccountType::Spot => (None, None),
            AccountType::CrossMargin => (Some(request.auto_borrow), Some(request.auto_repay)),
        };

        Self {
            currency_pair: request.pair.to_string(),
            side: request.side,
            amount: request.amount.to_string(),
            price: request.price.to_string(),
            time_in_force: request.time_in_force,
            account: request.account,
            auto_borrow,
            auto_repay,
        }
    }
}

/// Order state as returned by the order and loan creation endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderMessage {
    pub id: String,
    pub currency_pair: String,
    pub side: Side,
    #[serde(default)]
    pub account: String,
    #[serde(default, rename = "type")]
    pub order_type: String,
    #[serde(default)]
    pub status: String,
    pub amount: String,
    pub price: String,
    #[serde(default)]
    pub left: Option<String>,
    #[serde(default)]
    pub filled_total: Option<String>,
    #[serde(default)]
    pub fill_price: Option<String>,
    #[serde(default)]
    pub fee: Option<String>,
    #[serde(default)]
    pub fee_currency: String,
}

impl TryFrom<OrderMessage> for OrderResult {
    type Error = ExecutionError;

    fn try_from(msg: OrderMessage) -> Result<OrderResult> {
        let left = match msg.left.as_deref() {
            Some(v) => parse_decimal(v, "left")?,
            None => Decimal::ZERO,
        };
        let filled_total = match msg.filled_total.as_deref() {
            Some(v) => parse_decimal(v, "filled_total")?,
            None => Decimal::ZERO,
        };
        let fill_price = msg
            .fill_price
            .as_deref()
            .filter(|v| !v.is_empty())
            .map(|v| parse_decimal(v, "fill_price"))
            .transpose()?;
        let fee = match msg.fee.as_deref() {
            Some(v) => parse_decimal(v, "fee")?,
            None => Decimal::ZERO,
        };

        Ok(OrderResult {
            id: msg.id,
            side: msg.side,
            account: msg.account,
            order_type: msg.order_type,
            pair: msg.currency_pair.parse()?,
            status: msg.status,
            amount: parse_decimal(&msg.amount, "order amount")?,
            price: parse_decimal(&msg.price, "order price")?,
            left,
            filled_total,
            fill_price,
            fee,
            fee_currency: msg.fee_currency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_trade_message_conversion() {
        let json = r#"{
            "id": "5736713",
            "create_time": "1605176218",
            "create_time_ms": "1605176218213.5352",
            "currency_pair": "DOT_USDT",
            "side": "sell",
            "amount": "16.4700000000",
            "price": "157.86"
        }"#;

        let msg: TradeMessage = serde_json::from_str(json).unwrap();
        let trade = Trade::try_from(msg).unwrap();

        assert_eq!(trade.id, 5736713);
        assert_eq!(trade.pair, CurrencyPair::new("DOT", "USDT"));
        assert_eq!(trade.side, Side::Sell);
        assert_eq!(trade.create_time.timestamp_millis(), 1605176218213);
        assert_eq!(trade.price.to_string(), "157.86");
    }

    #[test]
    fn test_trade_message_falls_back_to_seconds() {
        let msg = TradeMessage {
            id: "42".to_string(),
            create_time: Some("1605176218".to_string()),
            create_time_ms: None,
            currency_pair: "BTC_USDT".to_string(),
            side: Side::Buy,
            amount: "1".to_string(),
            price: "20000".to_string(),
        };

        let trade = Trade::try_from(msg).unwrap();
        assert_eq!(trade.create_time.timestamp(), 1605176218);
    }

    #[test]
    fn test_trade_message_rejects_bad_id() {
        let msg = TradeMessage {
            id: "not-a-number".to_string(),
            create_time: Some("1605176218".to_string()),
            create_time_ms: None,
            currency_pair: "BTC_USDT".to_string(),
            side: Side::Buy,
            amount: "1".to_string(),
            price: "20000".to_string(),
        };

        assert!(matches!(
            Trade::try_from(msg),
            Err(ExecutionError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_margin_pair_conversion() {
        let json = r#"{
            "id": "DOT_USDT",
            "base": "DOT",
            "quote": "USDT",
            "leverage": 3,
            "min_base_amount": "0.01",
            "min_quote_amount": "1",
            "max_quote_amount": "50000",
            "status": 1
        }"#;

        let msg: MarginCurrencyPairMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.quote_currency(), Some("USDT"));

        let record = LeverageRecord::try_from(msg).unwrap();
        assert_eq!(record.leverage, Decimal::from(3));
        assert_eq!(record.max_quote_amount, Decimal::from(50000));
    }

    #[test]
    fn test_spot_payload_omits_borrow_flags() {
        let request = OrderRequest {
            pair: CurrencyPair::new("DOT", "USDT"),
            side: Side::Buy,
            amount: Decimal::from(2),
            price: Decimal::from(25),
            time_in_force: TimeInForce::ImmediateOrCancel,
            account: AccountType::Spot,
            auto_borrow: false,
            auto_repay: false,
        };

        let json = serde_json::to_value(OrderPayload::from(&request)).unwrap();
        assert_eq!(json["currency_pair"], "DOT_USDT");
        assert_eq!(json["time_in_force"], "ioc");
        assert_eq!(json["account"], "spot");
        assert!(json.get("auto_borrow").is_none());
        assert!(json.get("auto_repay").is_none());
    }

    #[test]
    fn test_cross_margin_payload_carries_borrow_flags() {
        let request = OrderRequest {
            pair: CurrencyPair::new("DOT", "USDT"),
            side: Side::Buy,
            amount: Decimal::from(6),
            price: Decimal::from(25),
            time_in_force: TimeInForce::ImmediateOrCancel,
            account: AccountType::CrossMargin,
            auto_borrow: true,
            auto_repay: false,
        };

        let json = serde_json::to_value(OrderPayload::from(&request)).unwrap();
        assert_eq!(json["account"], "cross_margin");
        assert_eq!(json["auto_borrow"], true);
        assert_eq!(json["auto_repay"], false);
    }

    #[test]
    fn test_order_message_conversion() {
        let json = r#"{
            "id": "1852454420",
            "currency_pair": "DOT_USDT",
            "side": "buy",
            "account": "spot",
            "type": "limit",
            "status": "closed",
            "amount": "2",
            "price": "25",
            "left": "0",
            "filled_total": "50",
            "fill_price": "25",
            "fee": "0.1",
            "fee_currency": "DOT"
        }"#;

        let msg: OrderMessage = serde_json::from_str(json).unwrap();
        let result = OrderResult::try_from(msg).unwrap();

        assert_eq!(result.id, "1852454420");
        assert_eq!(result.status, "closed");
        assert_eq!(result.left, Decimal::ZERO);
        assert_eq!(result.fill_price, Some(Decimal::from(25)));
        assert_eq!(result.fee_currency, "DOT");
    }
}
