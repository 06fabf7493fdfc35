//! Order submission orchestration.
//!
//! Picks the spot or cross-margin submission path, sizes the order from the
//! latest accepted trade price, and reports the exchange's response. Holds
//! no order state of its own; failed submissions are never retried here.

use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, error, info};

use super::freshness::FreshnessTracker;
use super::leverage::LeverageSource;
use super::sizing;
use crate::common::errors::{ExecutionError, Result};
use crate::common::traits::ExchangeApi;
use crate::common::types::{
    AccountType, CurrencyPair, OrderRequest, OrderResult, Side, TimeInForce,
};
use crate::config::types::AppSettings;

/// Builds and submits orders through an [`ExchangeApi`]
pub struct OrderExecutor<A: ExchangeApi> {
    api: A,
    tracker: FreshnessTracker,
    /// One leverage source per quote currency, created on first use
    leverage_sources: HashMap<String, LeverageSource>,
    leverage_cache_dir: PathBuf,
}

impl<A: ExchangeApi> OrderExecutor<A> {
    pub fn new(api: A, settings: &AppSettings, leverage_cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            api,
            tracker: FreshnessTracker::new(settings.stale_retry_limit),
            leverage_sources: HashMap::new(),
            leverage_cache_dir: leverage_cache_dir.into(),
        }
    }

    /// The latest accepted trade price for `pair`
    pub async fn last_price(&mut self, pair: &CurrencyPair) -> Result<Decimal> {
        self.tracker.last_price(&self.api, pair).await
    }

    /// The minimum order size in quote currency, when the exchange reports
    /// one
    pub async fn min_order_amount(&self, pair: &CurrencyPair) -> Result<Option<Decimal>> {
        Ok(self.api.get_currency_pair(pair).await?.min_quote_amount)
    }

    /// Place an immediate-or-cancel order for `amount` (quote currency)
    /// against `account`.
    ///
    /// The order price is the latest accepted trade price; cross-margin
    /// orders size in the leveraged borrow and set the borrow/repay flags
    /// for the given side.
    pub async fn place_order(
        &mut self,
        pair: &CurrencyPair,
        side: Side,
        amount: Decimal,
        account: AccountType,
    ) -> Result<OrderResult> {
        let trade = self.tracker.observe(&self.api, pair).await?;
        let last_price = trade.price;

        let request = match account {
            AccountType::Spot => OrderRequest {
                pair: pair.clone(),
                side,
                amount: sizing::size_spot_order(amount, last_price)?,
                price: last_price,
                time_in_force: TimeInForce::ImmediateOrCancel,
                account,
                auto_borrow: false,
                auto_repay: false,
            },
            AccountType::CrossMargin => {
                let source = self
                    .leverage_sources
                    .entry(pair.quote.clone())
                    .or_insert_with(|| {
                        LeverageSource::from_cache_dir(&self.leverage_cache_dir, &pair.quote)
                    });
                let record = source
                    .record_for(&self.api, pair)
                    .await?
                    .ok_or_else(|| ExecutionError::LeverageDataUnavailable(pair.clone()))?;

                let (auto_borrow, auto_repay) = match side {
                    Side::Buy => (true, false),
                    Side::Sell => (false, true),
                };

                OrderRequest {
                    pair: pair.clone(),
                    side,
                    amount: sizing::size_cross_margin_order(amount, last_price, &record)?,
                    price: last_price,
                    time_in_force: TimeInForce::ImmediateOrCancel,
                    account,
                    auto_borrow,
                    auto_repay,
                }
            }
        };

        debug!(
            "Submitting {} {} order: {} {} @ {}",
            request.account, request.side, request.amount, request.pair, request.price
        );

        let submitted = match account {
            AccountType::Spot => self.api.create_spot_order(&request).await,
            AccountType::CrossMargin => self.api.create_cross_margin_loan(&request).await,
        };

        match submitted {
            Ok(result) => {
                info!(
                    "Order placed: {} | {} | {} | {} | {} | {} | amount={} | price={} | \
                     left={} | filled_total={} | fill_price={} | fee={} {}",
                    result.side,
                    result.id,
                    result.account,
                    result.order_type,
                    result.pair,
                    result.status,
                    result.amount,
                    result.price,
                    result.left,
                    result.filled_total,
                    result
                        .fill_price
                        .map(|p| p.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                    result.fee,
                    result.fee_currency
                );
                Ok(result)
            }
            Err(e) => {
                error!(
                    "Order submission failed for {} {} on {}: {}",
                    account, side, pair, e
                );
                Err(e)
            }
        }
    }
}
