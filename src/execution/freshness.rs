//! Stale-read detection for the trade-history endpoint.
//!
//! Gate.io's trade-history read path is eventually consistent: a retry can
//! be served an older cached page than a previous call. The tracker keeps
//! the last accepted trade per pair and refuses to hand back anything with a
//! smaller id.

use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::common::errors::{ExecutionError, Result};
use crate::common::traits::ExchangeApi;
use crate::common::types::{CurrencyPair, Trade};

/// Per-pair checkpoint over the exchange's trade history.
///
/// One logical owner per process; checkpoints are scoped per pair so that
/// trade ids from unrelated pairs never shadow each other.
#[derive(Debug)]
pub struct FreshnessTracker {
    last_seen: HashMap<CurrencyPair, Trade>,
    max_attempts: u32,
}

impl FreshnessTracker {
    /// Create a tracker that tolerates up to `max_attempts` consecutive
    /// stale reads per observation before giving up
    pub fn new(max_attempts: u32) -> Self {
        Self {
            last_seen: HashMap::new(),
            max_attempts: max_attempts.max(1),
        }
    }

    /// Fetch the single most recent trade for `pair`, discarding stale
    /// results.
    ///
    /// Exactly one record is expected per fetch; any other count is a
    /// protocol violation and fails immediately with
    /// [`ExecutionError::UnexpectedResultCount`]. A fetched id below the
    /// retained one triggers a re-fetch, bounded by the configured attempt
    /// limit ([`ExecutionError::StaleDataTimeout`] once exhausted).
    pub async fn observe<A>(&mut self, api: &A, pair: &CurrencyPair) -> Result<Trade>
    where
        A: ExchangeApi + ?Sized,
    {
        for _ in 0..self.max_attempts {
            let mut trades = api.list_trades(pair, 1).await?;
            if trades.len() != 1 {
                return Err(ExecutionError::UnexpectedResultCount {
                    expected: 1,
                    actual: trades.len(),
                });
            }
            let trade = trades.remove(0);

            if let Some(previous) = self.last_seen.get(pair) {
                if trade.id < previous.id {
                    debug!(
                        "Stale trade history result for {} (id={} < {}), re-trying",
                        pair, trade.id, previous.id
                    );
                    continue;
                }
            }

            info!(
                "Latest trade: {} | id={} | create_time={} | side={} | amount={} | price={}",
                trade.pair,
                trade.id,
                trade.create_time.format("%d-%m-%y %H:%M:%S%.6f"),
                trade.side,
                trade.amount,
                trade.price
            );
            self.last_seen.insert(pair.clone(), trade.clone());
            return Ok(trade);
        }

        Err(ExecutionError::StaleDataTimeout {
            attempts: self.max_attempts,
        })
    }

    /// Like [`observe`](Self::observe), but return only the accepted
    /// trade's price
    pub async fn last_price<A>(&mut self, api: &A, pair: &CurrencyPair) -> Result<Decimal>
    where
        A: ExchangeApi + ?Sized,
    {
        Ok(self.observe(api, pair).await?.price)
    }

    /// The last accepted trade for `pair`, if any
    pub fn last_seen(&self, pair: &CurrencyPair) -> Option<&Trade> {
        self.last_seen.get(pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::traits::MockExchangeApi;
    use crate::common::types::Side;
    use chrono::Utc;
    use mockall::Sequence;
    use rust_decimal_macros::dec;

    fn trade(pair: &CurrencyPair, id: i64) -> Trade {
        Trade {
            id,
            pair: pair.clone(),
            create_time: Utc::now(),
            side: Side::Buy,
            amount: dec!(1),
            price: dec!(25),
        }
    }

    fn pair() -> CurrencyPair {
        CurrencyPair::new("DOT", "USDT")
    }

    #[tokio::test]
    async fn accepts_strictly_increasing_ids() {
        let mut api = MockExchangeApi::new();
        let mut seq = Sequence::new();
        for id in [10, 11, 12] {
            api.expect_list_trades()
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |pair, _| Ok(vec![trade(pair, id)]));
        }

        let mut tracker = FreshnessTracker::new(5);
        for expected in [10, 11, 12] {
            let observed = tracker.observe(&api, &pair()).await.unwrap();
            assert_eq!(observed.id, expected);
            assert_eq!(tracker.last_seen(&pair()).unwrap().id, expected);
        }
    }

    #[tokio::test]
    async fn retries_past_stale_results() {
        let mut api = MockExchangeApi::new();
        let mut seq = Sequence::new();
        for id in [10, 5, 12] {
            api.expect_list_trades()
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |pair, _| Ok(vec![trade(pair, id)]));
        }

        let mut tracker = FreshnessTracker::new(5);
        assert_eq!(tracker.observe(&api, &pair()).await.unwrap().id, 10);

        // The stale id=5 is skipped; the retry lands on id=12
        let observed = tracker.observe(&api, &pair()).await.unwrap();
        assert_eq!(observed.id, 12);
        assert_eq!(tracker.last_seen(&pair()).unwrap().id, 12);
    }

    #[tokio::test]
    async fn accepts_repeated_id() {
        let mut api = MockExchangeApi::new();
        let mut seq = Sequence::new();
        for id in [10, 10] {
            api.expect_list_trades()
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |pair, _| Ok(vec![trade(pair, id)]));
        }

        let mut tracker = FreshnessTracker::new(5);
        assert_eq!(tracker.observe(&api, &pair()).await.unwrap().id, 10);
        // An unchanged id is fresh enough, not stale
        assert_eq!(tracker.observe(&api, &pair()).await.unwrap().id, 10);
    }

    #[tokio::test]
    async fn gives_up_after_attempt_limit() {
        let mut api = MockExchangeApi::new();
        let mut seq = Sequence::new();
        api.expect_list_trades()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|pair, _| Ok(vec![trade(pair, 100)]));
        api.expect_list_trades()
            .times(3)
            .in_sequence(&mut seq)
            .returning(|pair, _| Ok(vec![trade(pair, 7)]));

        let mut tracker = FreshnessTracker::new(3);
        tracker.observe(&api, &pair()).await.unwrap();

        let err = tracker.observe(&api, &pair()).await.unwrap_err();
        assert!(matches!(
            err,
            ExecutionError::StaleDataTimeout { attempts: 3 }
        ));
        // The retained checkpoint never regressed
        assert_eq!(tracker.last_seen(&pair()).unwrap().id, 100);
    }

    #[tokio::test]
    async fn rejects_zero_results() {
        let mut api = MockExchangeApi::new();
        api.expect_list_trades().returning(|_, _| Ok(vec![]));

        let mut tracker = FreshnessTracker::new(5);
        let err = tracker.observe(&api, &pair()).await.unwrap_err();
        assert!(matches!(
            err,
            ExecutionError::UnexpectedResultCount {
                expected: 1,
                actual: 0
            }
        ));
    }

    #[tokio::test]
    async fn rejects_multiple_results() {
        let mut api = MockExchangeApi::new();
        api.expect_list_trades()
            .returning(|pair, _| Ok(vec![trade(pair, 1), trade(pair, 2)]));

        let mut tracker = FreshnessTracker::new(5);
        let err = tracker.observe(&api, &pair()).await.unwrap_err();
        assert!(matches!(
            err,
            ExecutionError::UnexpectedResultCount {
                expected: 1,
                actual: 2
            }
        ));
    }

    #[tokio::test]
    async fn checkpoints_are_scoped_per_pair() {
        let mut api = MockExchangeApi::new();
        let mut seq = Sequence::new();
        api.expect_list_trades()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|pair, _| Ok(vec![trade(pair, 1_000_000)]));
        api.expect_list_trades()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|pair, _| Ok(vec![trade(pair, 5)]));

        let dot = CurrencyPair::new("DOT", "USDT");
        let btc = CurrencyPair::new("BTC", "USDT");

        let mut tracker = FreshnessTracker::new(5);
        assert_eq!(tracker.observe(&api, &dot).await.unwrap().id, 1_000_000);

        // A numerically smaller id on a different pair is not stale
        assert_eq!(tracker.observe(&api, &btc).await.unwrap().id, 5);
        assert_eq!(tracker.last_seen(&dot).unwrap().id, 1_000_000);
        assert_eq!(tracker.last_seen(&btc).unwrap().id, 5);
    }

    #[tokio::test]
    async fn last_price_returns_price_only() {
        let mut api = MockExchangeApi::new();
        api.expect_list_trades()
            .returning(|pair, _| Ok(vec![trade(pair, 10)]));

        let mut tracker = FreshnessTracker::new(5);
        assert_eq!(tracker.last_price(&api, &pair()).await.unwrap(), dec!(25));
    }
}
