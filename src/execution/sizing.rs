//! Order sizing: quote-currency notional → base-currency quantity

use rust_decimal::Decimal;

use crate::common::errors::{ExecutionError, Result};
use crate::common::types::LeverageRecord;

fn ensure_positive_price(last_price: Decimal) -> Result<()> {
    if last_price <= Decimal::ZERO {
        return Err(ExecutionError::InvalidPrice(last_price));
    }
    Ok(())
}

/// Base-currency quantity for a spot order: `amount / last_price`
pub fn size_spot_order(amount: Decimal, last_price: Decimal) -> Result<Decimal> {
    ensure_positive_price(last_price)?;
    Ok(amount / last_price)
}

/// Quote amount to borrow on top of `amount` at the given leverage.
///
/// `(leverage - 1) * amount`, capped at `max_quote_amount`. Leverage of 1 or
/// below borrows nothing.
pub fn borrow_amount(leverage: Decimal, amount: Decimal, max_quote_amount: Decimal) -> Decimal {
    let borrow = (leverage - Decimal::ONE) * amount;
    borrow.min(max_quote_amount).max(Decimal::ZERO)
}

/// Base-currency quantity for a cross-margin order:
/// `(amount + borrow) / last_price`
pub fn size_cross_margin_order(
    amount: Decimal,
    last_price: Decimal,
    record: &LeverageRecord,
) -> Result<Decimal> {
    ensure_positive_price(last_price)?;
    let borrow = borrow_amount(record.leverage, amount, record.max_quote_amount);
    Ok((amount + borrow) / last_price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::CurrencyPair;
    use rust_decimal_macros::dec;

    fn record(leverage: Decimal, max_quote_amount: Decimal) -> LeverageRecord {
        LeverageRecord {
            pair: CurrencyPair::new("DOT", "USDT"),
            leverage,
            max_quote_amount,
        }
    }

    #[test]
    fn test_spot_sizing() {
        assert_eq!(size_spot_order(dec!(50), dec!(25)).unwrap(), dec!(2));
    }

    #[test]
    fn test_spot_sizing_inverts_cleanly() {
        let price = dec!(157.86);
        let quantity = size_spot_order(dec!(50), price).unwrap();
        let notional = quantity * price;
        assert!((notional - dec!(50)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_spot_sizing_rejects_non_positive_price() {
        assert!(matches!(
            size_spot_order(dec!(50), dec!(0)),
            Err(ExecutionError::InvalidPrice(_))
        ));
        assert!(matches!(
            size_spot_order(dec!(50), dec!(-1)),
            Err(ExecutionError::InvalidPrice(_))
        ));
    }

    #[test]
    fn test_uncapped_borrow() {
        // amount=50, leverage=3, max=200 -> borrow 100, total 150, qty 6
        let quantity =
            size_cross_margin_order(dec!(50), dec!(25), &record(dec!(3), dec!(200))).unwrap();
        assert_eq!(quantity, dec!(6));
    }

    #[test]
    fn test_capped_borrow() {
        // amount=50, leverage=10 -> borrow 450, capped to 200, qty 10
        let quantity =
            size_cross_margin_order(dec!(50), dec!(25), &record(dec!(10), dec!(200))).unwrap();
        assert_eq!(quantity, dec!(10));
    }

    #[test]
    fn test_leverage_of_one_or_below_borrows_nothing() {
        assert_eq!(borrow_amount(dec!(1), dec!(50), dec!(200)), dec!(0));
        assert_eq!(borrow_amount(dec!(0.5), dec!(50), dec!(200)), dec!(0));

        // Equivalent to an unleveraged spot order
        let quantity =
            size_cross_margin_order(dec!(50), dec!(25), &record(dec!(1), dec!(200))).unwrap();
        assert_eq!(quantity, dec!(2));
    }

    #[test]
    fn test_borrow_is_monotonic_in_leverage_and_bounded() {
        let amount = dec!(50);
        let max = dec!(200);
        let mut previous = Decimal::ZERO;
        for leverage in 1..=12u32 {
            let borrow = borrow_amount(Decimal::from(leverage), amount, max);
            assert!(borrow >= previous, "borrow regressed at leverage {}", leverage);
            assert!(borrow <= max);
            previous = borrow;
        }
    }

    #[test]
    fn test_cross_margin_rejects_non_positive_price() {
        assert!(matches!(
            size_cross_margin_order(dec!(50), dec!(0), &record(dec!(3), dec!(200))),
            Err(ExecutionError::InvalidPrice(_))
        ));
    }
}
