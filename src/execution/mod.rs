//! Trade-freshness tracking, order sizing and order submission

pub mod executor;
pub mod freshness;
pub mod leverage;
pub mod sizing;

pub use executor::OrderExecutor;
pub use freshness::FreshnessTracker;
pub use leverage::{LeverageSource, LeverageTable};
pub use sizing::{borrow_amount, size_cross_margin_order, size_spot_order};
