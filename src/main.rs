//! GateioExecution - Main Entry Point
//!
//! One-shot CLI around the execution layer: query the latest trade price
//! for a pair, or place a spot / cross-margin order.

use anyhow::{Context, Result};
use clap::Parser;
use rust_decimal::Decimal;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use gateio_execution::config::load_config;
use gateio_execution::{AccountType, CurrencyPair, GateIoRestClient, OrderExecutor, Side};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Currency pair, e.g. DOT_USDT
    #[arg(long)]
    pair: CurrencyPair,

    /// Order side
    #[arg(long, default_value = "buy")]
    side: Side,

    /// Account to trade against (spot or cross_margin)
    #[arg(long, default_value = "spot")]
    account: AccountType,

    /// Notional amount in quote currency
    #[arg(long)]
    amount: Option<Decimal>,

    /// Only print the latest trade price; place no order
    #[arg(long)]
    price_only: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let config = load_config(Some(&args.config))?;
    let client = GateIoRestClient::from_config(&config.gateio, &config.settings)?;
    let mut executor = OrderExecutor::new(
        client,
        &config.settings,
        config.gateio.leverage_cache_dir.clone(),
    );

    if args.price_only {
        let price = executor.last_price(&args.pair).await?;
        println!("{}", price);
        return Ok(());
    }

    let amount = args
        .amount
        .context("--amount is required to place an order")?;

    info!(
        "Placing {} {} order on {} for {} {}",
        args.account, args.side, args.pair, amount, args.pair.quote
    );
    let order = executor
        .place_order(&args.pair, args.side, amount, args.account)
        .await?;

    println!("{}", serde_json::to_string_pretty(&order)?);

    Ok(())
}
