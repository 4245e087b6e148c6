//! Oracle price feed adapter
//!
//! This crate fetches the current ETH and BTC reference prices from
//! Chainlink-style aggregator contracts and normalizes them into
//! two-decimal [`PriceQuote`](market_core::PriceQuote)s.
//!
//! # Architecture
//!
//! - [`OracleSource`]: one latest-round lookup per asset. [`JsonRpcOracle`]
//!   implements it by calling `AggregatorV3Interface.latestRoundData()`
//!   through an alloy HTTP provider.
//! - [`QuoteCache`]: optional short-lived cache owned by the adapter,
//!   disabled unless a TTL is configured.
//! - [`PriceFeedAdapter`]: runs both lookups concurrently and, on a
//!   quota/capacity failure, clears its cache and retries exactly once.
//!
//! # Example
//!
//! ```rust,ignore
//! use market_feed::{FeedConfig, PriceFeedAdapter};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let adapter = PriceFeedAdapter::from_config(FeedConfig::from_env()?)?;
//!     let prices = adapter.fetch_prices().await?;
//!     println!("ETH {} / BTC {}", prices.eth_price(), prices.btc_price());
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod cache;
pub mod config;
pub mod error;
pub mod rpc;
pub mod source;

pub use adapter::PriceFeedAdapter;
pub use cache::QuoteCache;
pub use config::{FeedConfig, FeedConfigBuilder};
pub use error::{FeedError, Result};
pub use rpc::JsonRpcOracle;
pub use source::{OracleSource, RoundData};
