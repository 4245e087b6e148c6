//! Configuration for price feed operations

use crate::error::{FeedError, Result};
use alloy::primitives::{Address, address};
use market_core::Asset;
use std::time::Duration;
use url::Url;

/// Chainlink ETH/USD aggregator on Ethereum mainnet
pub const DEFAULT_ETH_FEED: Address = address!("0x5f4eC3Df9cbd43714FE2740f5E3616155c5b8419");

/// Chainlink BTC/USD aggregator on Ethereum mainnet
pub const DEFAULT_BTC_FEED: Address = address!("0xF4030086522a5bEEa4988F8cA5B36dbC97BeE88c");

/// Public Ethereum mainnet JSON-RPC endpoint
pub const DEFAULT_RPC_URL: &str = "https://ethereum-rpc.publicnode.com";

/// Configuration for the price feed adapter
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Ethereum JSON-RPC endpoint
    pub rpc_url: String,

    /// Aggregator contract address for ETH/USD
    pub eth_feed: Address,

    /// Aggregator contract address for BTC/USD
    pub btc_feed: Address,

    /// Timeout applied to each oracle lookup
    pub request_timeout: Duration,

    /// Lifetime of cached quotes; zero (the default) disables caching so
    /// every fetch reads the oracle
    pub cache_ttl: Duration,

    /// Client-side request budget against the RPC endpoint
    pub rate_limit_per_second: u32,

    /// Decimals of the raw oracle answer
    pub answer_decimals: u32,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            eth_feed: DEFAULT_ETH_FEED,
            btc_feed: DEFAULT_BTC_FEED,
            request_timeout: Duration::from_secs(10),
            cache_ttl: Duration::ZERO,
            rate_limit_per_second: 10,
            answer_decimals: 8,
        }
    }
}

impl FeedConfig {
    /// Create a new configuration builder
    pub fn builder() -> FeedConfigBuilder {
        FeedConfigBuilder::default()
    }

    /// Load configuration from `MARKET_RPC_URL`, `MARKET_ETH_FEED`,
    /// `MARKET_BTC_FEED` and `MARKET_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env().build()
    }

    /// Aggregator address for an asset
    pub fn feed_address(&self, asset: Asset) -> Address {
        match asset {
            Asset::Eth => self.eth_feed,
            Asset::Btc => self.btc_feed,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.rpc_url)
            .map_err(|e| FeedError::ConfigError(format!("invalid rpc_url '{}': {e}", self.rpc_url)))?;

        for asset in Asset::ALL {
            if self.feed_address(asset).is_zero() {
                return Err(FeedError::ConfigError(format!(
                    "{asset} feed address must not be the zero address"
                )));
            }
        }

        if self.request_timeout.is_zero() {
            return Err(FeedError::ConfigError(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        if self.rate_limit_per_second == 0 {
            return Err(FeedError::ConfigError(
                "rate_limit_per_second must be greater than 0".to_string(),
            ));
        }

        if self.answer_decimals > 28 {
            return Err(FeedError::ConfigError(
                "answer_decimals must be at most 28".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for FeedConfig
#[derive(Debug, Default)]
pub struct FeedConfigBuilder {
    rpc_url: Option<String>,
    eth_feed: Option<Address>,
    btc_feed: Option<Address>,
    request_timeout: Option<Duration>,
    cache_ttl: Option<Duration>,
    rate_limit_per_second: Option<u32>,
    answer_decimals: Option<u32>,
    env_error: Option<String>,
}

impl FeedConfigBuilder {
    /// Set the JSON-RPC endpoint
    pub fn rpc_url(mut self, url: impl Into<String>) -> Self {
        self.rpc_url = Some(url.into());
        self
    }

    /// Set the aggregator address for an asset
    pub fn feed_address(mut self, asset: Asset, address: Address) -> Self {
        match asset {
            Asset::Eth => self.eth_feed = Some(address),
            Asset::Btc => self.btc_feed = Some(address),
        }
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set cache TTL
    pub fn cache_ttl(mut self, duration: Duration) -> Self {
        self.cache_ttl = Some(duration);
        self
    }

    /// Set client-side rate limit
    pub fn rate_limit_per_second(mut self, limit: u32) -> Self {
        self.rate_limit_per_second = Some(limit);
        self
    }

    /// Set answer decimals
    pub fn answer_decimals(mut self, decimals: u32) -> Self {
        self.answer_decimals = Some(decimals);
        self
    }

    /// Apply overrides from the process environment
    pub fn with_env(self) -> Self {
        self.with_lookup(|key| std::env::var(key).ok())
    }

    fn with_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("MARKET_RPC_URL") {
            self.rpc_url = Some(url);
        }
        for (asset, key) in [(Asset::Eth, "MARKET_ETH_FEED"), (Asset::Btc, "MARKET_BTC_FEED")] {
            if let Some(text) = lookup(key) {
                match text.trim().parse::<Address>() {
                    Ok(address) => self = self.feed_address(asset, address),
                    Err(e) => self.env_error = Some(format!("{key} '{text}': {e}")),
                }
            }
        }
        if let Some(secs) = lookup("MARKET_TIMEOUT_SECS") {
            match secs.trim().parse::<u64>() {
                Ok(secs) => self.request_timeout = Some(Duration::from_secs(secs)),
                Err(e) => {
                    self.env_error = Some(format!("MARKET_TIMEOUT_SECS '{secs}': {e}"));
                }
            }
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<FeedConfig> {
        if let Some(detail) = self.env_error {
            return Err(FeedError::ConfigError(detail));
        }

        let defaults = FeedConfig::default();

        let config = FeedConfig {
            rpc_url: self.rpc_url.unwrap_or(defaults.rpc_url),
            eth_feed: self.eth_feed.unwrap_or(defaults.eth_feed),
            btc_feed: self.btc_feed.unwrap_or(defaults.btc_feed),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            cache_ttl: self.cache_ttl.unwrap_or(defaults.cache_ttl),
            rate_limit_per_second: self
                .rate_limit_per_second
                .unwrap_or(defaults.rate_limit_per_second),
            answer_decimals: self.answer_decimals.unwrap_or(defaults.answer_decimals),
        };

        config.validate()?;
        Ok(config)
    }
}
