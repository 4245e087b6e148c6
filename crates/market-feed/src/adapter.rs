//! Price source adapter
//!
//! Fetches both reference prices concurrently. A quota or capacity failure
//! earns exactly one recovery: the adapter clears its own quote cache and
//! repeats the whole fetch. Everything else, including a second failure,
//! surfaces as [`FeedError::PriceFetch`].

use crate::cache::QuoteCache;
use crate::config::FeedConfig;
use crate::error::{FeedError, Result};
use crate::rpc::JsonRpcOracle;
use crate::source::OracleSource;
use market_core::{Asset, PriceQuote, PriceSnapshot};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Concurrent ETH/BTC price fetcher with cache-reset recovery
pub struct PriceFeedAdapter {
    source: Arc<dyn OracleSource>,
    cache: QuoteCache,
    config: Arc<FeedConfig>,
}

impl PriceFeedAdapter {
    /// Create an adapter over any oracle source
    pub fn new(source: Arc<dyn OracleSource>, config: Arc<FeedConfig>) -> Self {
        Self {
            source,
            cache: QuoteCache::new(config.cache_ttl),
            config,
        }
    }

    /// Create an adapter backed by [`JsonRpcOracle`]
    pub fn from_config(config: FeedConfig) -> Result<Self> {
        let config = Arc::new(config);
        let source = Arc::new(JsonRpcOracle::new(Arc::clone(&config))?);
        Ok(Self::new(source, config))
    }

    /// The adapter-owned quote cache
    pub fn cache(&self) -> &QuoteCache {
        &self.cache
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Fetch current ETH and BTC prices
    ///
    /// Both lookups must succeed. On a quota error the cache is cleared
    /// and the fetch is retried once.
    pub async fn fetch_prices(&self) -> Result<PriceSnapshot> {
        match self.fetch_once().await {
            Ok(snapshot) => Ok(snapshot),
            Err(e) if e.is_quota() => {
                warn!("Price fetch hit a quota limit ({}), clearing cache and retrying once", e);
                self.cache.clear().await;

                match self.fetch_once().await {
                    Ok(snapshot) => {
                        info!("Price fetch recovered after cache reset");
                        Ok(snapshot)
                    }
                    Err(e) => {
                        error!("Price fetch failed after retry: {}", e);
                        Err(FeedError::price_fetch(e))
                    }
                }
            }
            Err(e) => {
                error!("Price fetch failed: {}", e);
                Err(FeedError::price_fetch(e))
            }
        }
    }

    async fn fetch_once(&self) -> Result<PriceSnapshot> {
        let (eth, btc) = tokio::try_join!(self.fetch_quote(Asset::Eth), self.fetch_quote(Asset::Btc))?;
        debug!("Fetched prices ETH={} BTC={}", eth.formatted(), btc.formatted());
        Ok(PriceSnapshot::new(eth, btc))
    }

    /// Fetch one asset's quote, consulting the cache first
    pub async fn fetch_quote(&self, asset: Asset) -> Result<PriceQuote> {
        if let Some(quote) = self.cache.get(asset).await {
            debug!("Cache hit for {}", asset);
            return Ok(quote);
        }

        let timeout = self.config.request_timeout;
        let round = tokio::time::timeout(timeout, self.source.latest_round(asset))
            .await
            .map_err(|_| FeedError::Timeout { asset, timeout })??;

        let quote = PriceQuote::from_scaled(asset, round.answer, self.config.answer_decimals)?;
        self.cache.insert(quote).await;
        Ok(quote)
    }
}

impl std::fmt::Debug for PriceFeedAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriceFeedAdapter")
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{MockOracleSource, RoundData};
    use async_trait::async_trait;
    use mockall::predicate::eq;
    use std::time::Duration;

    const ETH_ANSWER: i128 = 250_000_000_000;
    const BTC_ANSWER: i128 = 6_000_000_000_000;

    fn quota_error() -> FeedError {
        FeedError::RateLimitExceeded {
            provider: "test".to_string(),
            detail: "capacity exceeded".to_string(),
        }
    }

    fn adapter(source: MockOracleSource) -> PriceFeedAdapter {
        PriceFeedAdapter::new(Arc::new(source), Arc::new(FeedConfig::default()))
    }

    fn cached_adapter(source: MockOracleSource) -> PriceFeedAdapter {
        let config = FeedConfig::builder()
            .cache_ttl(Duration::from_secs(30))
            .build()
            .unwrap();
        PriceFeedAdapter::new(Arc::new(source), Arc::new(config))
    }

    #[tokio::test]
    async fn test_fetch_prices_success() {
        let mut source = MockOracleSource::new();
        source
            .expect_latest_round()
            .with(eq(Asset::Eth))
            .times(1)
            .returning(|_| Ok(RoundData::with_answer(ETH_ANSWER)));
        source
            .expect_latest_round()
            .with(eq(Asset::Btc))
            .times(1)
            .returning(|_| Ok(RoundData::with_answer(BTC_ANSWER)));

        let prices = adapter(source).fetch_prices().await.unwrap();
        assert_eq!(prices.eth_price(), "2500.00");
        assert_eq!(prices.btc_price(), "60000.00");
    }

    #[test]
    fn test_fetch_quote_blocking() {
        let mut source = MockOracleSource::new();
        source
            .expect_latest_round()
            .with(eq(Asset::Btc))
            .times(1)
            .returning(|_| Ok(RoundData::with_answer(6_543_210_987_654)));

        let quote = tokio_test::block_on(adapter(source).fetch_quote(Asset::Btc)).unwrap();
        assert_eq!(quote.formatted(), "65432.11");
    }

    #[tokio::test]
    async fn test_default_fetches_always_read_oracle() {
        let mut source = MockOracleSource::new();
        source
            .expect_latest_round()
            .with(eq(Asset::Eth))
            .times(2)
            .returning(|_| Ok(RoundData::with_answer(ETH_ANSWER)));
        source
            .expect_latest_round()
            .with(eq(Asset::Btc))
            .times(2)
            .returning(|_| Ok(RoundData::with_answer(BTC_ANSWER)));

        let adapter = adapter(source);
        adapter.fetch_prices().await.unwrap();
        adapter.fetch_prices().await.unwrap();
        assert!(adapter.cache().is_empty().await);
    }

    #[tokio::test]
    async fn test_second_fetch_served_from_cache() {
        let mut source = MockOracleSource::new();
        source
            .expect_latest_round()
            .with(eq(Asset::Eth))
            .times(1)
            .returning(|_| Ok(RoundData::with_answer(ETH_ANSWER)));
        source
            .expect_latest_round()
            .with(eq(Asset::Btc))
            .times(1)
            .returning(|_| Ok(RoundData::with_answer(BTC_ANSWER)));

        let adapter = cached_adapter(source);
        let first = adapter.fetch_prices().await.unwrap();
        let second = adapter.fetch_prices().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(adapter.cache().len().await, 2);
    }

    #[tokio::test]
    async fn test_quota_error_clears_cache_and_retries() {
        let mut source = MockOracleSource::new();
        // Only reached after the stale cached quote is cleared
        source
            .expect_latest_round()
            .with(eq(Asset::Eth))
            .times(1)
            .returning(|_| Ok(RoundData::with_answer(ETH_ANSWER)));

        let mut btc_calls = 0;
        source
            .expect_latest_round()
            .with(eq(Asset::Btc))
            .times(2)
            .returning(move |_| {
                btc_calls += 1;
                if btc_calls == 1 {
                    Err(quota_error())
                } else {
                    Ok(RoundData::with_answer(BTC_ANSWER))
                }
            });

        let adapter = cached_adapter(source);
        let stale = PriceQuote::parse(Asset::Eth, "1999.99").unwrap();
        adapter.cache().insert(stale).await;

        let prices = adapter.fetch_prices().await.unwrap();
        assert_eq!(prices.eth_price(), "2500.00");
        assert_eq!(prices.btc_price(), "60000.00");
    }

    #[tokio::test]
    async fn test_quota_then_failure_surfaces_second_cause() {
        let mut source = MockOracleSource::new();
        source
            .expect_latest_round()
            .with(eq(Asset::Eth))
            .returning(|_| Ok(RoundData::with_answer(ETH_ANSWER)));

        let mut btc_calls = 0;
        source
            .expect_latest_round()
            .with(eq(Asset::Btc))
            .times(2)
            .returning(move |_| {
                btc_calls += 1;
                if btc_calls == 1 {
                    Err(quota_error())
                } else {
                    Err(FeedError::RpcError {
                        code: -32000,
                        message: "header not found".to_string(),
                    })
                }
            });

        let err = adapter(source).fetch_prices().await.unwrap_err();
        assert!(matches!(err, FeedError::PriceFetch { .. }));
        assert!(matches!(
            err.cause(),
            Some(FeedError::RpcError { message, .. }) if message == "header not found"
        ));
    }

    #[tokio::test]
    async fn test_quota_twice_gives_up_after_one_retry() {
        let mut source = MockOracleSource::new();
        source
            .expect_latest_round()
            .with(eq(Asset::Eth))
            .returning(|_| Ok(RoundData::with_answer(ETH_ANSWER)));
        source
            .expect_latest_round()
            .with(eq(Asset::Btc))
            .times(2)
            .returning(|_| Err(quota_error()));

        let err = adapter(source).fetch_prices().await.unwrap_err();
        assert!(err.cause().is_some_and(FeedError::is_quota));
    }

    #[tokio::test]
    async fn test_non_quota_error_is_not_retried() {
        let mut source = MockOracleSource::new();
        source
            .expect_latest_round()
            .with(eq(Asset::Eth))
            .returning(|_| Ok(RoundData::with_answer(ETH_ANSWER)));
        source
            .expect_latest_round()
            .with(eq(Asset::Btc))
            .times(1)
            .returning(|_| Err(FeedError::InvalidResponse("truncated".to_string())));

        let err = adapter(source).fetch_prices().await.unwrap_err();
        assert!(matches!(err.cause(), Some(FeedError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_out_of_range_answer_fails_fetch() {
        let mut source = MockOracleSource::new();
        source
            .expect_latest_round()
            .returning(|_| Ok(RoundData::with_answer(i128::MAX)));

        let err = adapter(source).fetch_prices().await.unwrap_err();
        assert!(matches!(err.cause(), Some(FeedError::Quote(_))));
    }

    struct StalledSource;

    #[async_trait]
    impl OracleSource for StalledSource {
        async fn latest_round(&self, _asset: Asset) -> Result<RoundData> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(RoundData::with_answer(ETH_ANSWER))
        }
    }

    #[tokio::test]
    async fn test_lookup_timeout() {
        let config = FeedConfig::builder()
            .request_timeout(Duration::from_millis(20))
            .build()
            .unwrap();
        let adapter = PriceFeedAdapter::new(Arc::new(StalledSource), Arc::new(config));

        let err = adapter.fetch_prices().await.unwrap_err();
        assert!(matches!(err.cause(), Some(FeedError::Timeout { .. })));
    }
}
