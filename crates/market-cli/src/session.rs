//! Interactive prediction session
//!
//! Holds the last valid prices between user actions. Analysis is refused
//! while no valid prices are held, and overlapping refreshes are rejected
//! instead of racing on the adapter's cache.

use market_analysis::{AnalysisError, AnalysisGenerator, AnalysisReport};
use market_core::{MarketQuestion, PriceSnapshot};
use market_feed::{FeedError, PriceFeedAdapter};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("A price refresh is already in progress")]
    Busy,

    #[error("No valid prices available, refresh prices first")]
    NoPrices,

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

impl SessionError {
    /// Short message suitable for showing to an end user
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Busy => "Prices are already being refreshed.",
            Self::NoPrices => "Analysis is unavailable until prices load.",
            Self::Feed(_) => "Unable to fetch prices right now. Please try again later.",
            Self::Analysis(_) => "Unable to generate an analysis for these prices.",
        }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;

struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct PredictionSession {
    adapter: PriceFeedAdapter,
    generator: AnalysisGenerator,
    prices: RwLock<Option<PriceSnapshot>>,
    busy: AtomicBool,
}

impl PredictionSession {
    pub fn new(adapter: PriceFeedAdapter, generator: AnalysisGenerator) -> Self {
        Self {
            adapter,
            generator,
            prices: RwLock::new(None),
            busy: AtomicBool::new(false),
        }
    }

    /// Fetch fresh prices and hold them for later analyses
    ///
    /// On failure the previously held prices are dropped.
    pub async fn refresh_prices(&self) -> Result<PriceSnapshot> {
        if self.busy.swap(true, Ordering::AcqRel) {
            return Err(SessionError::Busy);
        }
        let _guard = BusyGuard(&self.busy);

        match self.adapter.fetch_prices().await {
            Ok(prices) => {
                info!("Prices refreshed: ETH {} BTC {}", prices.eth_price(), prices.btc_price());
                *self.prices.write().await = Some(prices);
                Ok(prices)
            }
            Err(e) => {
                warn!("Dropping held prices after failed refresh");
                *self.prices.write().await = None;
                Err(e.into())
            }
        }
    }

    /// Use caller-supplied prices instead of the oracle
    pub async fn set_prices(&self, prices: PriceSnapshot) {
        *self.prices.write().await = Some(prices);
    }

    pub async fn prices(&self) -> Option<PriceSnapshot> {
        *self.prices.read().await
    }

    /// Whether an analysis can be requested right now
    pub async fn can_analyze(&self) -> bool {
        self.prices
            .read()
            .await
            .is_some_and(|p| p.eth.is_positive() && p.btc.is_positive())
    }

    /// Generate an analysis from the held prices
    pub async fn analyze(&self, question: &str) -> Result<AnalysisReport> {
        let prices = self.prices().await.ok_or(SessionError::NoPrices)?;
        let report = self
            .generator
            .generate_from_snapshot(&MarketQuestion::from(question), &prices)?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use market_core::{Asset, PriceQuote};
    use market_feed::{FeedConfig, OracleSource, RoundData};
    use std::sync::Arc;
    use std::time::Duration;

    struct ScriptedSource {
        fail: bool,
        delay: Duration,
    }

    impl ScriptedSource {
        fn ok() -> Self {
            Self {
                fail: false,
                delay: Duration::ZERO,
            }
        }
    }

    #[async_trait]
    impl OracleSource for ScriptedSource {
        async fn latest_round(&self, asset: Asset) -> market_feed::Result<RoundData> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.fail {
                return Err(FeedError::InvalidResponse("node unavailable".to_string()));
            }
            Ok(RoundData::with_answer(match asset {
                Asset::Eth => 250_000_000_000,
                Asset::Btc => 6_000_000_000_000,
            }))
        }
    }

    fn session(source: ScriptedSource) -> PredictionSession {
        let config = FeedConfig::builder().cache_ttl(Duration::ZERO).build().unwrap();
        let adapter = PriceFeedAdapter::new(Arc::new(source), Arc::new(config));
        PredictionSession::new(adapter, AnalysisGenerator::new().unwrap())
    }

    #[tokio::test]
    async fn test_analysis_disabled_without_prices() {
        let session = session(ScriptedSource::ok());
        assert!(!session.can_analyze().await);
        assert!(matches!(
            session.analyze("Will ETH hit 10k?").await,
            Err(SessionError::NoPrices)
        ));
    }

    #[tokio::test]
    async fn test_refresh_then_analyze() {
        let session = session(ScriptedSource::ok());
        let prices = session.refresh_prices().await.unwrap();
        assert_eq!(prices.eth_price(), "2500.00");
        assert!(session.can_analyze().await);

        let report = session.analyze("Will BTC hit 100k?").await.unwrap();
        assert_eq!(report.target, Asset::Btc);
        assert!(report.text.contains("BTC $60000.00"));
    }

    #[tokio::test]
    async fn test_failed_refresh_drops_prices() {
        let session = session(ScriptedSource {
            fail: true,
            ..ScriptedSource::ok()
        });
        session
            .set_prices(PriceSnapshot::new(
                PriceQuote::parse(Asset::Eth, "2000").unwrap(),
                PriceQuote::parse(Asset::Btc, "50000").unwrap(),
            ))
            .await;

        let err = session.refresh_prices().await.unwrap_err();
        assert!(matches!(err, SessionError::Feed(FeedError::PriceFetch { .. })));
        assert!(session.prices().await.is_none());
        assert!(!session.can_analyze().await);
        assert_eq!(
            err.user_message(),
            "Unable to fetch prices right now. Please try again later."
        );
    }

    #[tokio::test]
    async fn test_overlapping_refresh_is_rejected() {
        let session = session(ScriptedSource {
            delay: Duration::from_millis(50),
            ..ScriptedSource::ok()
        });

        let (first, second) = tokio::join!(session.refresh_prices(), session.refresh_prices());
        let busy = [&first, &second]
            .iter()
            .filter(|r| matches!(r, Err(SessionError::Busy)))
            .count();
        assert_eq!(busy, 1);
        assert!(first.is_ok() || second.is_ok());

        // Flag is released once the refresh completes
        tokio_test::assert_ok!(session.refresh_prices().await);
    }

    #[tokio::test]
    async fn test_zero_price_is_not_analyzable() {
        let session = session(ScriptedSource::ok());
        session
            .set_prices(PriceSnapshot::new(
                PriceQuote::parse(Asset::Eth, "0").unwrap(),
                PriceQuote::parse(Asset::Btc, "50000").unwrap(),
            ))
            .await;

        assert!(!session.can_analyze().await);
        assert!(matches!(
            session.analyze("Will ETH hit 10k?").await,
            Err(SessionError::Analysis(AnalysisError::Precondition(_)))
        ));
    }
}
