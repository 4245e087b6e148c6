//! In-memory quote cache owned by the price feed adapter

use cached::{Cached, TimedCache};
use market_core::{Asset, PriceQuote};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// Thread-safe, time-limited cache of the latest quote per asset
///
/// A zero TTL turns every operation into a no-op, so lookups always hit
/// the oracle.
pub struct QuoteCache {
    cache: Option<Arc<RwLock<TimedCache<Asset, PriceQuote>>>>,
}

impl QuoteCache {
    /// Create a new cache with specified TTL
    pub fn new(ttl: Duration) -> Self {
        let cache = (!ttl.is_zero()).then(|| Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))));
        Self { cache }
    }

    /// Create a cache that never stores anything
    pub fn disabled() -> Self {
        Self { cache: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Get a fresh quote from the cache
    pub async fn get(&self, asset: Asset) -> Option<PriceQuote> {
        let cache = self.cache.as_ref()?;
        let mut cache = cache.write().await;
        cache.cache_get(&asset).copied()
    }

    /// Insert a quote, keyed by its asset
    pub async fn insert(&self, quote: PriceQuote) {
        if let Some(cache) = &self.cache {
            let mut cache = cache.write().await;
            let _ = cache.cache_set(quote.asset(), quote);
        }
    }

    /// Clear all cached entries
    pub async fn clear(&self) {
        if let Some(cache) = &self.cache {
            let mut cache = cache.write().await;
            cache.cache_clear();
        }
    }

    /// Get the number of cached entries
    pub async fn len(&self) -> usize {
        match &self.cache {
            Some(cache) => cache.read().await.cache_size(),
            None => 0,
        }
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Clone for QuoteCache {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.as_ref().map(Arc::clone),
        }
    }
}

impl std::fmt::Debug for QuoteCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuoteCache")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
