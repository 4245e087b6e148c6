//! Error types for price feed operations

use market_core::{Asset, CoreError};
use std::time::Duration;
use thiserror::Error;

/// Price feed specific errors
#[derive(Debug, Error)]
pub enum FeedError {
    /// Provider refused the request for quota or capacity reasons
    #[error("Rate limit exceeded for {provider}: {detail}")]
    RateLimitExceeded { provider: String, detail: String },

    /// Oracle lookup did not finish within the configured timeout
    #[error("{asset} price request timed out after {timeout:?}")]
    Timeout { asset: Asset, timeout: Duration },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON-RPC level error returned by the node
    #[error("RPC error {code}: {message}")]
    RpcError { code: i64, message: String },

    /// Contract call failed outside the JSON-RPC error channel
    #[error("Oracle call failed: {0}")]
    Contract(String),

    /// Oracle response could not be decoded
    #[error("Invalid oracle response: {0}")]
    InvalidResponse(String),

    /// Oracle answer could not be turned into a quote
    #[error("Invalid quote: {0}")]
    Quote(#[from] CoreError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Both prices could not be obtained, after recovery where applicable
    #[error("Failed to fetch prices: {source}")]
    PriceFetch {
        #[source]
        source: Box<FeedError>,
    },
}

impl FeedError {
    /// Wrap a triggering cause into [`FeedError::PriceFetch`]
    pub fn price_fetch(cause: FeedError) -> Self {
        Self::PriceFetch {
            source: Box::new(cause),
        }
    }

    /// Whether this failure earns the one-shot cache reset and retry
    pub fn is_quota(&self) -> bool {
        match self {
            Self::RateLimitExceeded { .. } => true,
            Self::NetworkError(e) => {
                e.status() == Some(reqwest::StatusCode::TOO_MANY_REQUESTS)
            }
            _ => false,
        }
    }

    /// Triggering cause of a [`FeedError::PriceFetch`]
    pub fn cause(&self) -> Option<&FeedError> {
        match self {
            Self::PriceFetch { source } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Result type alias for price feed operations
pub type Result<T> = std::result::Result<T, FeedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FeedError::RateLimitExceeded {
            provider: "rpc".to_string(),
            detail: "daily request count exceeded".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Rate limit exceeded for rpc: daily request count exceeded"
        );

        let err = FeedError::price_fetch(FeedError::InvalidResponse("empty".to_string()));
        assert_eq!(
            err.to_string(),
            "Failed to fetch prices: Invalid oracle response: empty"
        );
    }

    #[test]
    fn test_is_quota() {
        assert!(
            FeedError::RateLimitExceeded {
                provider: "rpc".to_string(),
                detail: String::new(),
            }
            .is_quota()
        );
        assert!(!FeedError::InvalidResponse("x".to_string()).is_quota());
        assert!(
            !FeedError::Timeout {
                asset: Asset::Eth,
                timeout: Duration::from_secs(10),
            }
            .is_quota()
        );
    }

    #[test]
    fn test_cause() {
        let err = FeedError::price_fetch(FeedError::RpcError {
            code: -32000,
            message: "execution reverted".to_string(),
        });
        assert!(matches!(err.cause(), Some(FeedError::RpcError { code: -32000, .. })));
        assert!(FeedError::ConfigError("x".to_string()).cause().is_none());
    }
}
