//! Chainlink aggregator reader over an Ethereum JSON-RPC provider

use crate::config::FeedConfig;
use crate::error::{FeedError, Result};
use crate::source::{OracleSource, RoundData};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::client::RpcClient;
use alloy::rpc::json_rpc::RpcError;
use alloy::sol;
use alloy::transports::http::Http;
use alloy::transports::{TransportError, TransportErrorKind};
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use market_core::Asset;
use reqwest::{Client, StatusCode};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::debug;
use url::Url;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface AggregatorV3Interface {
        function latestRoundData() external view returns (
            uint80 roundId,
            int256 answer,
            uint256 startedAt,
            uint256 updatedAt,
            uint80 answeredInRound
        );
    }
}

const PROVIDER: &str = "json-rpc";

/// Node messages that signal a quota or capacity rejection
const QUOTA_MARKERS: [&str; 5] = [
    "limit exceeded",
    "rate limit",
    "capacity",
    "quota",
    "too many requests",
];

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Chainlink aggregator reader
#[derive(Clone)]
pub struct JsonRpcOracle {
    provider: DynProvider,
    config: Arc<FeedConfig>,
    rate_limiter: SharedRateLimiter,
}

impl JsonRpcOracle {
    /// Create a client for the endpoint and feeds in `config`
    pub fn new(config: Arc<FeedConfig>) -> Result<Self> {
        config.validate()?;

        let url = Url::parse(&config.rpc_url)
            .map_err(|e| FeedError::ConfigError(format!("invalid rpc_url: {e}")))?;
        let client = Client::builder().timeout(config.request_timeout).build()?;
        let provider = ProviderBuilder::new()
            .connect_client(RpcClient::new(Http::with_client(client, url), false))
            .erased();

        let per_second = NonZeroU32::new(config.rate_limit_per_second).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_second(per_second)));

        Ok(Self {
            provider,
            config,
            rate_limiter,
        })
    }
}

impl std::fmt::Debug for JsonRpcOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonRpcOracle")
            .field("rpc_url", &self.config.rpc_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl OracleSource for JsonRpcOracle {
    async fn latest_round(&self, asset: Asset) -> Result<RoundData> {
        // Wait for rate limiter
        self.rate_limiter.until_ready().await;

        let feed = self.config.feed_address(asset);
        debug!("Reading latestRoundData for {} from {}", asset, feed);

        let aggregator = AggregatorV3Interface::new(feed, self.provider.clone());
        let round = aggregator
            .latestRoundData()
            .call()
            .await
            .map_err(classify_call_error)?;

        round_from_return(round)
    }
}

/// Map a failed contract call onto [`FeedError`], separating quota rejections
fn classify_call_error(err: alloy::contract::Error) -> FeedError {
    match err {
        alloy::contract::Error::TransportError(transport) => classify_transport_error(&transport),
        other => classify_message(other.to_string()),
    }
}

fn classify_transport_error(err: &TransportError) -> FeedError {
    match err {
        RpcError::ErrorResp(payload) => classify_rpc_error(payload.code, payload.message.to_string()),
        RpcError::Transport(TransportErrorKind::HttpError(http)) => {
            classify_http_error(http.status, &http.body)
        }
        other => classify_message(other.to_string()),
    }
}

fn classify_message(message: String) -> FeedError {
    if is_quota_message(&message) {
        FeedError::RateLimitExceeded {
            provider: PROVIDER.to_string(),
            detail: message,
        }
    } else {
        FeedError::Contract(message)
    }
}

fn is_quota_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    QUOTA_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Quota and capacity rejections become [`FeedError::RateLimitExceeded`]
fn classify_rpc_error(code: i64, message: String) -> FeedError {
    if code == -32005 || code == 429 || is_quota_message(&message) {
        FeedError::RateLimitExceeded {
            provider: PROVIDER.to_string(),
            detail: message,
        }
    } else {
        FeedError::RpcError { code, message }
    }
}

fn classify_http_error(status: u16, body: &str) -> FeedError {
    if status == StatusCode::TOO_MANY_REQUESTS.as_u16() || is_quota_message(body) {
        FeedError::RateLimitExceeded {
            provider: PROVIDER.to_string(),
            detail: format!("HTTP {status}"),
        }
    } else {
        FeedError::InvalidResponse(format!("HTTP error: {status}"))
    }
}

/// Narrow the decoded `latestRoundData()` words into [`RoundData`]
fn round_from_return(round: AggregatorV3Interface::latestRoundDataReturn) -> Result<RoundData> {
    let too_wide = |field: &str| FeedError::InvalidResponse(format!("{field} out of range"));

    Ok(RoundData {
        round_id: u128::try_from(round.roundId).map_err(|_| too_wide("roundId"))?,
        answer: i128::try_from(round.answer).map_err(|_| too_wide("answer"))?,
        started_at: u64::try_from(round.startedAt).map_err(|_| too_wide("startedAt"))?,
        updated_at: u64::try_from(round.updatedAt).map_err(|_| too_wide("updatedAt"))?,
        answered_in_round: u128::try_from(round.answeredInRound)
            .map_err(|_| too_wide("answeredInRound"))?,
    })
}
