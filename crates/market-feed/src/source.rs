//! Oracle source abstraction

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use market_core::Asset;
use serde::{Deserialize, Serialize};

/// Latest-round reading from a Chainlink-style aggregator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundData {
    pub round_id: u128,
    /// Price scaled by `10^decimals`
    pub answer: i128,
    /// Unix seconds
    pub started_at: u64,
    /// Unix seconds
    pub updated_at: u64,
    pub answered_in_round: u128,
}

impl RoundData {
    /// Reading with only an answer, as produced by test doubles
    pub fn with_answer(answer: i128) -> Self {
        Self {
            round_id: 0,
            answer,
            started_at: 0,
            updated_at: 0,
            answered_in_round: 0,
        }
    }

    /// Time the answer was last updated on chain
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.updated_at)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

/// Source of latest oracle readings, one asset at a time
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OracleSource: Send + Sync {
    /// Read the latest round for an asset's price feed
    async fn latest_round(&self, asset: Asset) -> Result<RoundData>;
}
