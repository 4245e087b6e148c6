//! Contract call surface

use crate::error::Result;
use crate::market::{MarketDetails, Outcome};
use alloy::primitives::{Address, U256};
use async_trait::async_trait;

/// Calls exposed by the on-chain prediction market
///
/// Implementations wrap a wallet-connected contract binding. Sending calls
/// take the account that signs the transaction.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PredictionMarket: Send + Sync {
    /// `getMarketCount()`
    async fn market_count(&self) -> Result<u64>;

    /// `getMarketDetails(index)`
    async fn market_details(&self, index: u64) -> Result<MarketDetails>;

    /// `createMarket(question)` sent from `from`
    async fn create_market(&self, from: Address, question: &str) -> Result<()>;

    /// `placeBet(marketId, outcome)` sent from `from` with `value_wei` attached
    async fn place_bet(
        &self,
        from: Address,
        market_id: u64,
        outcome: Outcome,
        value_wei: U256,
    ) -> Result<()>;
}
