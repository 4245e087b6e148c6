//! Locally listed markets, kept in sync with the contract

use crate::context::MarketContext;
use crate::error::{ContractError, Result};
use crate::market::{Market, Outcome};
use crate::units::parse_bet_amount;
use futures::future::try_join_all;
use market_core::MarketQuestion;
use tracing::{debug, info};

/// Snapshot of the contract's markets plus the create/bet actions
#[derive(Debug, Default)]
pub struct MarketBoard {
    markets: Vec<Market>,
}

impl MarketBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markets(&self) -> &[Market] {
        &self.markets
    }

    pub fn get(&self, id: u64) -> Option<&Market> {
        self.markets.iter().find(|m| m.id == id)
    }

    /// Reload every market: read the count, then all details concurrently
    pub async fn refresh(&mut self, ctx: &MarketContext) -> Result<&[Market]> {
        let contract = ctx.contract()?;
        let count = contract.market_count().await?;
        debug!("Loading {} markets", count);

        let details = try_join_all((0..count).map(|index| contract.market_details(index))).await?;

        self.markets = (0..count)
            .zip(details)
            .map(|(id, details)| Market::from_details(id, details))
            .collect();
        Ok(&self.markets)
    }

    /// Create a market and reload the listing
    ///
    /// Blank questions are rejected before any call is made.
    pub async fn create_market(&mut self, ctx: &MarketContext, question: &str) -> Result<()> {
        let question = MarketQuestion::from(question.trim());
        if question.is_blank() {
            return Err(ContractError::InvalidQuestion);
        }

        let contract = ctx.contract()?;
        contract.create_market(ctx.account()?, question.as_str()).await?;
        info!("Created market: {}", question);

        self.refresh(ctx).await?;
        Ok(())
    }

    /// Place a bet of `amount_ether` on a listed, unresolved market
    pub async fn place_bet(
        &self,
        ctx: &MarketContext,
        market_id: u64,
        outcome: Outcome,
        amount_ether: &str,
    ) -> Result<()> {
        let value_wei = parse_bet_amount(amount_ether)?;

        let market = self
            .get(market_id)
            .ok_or(ContractError::UnknownMarket(market_id))?;
        if market.resolved {
            return Err(ContractError::MarketResolved(market_id));
        }

        let contract = ctx.contract()?;
        contract
            .place_bet(ctx.account()?, market_id, outcome, value_wei)
            .await?;
        info!("Placed {} ETH on {} for market {}", amount_ether.trim(), outcome, market_id);
        Ok(())
    }
}
