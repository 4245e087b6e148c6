//! Price quotes produced by the oracle feeds

use crate::asset::Asset;
use crate::error::{CoreError, Result};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Number of decimal places every quote carries
pub const QUOTE_PRECISION: u32 = 2;

/// A single asset price, fixed at two decimal places
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "QuoteRepr")]
pub struct PriceQuote {
    asset: Asset,
    value: Decimal,
}

/// Wire shape of a quote; always normalized through [`PriceQuote::new`]
#[derive(Deserialize)]
struct QuoteRepr {
    asset: Asset,
    value: Decimal,
}

impl From<QuoteRepr> for PriceQuote {
    fn from(repr: QuoteRepr) -> Self {
        Self::new(repr.asset, repr.value)
    }
}

impl PriceQuote {
    /// Create a quote, rounding the value to [`QUOTE_PRECISION`] places
    pub fn new(asset: Asset, value: Decimal) -> Self {
        let mut value =
            value.round_dp_with_strategy(QUOTE_PRECISION, RoundingStrategy::MidpointAwayFromZero);
        value.rescale(QUOTE_PRECISION);
        Self { asset, value }
    }

    /// Build a quote from a raw oracle reading scaled by `10^decimals`
    ///
    /// # Examples
    ///
    /// ```
    /// use market_core::{Asset, PriceQuote};
    ///
    /// let quote = PriceQuote::from_scaled(Asset::Eth, 250_000_000_000, 8).unwrap();
    /// assert_eq!(quote.formatted(), "2500.00");
    /// ```
    pub fn from_scaled(asset: Asset, answer: i128, decimals: u32) -> Result<Self> {
        let value = Decimal::try_from_i128_with_scale(answer, decimals)
            .map_err(|_| CoreError::AnswerOutOfRange { answer, decimals })?;
        Ok(Self::new(asset, value))
    }

    /// Parse a quote from user-supplied text such as `"2500.5"`
    pub fn parse(asset: Asset, text: &str) -> Result<Self> {
        let value = Decimal::from_str(text.trim()).map_err(|e| CoreError::InvalidPrice {
            value: text.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::new(asset, value))
    }

    pub fn asset(&self) -> Asset {
        self.asset
    }

    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Strictly positive quotes are the only ones usable as a divisor
    pub fn is_positive(&self) -> bool {
        self.value > Decimal::ZERO
    }

    /// Value formatted with exactly two decimals, e.g. `"60000.00"`
    pub fn formatted(&self) -> String {
        format!("{:.2}", self.value)
    }
}

/// Prices for both reference assets taken in one fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub eth: PriceQuote,
    pub btc: PriceQuote,
}

impl PriceSnapshot {
    pub fn new(eth: PriceQuote, btc: PriceQuote) -> Self {
        Self { eth, btc }
    }

    pub fn eth_price(&self) -> String {
        self.eth.formatted()
    }

    pub fn btc_price(&self) -> String {
        self.btc.formatted()
    }

    /// Quote for the given asset
    pub fn quote(&self, asset: Asset) -> &PriceQuote {
        match asset {
            Asset::Eth => &self.eth,
            Asset::Btc => &self.btc,
        }
    }
}
