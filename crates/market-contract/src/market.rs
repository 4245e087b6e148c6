//! Market records as listed by the contract

use crate::units::display_ether;
use alloy::primitives::U256;
use market_core::MarketQuestion;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Side of a yes/no market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Yes,
    No,
}

impl Outcome {
    /// Contract encoding: `true` for yes
    pub fn as_bool(self) -> bool {
        matches!(self, Self::Yes)
    }
}

impl From<bool> for Outcome {
    fn from(value: bool) -> Self {
        if value { Self::Yes } else { Self::No }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Yes => "Yes",
            Self::No => "No",
        })
    }
}

impl FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" | "true" => Ok(Self::Yes),
            "no" | "n" | "false" => Ok(Self::No),
            other => Err(format!("expected yes or no, got '{other}'")),
        }
    }
}

/// Raw tuple returned by `getMarketDetails(index)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketDetails {
    pub question: String,
    pub total_bets_wei: U256,
    pub resolved: bool,
    pub outcome: bool,
}

/// A listed market
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Market {
    /// Index of the market in the contract
    pub id: u64,
    pub question: MarketQuestion,
    pub total_bets_wei: U256,
    pub resolved: bool,
    /// Only meaningful once `resolved` is set
    pub outcome: Outcome,
}

impl Market {
    pub fn from_details(id: u64, details: MarketDetails) -> Self {
        Self {
            id,
            question: MarketQuestion::new(details.question),
            total_bets_wei: details.total_bets_wei,
            resolved: details.resolved,
            outcome: Outcome::from(details.outcome),
        }
    }

    /// Total staked, in ether
    pub fn total_bets_ether(&self) -> String {
        display_ether(self.total_bets_wei)
    }

    /// Resolved outcome, if any
    pub fn resolution(&self) -> Option<Outcome> {
        self.resolved.then_some(self.outcome)
    }

    pub fn status(&self) -> &'static str {
        if self.resolved { "Resolved" } else { "Ongoing" }
    }
}
