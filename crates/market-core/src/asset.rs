//! Reference assets tracked by the oracle feeds

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reference asset with an oracle price feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Asset {
    /// Ether
    Eth,
    /// Bitcoin
    Btc,
}

impl Asset {
    /// All assets, in fetch order
    pub const ALL: [Asset; 2] = [Asset::Eth, Asset::Btc];

    /// Ticker symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Eth => "ETH",
            Self::Btc => "BTC",
        }
    }

    /// Human-readable network name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Eth => "Ethereum",
            Self::Btc => "Bitcoin",
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Asset {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eth" | "ethereum" => Ok(Self::Eth),
            "btc" | "bitcoin" => Ok(Self::Btc),
            other => Err(CoreError::UnknownAsset(other.to_string())),
        }
    }
}
