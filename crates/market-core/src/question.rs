//! Free-text market questions

use crate::asset::Asset;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque market question text
///
/// The text is never parsed. It is only classified by a case-insensitive
/// substring match to pick the asset an analysis should focus on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarketQuestion(String);

impl MarketQuestion {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the question has no visible characters
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Asset the question is about: Bitcoin when the text mentions
    /// "btc" or "bitcoin" in any case, Ethereum otherwise.
    pub fn target_asset(&self) -> Asset {
        let lower = self.0.to_lowercase();
        if lower.contains("btc") || lower.contains("bitcoin") {
            Asset::Btc
        } else {
            Asset::Eth
        }
    }
}

impl fmt::Display for MarketQuestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MarketQuestion {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for MarketQuestion {
    fn from(s: String) -> Self {
        Self(s)
    }
}
