//! Generated analysis report

use market_core::{Asset, MarketQuestion};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Section headers, in the order they appear in every report
pub const SECTION_HEADERS: [&str; 7] = [
    "Market Overview",
    "Historical Context",
    "Supporting Factors",
    "Challenges",
    "Technical Analysis",
    "Market Sentiment",
    "Conclusion",
];

/// A rendered analysis plus the figures it was derived from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    pub question: MarketQuestion,
    /// Asset the question was classified as targeting
    pub target: Asset,
    /// Milestone price for the target asset
    pub target_price: Decimal,
    /// Current quote of the target asset
    pub current_price: Decimal,
    /// Percentage move required to reach the milestone, two decimals
    pub percentage_to_target: Decimal,
    /// Full report text
    pub text: String,
}

impl AnalysisReport {
    /// True when the current price already sits at or above the milestone
    pub fn target_reached(&self) -> bool {
        self.percentage_to_target <= Decimal::ZERO
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
