//! Analysis generation

use crate::error::{AnalysisError, Result};
use crate::report::AnalysisReport;
use crate::templates::{self, CHALLENGES, REPORT_TEMPLATE, REPORT_TEMPLATE_NAME, SENTIMENT, SUPPORTING_FACTORS};
use market_core::{Asset, MarketQuestion, PriceSnapshot};
use minijinja::Environment;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Milestone price used as the narrative target for an asset
pub fn milestone_price(asset: Asset) -> Decimal {
    match asset {
        Asset::Btc => Decimal::from(100_000),
        Asset::Eth => Decimal::from(10_000),
    }
}

/// `round((target / current) * 100 - 100, 2)`
///
/// Negative when `current` already exceeds `target`. `current` must be
/// strictly positive.
pub fn percentage_to_target(target: Decimal, current: Decimal) -> Result<Decimal> {
    if current <= Decimal::ZERO {
        return Err(AnalysisError::Precondition(format!(
            "current price must be positive, got {current}"
        )));
    }

    let mut pct = target
        .checked_div(current)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .and_then(|scaled| scaled.checked_sub(Decimal::ONE_HUNDRED))
        .ok_or_else(|| {
            AnalysisError::Precondition(format!(
                "percentage from {current} to {target} is out of range"
            ))
        })?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    pct.rescale(2);
    Ok(pct)
}

#[derive(Serialize)]
struct ReportContext<'a> {
    question: &'a str,
    asset_name: &'static str,
    symbol: &'static str,
    eth_price: String,
    btc_price: String,
    current_price: String,
    target_price: String,
    percentage: String,
    percentage_abs: String,
    target_reached: bool,
    historical_high: &'static str,
    supporting_factors: Vec<&'static str>,
    challenges: Vec<&'static str>,
    sentiment: Vec<&'static str>,
}

/// Renders analysis reports from the built-in template
///
/// Holds no state besides the compiled template, so one instance can be
/// shared freely.
pub struct AnalysisGenerator {
    env: Environment<'static>,
}

impl AnalysisGenerator {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.add_template(REPORT_TEMPLATE_NAME, REPORT_TEMPLATE)
            .map_err(|e| AnalysisError::Template {
                name: REPORT_TEMPLATE_NAME.to_string(),
                detail: e.to_string(),
            })?;
        Ok(Self { env })
    }

    /// Generate a report from a snapshot returned by the price feed
    pub fn generate_from_snapshot(
        &self,
        question: &MarketQuestion,
        prices: &PriceSnapshot,
    ) -> Result<AnalysisReport> {
        self.generate(question, prices.eth.value(), prices.btc.value())
    }

    /// Generate a report for `question` at the given ETH and BTC prices
    ///
    /// Prices are used exactly as given: the percentage is computed from
    /// the unrounded value and the report shows them as passed in. Both
    /// must be strictly positive.
    pub fn generate(
        &self,
        question: &MarketQuestion,
        eth: Decimal,
        btc: Decimal,
    ) -> Result<AnalysisReport> {
        for (asset, price) in [(Asset::Eth, eth), (Asset::Btc, btc)] {
            if price <= Decimal::ZERO {
                return Err(AnalysisError::Precondition(format!(
                    "{asset} price must be positive, got {price}"
                )));
            }
        }

        let target = question.target_asset();
        let current = match target {
            Asset::Eth => eth,
            Asset::Btc => btc,
        };
        let target_price = milestone_price(target);
        let percentage = percentage_to_target(target_price, current)?;
        let narrative = templates::narrative(target);

        let with_last = |common: &[&'static str], last: &'static str| {
            let mut items = common.to_vec();
            items.push(last);
            items
        };

        let context = ReportContext {
            question: question.as_str(),
            asset_name: target.name(),
            symbol: target.symbol(),
            eth_price: eth.to_string(),
            btc_price: btc.to_string(),
            current_price: current.to_string(),
            target_price: target_price.to_string(),
            percentage: percentage.to_string(),
            percentage_abs: percentage.abs().to_string(),
            target_reached: percentage <= Decimal::ZERO,
            historical_high: narrative.historical_high,
            supporting_factors: with_last(&SUPPORTING_FACTORS, narrative.supporting),
            challenges: with_last(&CHALLENGES, narrative.challenge),
            sentiment: with_last(&SENTIMENT, narrative.sentiment),
        };

        let text = self
            .env
            .get_template(REPORT_TEMPLATE_NAME)
            .and_then(|template| template.render(&context))
            .map_err(|e| AnalysisError::Template {
                name: REPORT_TEMPLATE_NAME.to_string(),
                detail: e.to_string(),
            })?;

        Ok(AnalysisReport {
            question: question.clone(),
            target,
            target_price,
            current_price: current,
            percentage_to_target: percentage,
            text,
        })
    }
}

impl std::fmt::Debug for AnalysisGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisGenerator")
            .field("template", &REPORT_TEMPLATE_NAME)
            .finish()
    }
}

/// Generate a report with a fresh [`AnalysisGenerator`]
pub fn generate_analysis(
    question: &str,
    eth_price: Decimal,
    btc_price: Decimal,
) -> Result<AnalysisReport> {
    AnalysisGenerator::new()?.generate(&MarketQuestion::from(question), eth_price, btc_price)
}
