//! Report template and the fixed narrative it is filled with

use market_core::Asset;

pub(crate) const REPORT_TEMPLATE_NAME: &str = "analysis_report.txt";

pub(crate) const REPORT_TEMPLATE: &str = r"Analysis: {{ question }}

1. Market Overview
This market asks whether {{ asset_name }} ({{ symbol }}) will reach ${{ target_price }}.
Current reference prices: ETH ${{ eth_price }}, BTC ${{ btc_price }}.
{{ asset_name }} is trading at ${{ current_price }}.

2. Historical Context
{{ historical_high }}
Price milestones for major crypto assets have historically been reached during broad market rallies rather than in isolation.

3. Supporting Factors
{% for item in supporting_factors %}
- {{ item }}
{% endfor %}

4. Challenges
{% for item in challenges %}
- {{ item }}
{% endfor %}

5. Technical Analysis
{% if target_reached %}
{{ asset_name }} is already {{ percentage_abs }}% above the ${{ target_price }} level ({{ percentage }}% to target). The question becomes whether that level holds as support.
{% else %}
{{ asset_name }} needs to rise {{ percentage }}% from ${{ current_price }} to reach ${{ target_price }}.
{% endif %}
Key areas to watch are previous resistance zones, trading volume on breakouts, and momentum on higher timeframes.

6. Market Sentiment
{% for item in sentiment %}
- {{ item }}
{% endfor %}

7. Conclusion
{% if target_reached %}
With {{ asset_name }} trading above ${{ target_price }} ({{ percentage }}% to target), the outcome depends on the price holding through resolution.
{% else %}
A {{ percentage }}% move to ${{ target_price }} is possible in volatile crypto markets, but the outcome depends on sustained demand and the broader macro environment.
{% endif %}
Weigh the factors above against your own research before placing a bet.

Disclaimer: This analysis is generated from a fixed template and current oracle prices. It is not financial advice.
";

/// Asset-specific lines woven into the report
pub(crate) struct Narrative {
    pub historical_high: &'static str,
    pub supporting: &'static str,
    pub challenge: &'static str,
    pub sentiment: &'static str,
}

pub(crate) const SUPPORTING_FACTORS: [&str; 3] = [
    "Growing institutional participation in digital asset markets",
    "Expanding on-chain activity and developer ecosystem",
    "Improving regulatory clarity in several major jurisdictions",
];

pub(crate) const CHALLENGES: [&str; 3] = [
    "High volatility and sensitivity to macroeconomic news",
    "Regulatory uncertainty in key markets",
    "Competition from alternative assets and networks",
];

pub(crate) const SENTIMENT: [&str; 2] = [
    "Social and news sentiment tends to amplify short-term price moves",
    "Funding rates and open interest indicate how leveraged the market is",
];

pub(crate) fn narrative(asset: Asset) -> Narrative {
    match asset {
        Asset::Btc => Narrative {
            historical_high: "Bitcoin set an all-time high of roughly $69,000 in November 2021 before entering a prolonged bear market.",
            supporting: "Reduced new supply after each halving and spot ETF inflows",
            challenge: "Mining profitability pressure and energy-use scrutiny",
            sentiment: "Bitcoin dominance signals whether capital is rotating into or out of BTC",
        },
        Asset::Eth => Narrative {
            historical_high: "Ethereum set an all-time high of roughly $4,878 in November 2021 before entering a prolonged bear market.",
            supporting: "Staking yield and fee burn reducing net ETH issuance",
            challenge: "Competition from alternative smart-contract platforms and layer-2 fee capture",
            sentiment: "The ETH/BTC ratio signals appetite for risk beyond Bitcoin",
        },
    }
}
