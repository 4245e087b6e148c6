//! Contract-backed market commands: list, create, bet

use anyhow::bail;
use market_contract::{Market, MarketContext, MarketContractBinding, display_ether};
use std::sync::Arc;
use tracing::debug;

/// Contract location and optional signing key
#[derive(Clone, PartialEq, Eq)]
pub struct ContractSettings {
    pub address: String,
    pub private_key: Option<String>,
}

impl std::fmt::Debug for ContractSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractSettings")
            .field("address", &self.address)
            .field("private_key", &self.private_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ContractSettings {
    /// `--contract` wins over `MARKET_CONTRACT`; the key only comes from `MARKET_PRIVATE_KEY`
    pub fn resolve(flag: Option<&str>, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let non_blank = |value: String| (!value.trim().is_empty()).then_some(value);

        let Some(address) = flag
            .map(str::to_string)
            .and_then(non_blank)
            .or_else(|| lookup("MARKET_CONTRACT").and_then(non_blank))
        else {
            bail!("No market contract configured. Pass --contract or set MARKET_CONTRACT");
        };

        Ok(Self {
            address,
            private_key: lookup("MARKET_PRIVATE_KEY").and_then(non_blank),
        })
    }

    pub fn from_env(flag: Option<&str>) -> anyhow::Result<Self> {
        Self::resolve(flag, |key| std::env::var(key).ok())
    }
}

/// Open a context on the configured contract
///
/// With a private key the context sends from that key's address; without
/// one it is read-only.
pub fn connect(rpc_url: &str, settings: &ContractSettings) -> anyhow::Result<MarketContext> {
    let binding = MarketContractBinding::connect(rpc_url, &settings.address, settings.private_key.as_deref())?;
    debug!("Using {:?}", binding);

    let signer = binding.signer_address();
    let mut ctx = MarketContext::new();
    match signer {
        Some(account) => ctx.init_with_address(Arc::new(binding), account),
        None => ctx.init_read_only(Arc::new(binding)),
    }
    Ok(ctx)
}

pub fn render_markets(markets: &[Market]) -> String {
    if markets.is_empty() {
        return "No markets yet.".to_string();
    }

    markets
        .iter()
        .map(|market| {
            let status = match market.resolution() {
                Some(outcome) => format!("Resolved ({outcome})"),
                None => market.status().to_string(),
            };
            format!(
                "#{} {} | {} ETH | {}",
                market.id,
                market.question,
                market.total_bets_ether(),
                status
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn markets_json(markets: &[Market]) -> serde_json::Value {
    markets
        .iter()
        .map(|market| {
            serde_json::json!({
                "id": market.id,
                "question": market.question.as_str(),
                "totalBets": display_ether(market.total_bets_wei),
                "totalBetsWei": market.total_bets_wei.to_string(),
                "resolved": market.resolved,
                "outcome": market.resolution(),
            })
        })
        .collect()
}
