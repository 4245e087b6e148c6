//! Prediction market contract over an alloy HTTP provider

use crate::contract::PredictionMarket;
use crate::error::{ContractError, Result};
use crate::market::{MarketDetails, Outcome};
use alloy::network::EthereumWallet;
use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;
use async_trait::async_trait;
use tracing::{debug, info};
use url::Url;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IPredictionMarket {
        function getMarketCount() external view returns (uint256);
        function getMarketDetails(uint256 marketId) external view returns (
            string question,
            uint256 totalBets,
            bool resolved,
            bool outcome
        );
        function createMarket(string question) external;
        function placeBet(uint256 marketId, bool outcome) external payable;
    }
}

/// Deployed prediction market, reached over JSON-RPC
///
/// Built with a private key, the provider signs and sends transactions
/// from that key's address. Without one it can only read.
pub struct MarketContractBinding {
    contract: IPredictionMarket::IPredictionMarketInstance<DynProvider>,
    signer: Option<Address>,
}

impl MarketContractBinding {
    pub fn connect(rpc_url: &str, contract: &str, private_key: Option<&str>) -> Result<Self> {
        let url: Url = rpc_url
            .trim()
            .parse()
            .map_err(|e| ContractError::Config(format!("invalid RPC URL '{rpc_url}': {e}")))?;
        let address: Address = contract
            .trim()
            .parse()
            .map_err(|e| ContractError::Config(format!("invalid contract address '{contract}': {e}")))?;

        let (provider, signer) = match private_key {
            Some(key) => {
                let signer: PrivateKeySigner = key
                    .trim()
                    .trim_start_matches("0x")
                    .parse()
                    .map_err(|e| ContractError::Config(format!("invalid private key: {e}")))?;
                let account = signer.address();
                let provider = ProviderBuilder::new()
                    .wallet(EthereumWallet::from(signer))
                    .connect_http(url)
                    .erased();
                (provider, Some(account))
            }
            None => (ProviderBuilder::new().connect_http(url).erased(), None),
        };

        info!("Connected to prediction market {}", address);
        Ok(Self {
            contract: IPredictionMarket::new(address, provider),
            signer,
        })
    }

    pub fn address(&self) -> Address {
        *self.contract.address()
    }

    /// Account that signs sent transactions, if a key was supplied
    pub fn signer_address(&self) -> Option<Address> {
        self.signer
    }
}

impl std::fmt::Debug for MarketContractBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketContractBinding")
            .field("address", &self.address())
            .field("signer", &self.signer)
            .finish()
    }
}

#[async_trait]
impl PredictionMarket for MarketContractBinding {
    async fn market_count(&self) -> Result<u64> {
        let count = self
            .contract
            .getMarketCount()
            .call()
            .await
            .map_err(|e| ContractError::call_failed("getMarketCount", e.to_string()))?;

        u64::try_from(count)
            .map_err(|_| ContractError::call_failed("getMarketCount", format!("count {count} out of range")))
    }

    async fn market_details(&self, index: u64) -> Result<MarketDetails> {
        let details = self
            .contract
            .getMarketDetails(U256::from(index))
            .call()
            .await
            .map_err(|e| ContractError::call_failed("getMarketDetails", e.to_string()))?;

        Ok(MarketDetails {
            question: details.question,
            total_bets_wei: details.totalBets,
            resolved: details.resolved,
            outcome: details.outcome,
        })
    }

    async fn create_market(&self, from: Address, question: &str) -> Result<()> {
        let pending = self
            .contract
            .createMarket(question.to_string())
            .from(from)
            .send()
            .await
            .map_err(|e| ContractError::call_failed("createMarket", e.to_string()))?;

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| ContractError::call_failed("createMarket", e.to_string()))?;
        debug!("createMarket confirmed in {:?}", receipt.transaction_hash);
        Ok(())
    }

    async fn place_bet(
        &self,
        from: Address,
        market_id: u64,
        outcome: Outcome,
        value_wei: U256,
    ) -> Result<()> {
        let pending = self
            .contract
            .placeBet(U256::from(market_id), outcome.as_bool())
            .from(from)
            .value(value_wei)
            .send()
            .await
            .map_err(|e| ContractError::call_failed("placeBet", e.to_string()))?;

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| ContractError::call_failed("placeBet", e.to_string()))?;
        debug!("placeBet confirmed in {:?}", receipt.transaction_hash);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;
    use alloy::sol_types::SolCall;

    const RPC_URL: &str = "http://127.0.0.1:8545";
    const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
    // Well-known local development key
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_connect_read_only() {
        let binding = MarketContractBinding::connect(RPC_URL, CONTRACT, None).unwrap();
        assert_eq!(
            binding.address(),
            address!("0x5FbDB2315678afecb367f032d93F642f64180aa3")
        );
        assert_eq!(binding.signer_address(), None);
    }

    #[test]
    fn test_connect_with_key_exposes_signer() {
        let binding = MarketContractBinding::connect(RPC_URL, CONTRACT, Some(DEV_KEY)).unwrap();
        assert_eq!(
            binding.signer_address(),
            Some(address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"))
        );
    }

    #[test]
    fn test_connect_rejects_bad_config() {
        let cases = [
            ("not a url", CONTRACT, None),
            (RPC_URL, "0x1234", None),
            (RPC_URL, CONTRACT, Some("deadbeef")),
        ];
        for (url, contract, key) in cases {
            assert!(matches!(
                MarketContractBinding::connect(url, contract, key),
                Err(ContractError::Config(_))
            ));
        }
    }

    #[test]
    fn test_call_selectors() {
        assert_eq!(IPredictionMarket::getMarketCountCall::SIGNATURE, "getMarketCount()");
        assert_eq!(
            IPredictionMarket::placeBetCall::SIGNATURE,
            "placeBet(uint256,bool)"
        );
        let call = IPredictionMarket::placeBetCall {
            marketId: U256::from(3u64),
            outcome: true,
        };
        // selector + two words
        assert_eq!(call.abi_encode().len(), 4 + 64);
    }
}
