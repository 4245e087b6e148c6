//! Explicit contract context
//!
//! Owns the contract handle and the sending account. The caller creates
//! it, initializes it once a wallet is connected, and tears it down when
//! the session ends.

use crate::contract::PredictionMarket;
use crate::error::{ContractError, Result};
use alloy::primitives::Address;
use std::sync::Arc;
use tracing::info;

struct Connection {
    contract: Arc<dyn PredictionMarket>,
    account: Option<Address>,
}

/// Contract handle plus sending account, with an explicit lifecycle
#[derive(Default)]
pub struct MarketContext {
    connection: Option<Connection>,
}

impl MarketContext {
    /// Create an uninitialized context
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a contract and the account that signs its transactions
    ///
    /// Re-initializing replaces the previous connection.
    pub fn init(&mut self, contract: Arc<dyn PredictionMarket>, account: &str) -> Result<()> {
        let account: Address = account
            .trim()
            .parse()
            .map_err(|_| ContractError::InvalidAccount(account.to_string()))?;

        self.init_with_address(contract, account);
        Ok(())
    }

    /// Attach a contract and an already parsed sending account
    pub fn init_with_address(&mut self, contract: Arc<dyn PredictionMarket>, account: Address) {
        info!("Market context initialized for account {}", account);
        self.connection = Some(Connection {
            contract,
            account: Some(account),
        });
    }

    /// Attach a contract for listing only; sending calls fail with `NoAccount`
    pub fn init_read_only(&mut self, contract: Arc<dyn PredictionMarket>) {
        info!("Market context initialized read-only");
        self.connection = Some(Connection {
            contract,
            account: None,
        });
    }

    /// Drop the contract handle
    pub fn teardown(&mut self) {
        if self.connection.take().is_some() {
            info!("Market context torn down");
        }
    }

    pub fn is_ready(&self) -> bool {
        self.connection.is_some()
    }

    pub fn contract(&self) -> Result<&Arc<dyn PredictionMarket>> {
        self.connection
            .as_ref()
            .map(|c| &c.contract)
            .ok_or(ContractError::NotInitialized)
    }

    pub fn account(&self) -> Result<Address> {
        self.connection
            .as_ref()
            .ok_or(ContractError::NotInitialized)?
            .account
            .ok_or(ContractError::NoAccount)
    }
}

impl std::fmt::Debug for MarketContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketContext")
            .field("account", &self.connection.as_ref().and_then(|c| c.account))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::MockPredictionMarket;
    use alloy::primitives::address;

    const ACCOUNT: &str = "0x00000000000000000000000000000000000000a1";

    #[test]
    fn test_uninitialized_context() {
        let ctx = MarketContext::new();
        assert!(!ctx.is_ready());
        assert!(matches!(ctx.contract(), Err(ContractError::NotInitialized)));
        assert_eq!(ctx.account(), Err(ContractError::NotInitialized));
    }

    #[test]
    fn test_init_and_teardown() {
        let mut ctx = MarketContext::new();
        ctx.init(Arc::new(MockPredictionMarket::new()), ACCOUNT).unwrap();
        assert!(ctx.is_ready());
        assert_eq!(
            ctx.account().unwrap(),
            address!("0x00000000000000000000000000000000000000a1")
        );

        ctx.teardown();
        assert!(!ctx.is_ready());
        assert!(ctx.contract().is_err());
    }

    #[test]
    fn test_init_accepts_checksummed_account() {
        let mut ctx = MarketContext::new();
        ctx.init(
            Arc::new(MockPredictionMarket::new()),
            " 0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266 ",
        )
        .unwrap();
        assert_eq!(
            ctx.account().unwrap(),
            address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
        );
    }

    #[test]
    fn test_init_rejects_bad_account() {
        let mut ctx = MarketContext::new();
        for bad in ["alice", "0x1234", "0x00000000000000000000000000000000000000zz"] {
            let err = ctx
                .init(Arc::new(MockPredictionMarket::new()), bad)
                .unwrap_err();
            assert_eq!(err, ContractError::InvalidAccount(bad.to_string()));
        }
        assert!(!ctx.is_ready());
    }

    #[test]
    fn test_read_only_context_has_no_account() {
        let mut ctx = MarketContext::new();
        ctx.init_read_only(Arc::new(MockPredictionMarket::new()));
        assert!(ctx.is_ready());
        assert!(ctx.contract().is_ok());
        assert_eq!(ctx.account(), Err(ContractError::NoAccount));
    }
}
