//! Error types for contract operations

use thiserror::Error;

/// Result type alias for contract operations
pub type Result<T> = std::result::Result<T, ContractError>;

/// Errors raised at the contract boundary
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContractError {
    /// Context used before `init` or after `teardown`
    #[error("Contract not initialized")]
    NotInitialized,

    /// Sending account is not a 20-byte hex address
    #[error("Invalid account address: {0}")]
    InvalidAccount(String),

    /// Context was opened read-only and cannot send transactions
    #[error("No sending account connected")]
    NoAccount,

    /// Contract binding could not be set up
    #[error("Contract configuration error: {0}")]
    Config(String),

    /// Market question is empty
    #[error("Please enter a valid question for the market")]
    InvalidQuestion,

    /// Bet amount could not be turned into wei
    #[error("Invalid amount '{amount}': {reason}")]
    InvalidAmount { amount: String, reason: String },

    /// No market with that id is listed
    #[error("Unknown market: {0}")]
    UnknownMarket(u64),

    /// Market has already been resolved
    #[error("Market {0} is already resolved")]
    MarketResolved(u64),

    /// The contract call itself failed
    #[error("Contract call '{call}' failed: {detail}")]
    CallFailed { call: String, detail: String },
}

impl ContractError {
    pub fn call_failed(call: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::CallFailed {
            call: call.into(),
            detail: detail.into(),
        }
    }
}
