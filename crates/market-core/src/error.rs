//! Error types for market-core

use thiserror::Error;

/// Result type alias for market-core
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while building domain values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Asset symbol not recognised
    #[error("Unknown asset: {0}")]
    UnknownAsset(String),

    /// Price text could not be parsed as a decimal
    #[error("Invalid price '{value}': {reason}")]
    InvalidPrice { value: String, reason: String },

    /// Raw oracle reading does not fit a decimal at the given scale
    #[error("Oracle answer {answer} out of range at {decimals} decimals")]
    AnswerOutOfRange { answer: i128, decimals: u32 },
}
