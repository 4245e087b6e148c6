//! Error types for analysis generation

use thiserror::Error;

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that can occur while generating an analysis
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// Caller passed a price the generator cannot work with
    #[error("Precondition violated: {0}")]
    Precondition(String),

    /// Report template failed to load or render
    #[error("Failed to render analysis template '{name}': {detail}")]
    Template { name: String, detail: String },
}
