//! Error types for token-detector

use thiserror::Error;

/// A rule that cannot be stored or edited
#[derive(Debug, Error)]
pub enum RuleError {
    /// Row numbers are 1-based, as shown in the editor
    #[error("Row {row} has invalid regex: {message}")]
    InvalidRegex { row: usize, message: String },

    #[error("Row {row} does not exist ({len} rules)")]
    NoSuchRow { row: usize, len: usize },
}

/// A failure to persist the rule set
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error("Failed to encode rules: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Failed to save rules: {0}")]
    Write(#[from] std::io::Error),
}
