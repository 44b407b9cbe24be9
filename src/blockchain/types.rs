//! Chain-specific types and error definitions.

use thiserror::Error;

use crate::error::BenchError;

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The endpoint URL could not be parsed.
    #[error("Invalid RPC URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The node answered the submission with an error.
    #[error("Transaction rejected: {0}")]
    Rejected(String),

    /// Transaction was reverted on-chain.
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// Transaction was not mined within the inclusion ceiling.
    #[error("Transaction not included after {0} seconds")]
    InclusionTimeout(u64),

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Gas price exceeded maximum allowed.
    #[error("Gas price {current_gwei} gwei exceeds maximum {max_gwei} gwei")]
    GasPriceTooHigh { current_gwei: u64, max_gwei: u64 },
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

impl From<BlockchainError> for BenchError {
    fn from(err: BlockchainError) -> Self {
        match err {
            BlockchainError::Rpc(_) | BlockchainError::Timeout(_) => {
                BenchError::Connectivity(err.to_string())
            }
            BlockchainError::Rejected(_)
            | BlockchainError::Reverted(_)
            | BlockchainError::GasPriceTooHigh { .. } => BenchError::Submission(err.to_string()),
            BlockchainError::InclusionTimeout(secs) => BenchError::Timeout {
                stage: "inclusion",
                after: std::time::Duration::from_secs(secs),
            },
            BlockchainError::InvalidUrl { .. } | BlockchainError::Wallet(_) => {
                BenchError::InvalidConfiguration(err.to_string())
            }
        }
    }
}
