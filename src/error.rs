//! Error taxonomy shared by the benchmark core and its boundary.
//!
//! # Propagation
//! ```text
//! ChainAdapter → ConfirmationTracker → TrialRunner → Benchmark → HTTP handler
//! ```
//! Only `Connectivity` is transient; the tracker retries it a bounded number
//! of times. Every other kind passes through each layer unchanged.

use alloy::primitives::U256;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by a benchmark run.
#[derive(Debug, Error)]
pub enum BenchError {
    /// Node unreachable, RPC timed out, or returned malformed data.
    #[error("Connectivity error: {0}")]
    Connectivity(String),

    /// The node rejected the transfer or it reverted on-chain.
    #[error("Submission rejected: {0}")]
    Submission(String),

    /// Sender balance is below the transfer value.
    #[error("Insufficient funds: balance {balance} wei is below required {required} wei")]
    InsufficientFunds { balance: U256, required: U256 },

    /// A milestone was not observed before its deadline.
    #[error("Timed out waiting for {stage} after {after:?}")]
    Timeout { stage: &'static str, after: Duration },

    /// Bad input detected before any trial starts.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The caller or the server aborted the run.
    #[error("Run cancelled")]
    Cancelled,
}

impl BenchError {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            BenchError::Connectivity(_) => "connectivity_error",
            BenchError::Submission(_) => "submission_error",
            BenchError::InsufficientFunds { .. } => "insufficient_funds_error",
            BenchError::Timeout { .. } => "timeout_error",
            BenchError::InvalidConfiguration(_) => "invalid_configuration_error",
            BenchError::Cancelled => "cancelled_error",
        }
    }

    /// Whether a local retry may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, BenchError::Connectivity(_))
    }
}

/// Result type for benchmark operations.
pub type BenchResult<T> = Result<T, BenchError>;
