//! Benchmark data model.

use alloy::primitives::{Address, TxHash, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Immutable description of the transfer measured by every trial of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferSpec {
    /// Account that signs and pays for the transfer.
    pub sender: Address,
    /// Destination of the transfer (the sender itself by default).
    pub recipient: Address,
    /// Amount in wei.
    pub value: U256,
    /// Confirmation depth treated as soft finality.
    pub soft_depth: u64,
    /// Confirmation depth treated as hard finality.
    pub hard_depth: u64,
    /// Delay between chain height polls.
    pub poll_interval: Duration,
}

/// First observation of a submitted transaction in a mined block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InclusionReceipt {
    pub tx_hash: TxHash,
    /// Height of the block that included the transaction.
    pub block_number: u64,
}

/// Timings of one trial, all measured from the submission instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialResult {
    pub first_confirmation: Duration,
    pub soft_finality: Duration,
    pub hard_finality: Duration,
}

/// Mean of every trial in a run, in milliseconds.
///
/// Field names on the wire match the request boundary's historical JSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    #[serde(rename = "averagefirstConfirmationTime")]
    pub average_first_confirmation_ms: f64,
    #[serde(rename = "averageSoftFinality")]
    pub average_soft_finality_ms: f64,
    #[serde(rename = "averageHardFinality")]
    pub average_hard_finality_ms: f64,
    /// Number of trials averaged.
    pub trials: u32,
}

impl AggregateResult {
    /// Average a non-empty set of trial results.
    ///
    /// Returns `None` for an empty slice.
    pub fn from_trials(results: &[TrialResult]) -> Option<Self> {
        if results.is_empty() {
            return None;
        }
        let count = results.len() as f64;
        let mean_ms = |pick: fn(&TrialResult) -> Duration| {
            let total_nanos: u128 = results.iter().map(|r| pick(r).as_nanos()).sum();
            total_nanos as f64 / count / 1_000_000.0
        };

        Some(Self {
            average_first_confirmation_ms: mean_ms(|r| r.first_confirmation),
            average_soft_finality_ms: mean_ms(|r| r.soft_finality),
            average_hard_finality_ms: mean_ms(|r| r.hard_finality),
            trials: results.len() as u32,
        })
    }
}

/// States of the per-trial state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrialPhase {
    Precheck,
    Submitted,
    Included,
    SoftFinal,
    HardFinal,
    Done,
    Failed,
}

impl TrialPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrialPhase::Precheck => "precheck",
            TrialPhase::Submitted => "submitted",
            TrialPhase::Included => "included",
            TrialPhase::SoftFinal => "soft_final",
            TrialPhase::HardFinal => "hard_final",
            TrialPhase::Done => "done",
            TrialPhase::Failed => "failed",
        }
    }
}

impl fmt::Display for TrialPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
