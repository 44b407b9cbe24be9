//! One end-to-end submit-and-track trial.
//!
//! # States
//! ```text
//! PRECHECK → SUBMITTED → INCLUDED → SOFT_FINAL → HARD_FINAL → DONE
//!     └──────────┴───────────┴───────────┴───────────┴──→ FAILED
//! ```
//!
//! All three timings are measured from T0, the instant just before the
//! transfer is handed to the node.

use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use crate::benchmark::chain::ChainAdapter;
use crate::benchmark::clock::Clock;
use crate::benchmark::tracker::ConfirmationTracker;
use crate::benchmark::types::{TransferSpec, TrialPhase, TrialResult};
use crate::error::{BenchError, BenchResult};
use crate::observability::metrics;
use crate::resilience::timeouts::{bounded, cancellable, remaining};
use crate::resilience::RetryPolicy;

/// Limits applied to every trial of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPolicy {
    /// Overall budget from submission to hard finality.
    pub trial_timeout: Duration,
    /// Retry policy for height polls.
    pub retry: RetryPolicy,
}

impl Default for RunPolicy {
    fn default() -> Self {
        Self {
            trial_timeout: Duration::from_secs(900),
            retry: RetryPolicy::default(),
        }
    }
}

/// Drives a single trial against a chain adapter.
pub struct TrialRunner<'a> {
    adapter: &'a dyn ChainAdapter,
    clock: &'a dyn Clock,
    cancel: &'a CancellationToken,
    policy: RunPolicy,
}

impl<'a> TrialRunner<'a> {
    pub fn new(
        adapter: &'a dyn ChainAdapter,
        clock: &'a dyn Clock,
        cancel: &'a CancellationToken,
        policy: RunPolicy,
    ) -> Self {
        Self {
            adapter,
            clock,
            cancel,
            policy,
        }
    }

    /// Run one trial. Errors are returned exactly as the adapter raised them.
    pub async fn run_trial(&self, spec: &TransferSpec) -> BenchResult<TrialResult> {
        let mut phase = TrialPhase::Precheck;
        let result = self.drive(spec, &mut phase).await;

        match &result {
            Ok(trial) => {
                advance(&mut phase, TrialPhase::Done);
                metrics::record_trial(trial);
            }
            Err(e) => {
                tracing::warn!(
                    phase = %phase,
                    kind = e.kind(),
                    error = %e,
                    "Trial failed"
                );
                advance(&mut phase, TrialPhase::Failed);
                metrics::record_trial_failure(e.kind());
            }
        }
        result
    }

    async fn drive(&self, spec: &TransferSpec, phase: &mut TrialPhase) -> BenchResult<TrialResult> {
        // PRECHECK: advisory only, the balance can still change before submission.
        let balance = cancellable(self.cancel, self.adapter.get_balance(spec.sender)).await?;
        if balance < spec.value {
            return Err(BenchError::InsufficientFunds {
                balance,
                required: spec.value,
            });
        }

        advance(phase, TrialPhase::Submitted);
        let t0 = self.clock.now();
        let deadline = t0 + self.policy.trial_timeout;
        let tx_hash = cancellable(self.cancel, self.adapter.submit_transfer(spec)).await?;
        tracing::info!(tx_hash = %tx_hash, to = %spec.recipient, value = %spec.value, "Transfer submitted");

        let left = remaining(self.clock, t0, deadline, "inclusion")?;
        let receipt = bounded(self.cancel, left, "inclusion", self.adapter.await_inclusion(tx_hash)).await?;
        let first_confirmation = elapsed(t0, self.clock.now());
        advance(phase, TrialPhase::Included);
        tracing::info!(
            tx_hash = %tx_hash,
            block_number = receipt.block_number,
            elapsed_ms = first_confirmation.as_millis() as u64,
            "Transaction included"
        );

        let tracker = ConfirmationTracker::new(
            self.adapter,
            self.clock,
            self.cancel,
            spec.poll_interval,
            self.policy.retry,
        )
        .with_deadline(t0, deadline);

        let soft_at = tracker.wait_for_depth(&receipt, spec.soft_depth).await?;
        let soft_finality = elapsed(t0, soft_at);
        advance(phase, TrialPhase::SoftFinal);
        tracing::info!(
            tx_hash = %tx_hash,
            block_number = receipt.block_number + spec.soft_depth,
            elapsed_ms = soft_finality.as_millis() as u64,
            "Soft finality reached"
        );

        let hard_at = tracker.wait_for_depth(&receipt, spec.hard_depth).await?;
        let hard_finality = elapsed(t0, hard_at);
        advance(phase, TrialPhase::HardFinal);
        tracing::info!(
            tx_hash = %tx_hash,
            block_number = receipt.block_number + spec.hard_depth,
            elapsed_ms = hard_finality.as_millis() as u64,
            "Hard finality reached"
        );

        Ok(TrialResult {
            first_confirmation,
            soft_finality,
            hard_finality,
        })
    }
}

fn advance(phase: &mut TrialPhase, next: TrialPhase) {
    tracing::debug!(from = %phase, to = %next, "Trial phase transition");
    *phase = next;
}

fn elapsed(t0: Instant, at: Instant) -> Duration {
    at.saturating_duration_since(t0)
}
