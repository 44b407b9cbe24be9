//! Confirmation depth tracking.
//!
//! # Algorithm
//! ```text
//! loop:
//!     height        = current_height()            (transient errors retried)
//!     confirmations = max(height - inclusion, 0)
//!     confirmations >= required → return now()    (no trailing sleep)
//!     deadline passed           → Timeout
//!     sleep(poll_interval)                        (cancellable)
//! ```
//!
//! The inclusion block itself counts as zero confirmations.

use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use crate::benchmark::chain::ChainAdapter;
use crate::benchmark::clock::Clock;
use crate::benchmark::types::InclusionReceipt;
use crate::error::{BenchError, BenchResult};
use crate::observability::metrics;
use crate::resilience::timeouts::{cancellable, Deadline};
use crate::resilience::{retry_transient, RetryPolicy};

/// Number of blocks mined on top of the inclusion block.
///
/// A node lagging behind, or a reorg, can report a height below the
/// inclusion height; that reads as zero confirmations.
pub fn confirmations(current_height: u64, inclusion_height: u64) -> u64 {
    current_height.saturating_sub(inclusion_height)
}

/// Polls chain height until a receipt is buried deep enough.
pub struct ConfirmationTracker<'a> {
    adapter: &'a dyn ChainAdapter,
    clock: &'a dyn Clock,
    cancel: &'a CancellationToken,
    poll_interval: Duration,
    retry: RetryPolicy,
    /// Deadline of the enclosing trial.
    deadline: Option<Deadline>,
}

impl<'a> ConfirmationTracker<'a> {
    pub fn new(
        adapter: &'a dyn ChainAdapter,
        clock: &'a dyn Clock,
        cancel: &'a CancellationToken,
        poll_interval: Duration,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            adapter,
            clock,
            cancel,
            poll_interval,
            retry,
            deadline: None,
        }
    }

    /// Fail with `Timeout` once `deadline` passes.
    pub fn with_deadline(mut self, started: Instant, deadline: Instant) -> Self {
        self.deadline = Some(Deadline {
            started,
            at: deadline,
            stage: "confirmations",
        });
        self
    }

    /// Wait until `receipt` has at least `required_depth` confirmations.
    ///
    /// Returns the instant the depth was first observed. Polling resumes
    /// from whatever height the node reports now, so consecutive calls for
    /// the same receipt only wait for the additional blocks.
    pub async fn wait_for_depth(
        &self,
        receipt: &InclusionReceipt,
        required_depth: u64,
    ) -> BenchResult<Instant> {
        loop {
            if self.cancel.is_cancelled() {
                return Err(BenchError::Cancelled);
            }

            let height = retry_transient(
                "current_height",
                self.retry,
                self.clock,
                self.cancel,
                self.deadline,
                || self.adapter.current_height(),
            )
            .await?;
            metrics::record_height_poll();

            let confirmations = confirmations(height, receipt.block_number);
            if confirmations >= required_depth {
                tracing::debug!(
                    tx_hash = %receipt.tx_hash,
                    block_number = height,
                    confirmations = confirmations,
                    required = required_depth,
                    "Confirmation depth reached"
                );
                return Ok(self.clock.now());
            }

            tracing::debug!(
                tx_hash = %receipt.tx_hash,
                confirmations = confirmations,
                required = required_depth,
                "Waiting for confirmations"
            );

            let pause = match self.deadline {
                Some(deadline) => self.poll_interval.min(deadline.remaining(self.clock)?),
                None => self.poll_interval,
            };

            cancellable(self.cancel, async {
                self.clock.sleep(pause).await;
                Ok(())
            })
            .await?;
        }
    }
}
