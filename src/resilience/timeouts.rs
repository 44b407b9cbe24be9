//! Deadline and cancellation enforcement.
//!
//! Every suspension point of a trial goes through one of these helpers so a
//! stuck node or a departed caller never hangs a run.

use std::future::Future;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use crate::benchmark::clock::Clock;
use crate::error::{BenchError, BenchResult};

/// Race `fut` against cancellation.
pub async fn cancellable<T, F>(cancel: &CancellationToken, fut: F) -> BenchResult<T>
where
    F: Future<Output = BenchResult<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(BenchError::Cancelled),
        result = fut => result,
    }
}

/// Time left before `deadline`, or `Timeout` naming `stage` once it passed.
pub fn remaining(
    clock: &dyn Clock,
    started: Instant,
    deadline: Instant,
    stage: &'static str,
) -> BenchResult<Duration> {
    let now = clock.now();
    if now >= deadline {
        return Err(BenchError::Timeout {
            stage,
            after: now.saturating_duration_since(started),
        });
    }
    Ok(deadline - now)
}

/// Instant after which the work of `stage` fails with `Timeout`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    pub started: Instant,
    pub at: Instant,
    pub stage: &'static str,
}

impl Deadline {
    /// Time left, or `Timeout` once `at` has passed.
    pub fn remaining(&self, clock: &dyn Clock) -> BenchResult<Duration> {
        remaining(clock, self.started, self.at, self.stage)
    }
}

/// Race `fut` against cancellation and a Tokio timeout of `limit`.
pub async fn bounded<T, F>(
    cancel: &CancellationToken,
    limit: Duration,
    stage: &'static str,
    fut: F,
) -> BenchResult<T>
where
    F: Future<Output = BenchResult<T>>,
{
    cancellable(cancel, async {
        match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => Err(BenchError::Timeout { stage, after: limit }),
        }
    })
    .await
}
