//! Bounded retry of transient failures.
//!
//! Only errors for which [`BenchError::is_transient`] holds are retried.
//! Everything else is returned on the first occurrence.

use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::benchmark::clock::Clock;
use crate::config::schema::RetryConfig;
use crate::error::{BenchError, BenchResult};
use crate::resilience::backoff::calculate_backoff;
use crate::resilience::timeouts::{cancellable, Deadline};

/// How many times, and how patiently, a transient failure is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }
}

/// Run `op` until it succeeds, fails permanently, or attempts run out.
///
/// Backoff delays go through `clock`, never run past `deadline`, and abort
/// with `Cancelled` when `cancel` fires.
pub async fn retry_transient<T, F, Fut>(
    op_name: &'static str,
    policy: RetryPolicy,
    clock: &dyn Clock,
    cancel: &CancellationToken,
    deadline: Option<Deadline>,
    mut op: F,
) -> BenchResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = BenchResult<T>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < policy.max_attempts => {
                let mut delay = calculate_backoff(attempt, policy.base_delay, policy.max_delay);
                if let Some(deadline) = deadline {
                    delay = delay.min(deadline.remaining(clock)?);
                }
                tracing::warn!(
                    op = op_name,
                    attempt = attempt,
                    delay = ?delay,
                    error = %e,
                    "Transient failure, retrying"
                );
                cancellable(cancel, async {
                    clock.sleep(delay).await;
                    Ok::<(), BenchError>(())
                })
                .await?;
            }
            Err(e) => {
                if e.is_transient() {
                    tracing::error!(op = op_name, attempts = attempt, error = %e, "Retries exhausted");
                }
                return Err(e);
            }
        }
    }
}
