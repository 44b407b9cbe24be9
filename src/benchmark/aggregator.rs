//! Sequential multi-trial runs.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use crate::benchmark::chain::ChainAdapter;
use crate::benchmark::clock::Clock;
use crate::benchmark::trial::{RunPolicy, TrialRunner};
use crate::benchmark::types::{AggregateResult, TransferSpec};
use crate::error::{BenchError, BenchResult};
use crate::observability::metrics;

/// Runs trials one after another and averages their timings.
///
/// Trials share the sender account, so they never overlap.
#[derive(Clone)]
pub struct Benchmark {
    adapter: Arc<dyn ChainAdapter>,
    clock: Arc<dyn Clock>,
    policy: RunPolicy,
}

impl Benchmark {
    pub fn new(adapter: Arc<dyn ChainAdapter>, clock: Arc<dyn Clock>, policy: RunPolicy) -> Self {
        Self {
            adapter,
            clock,
            policy,
        }
    }

    /// Run `trial_count` trials and return their mean timings.
    ///
    /// Any failed trial aborts the run; no partial average is produced.
    pub async fn run(
        &self,
        spec: &TransferSpec,
        trial_count: u32,
        cancel: &CancellationToken,
    ) -> BenchResult<AggregateResult> {
        if trial_count == 0 {
            return Err(BenchError::InvalidConfiguration(
                "trial count must be at least 1".to_string(),
            ));
        }

        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("run", run_id = %run_id, sender = %spec.sender);
        let result = self.run_trials(spec, trial_count, cancel).instrument(span.clone()).await;

        let _entered = span.enter();
        match &result {
            Ok(aggregate) => {
                tracing::info!(
                    trials = aggregate.trials,
                    first_confirmation_ms = aggregate.average_first_confirmation_ms,
                    soft_finality_ms = aggregate.average_soft_finality_ms,
                    hard_finality_ms = aggregate.average_hard_finality_ms,
                    "Benchmark run complete"
                );
                metrics::record_run("success");
            }
            Err(e) => {
                tracing::error!(kind = e.kind(), error = %e, "Benchmark run aborted");
                metrics::record_run(e.kind());
            }
        }
        result
    }

    async fn run_trials(
        &self,
        spec: &TransferSpec,
        trial_count: u32,
        cancel: &CancellationToken,
    ) -> BenchResult<AggregateResult> {
        let runner = TrialRunner::new(self.adapter.as_ref(), self.clock.as_ref(), cancel, self.policy);
        let mut results = Vec::with_capacity(trial_count as usize);

        for trial in 1..=trial_count {
            if cancel.is_cancelled() {
                return Err(BenchError::Cancelled);
            }
            let result = runner
                .run_trial(spec)
                .instrument(tracing::info_span!("trial", trial = trial))
                .await?;
            results.push(result);
        }

        AggregateResult::from_trials(&results).ok_or_else(|| {
            BenchError::InvalidConfiguration("run produced no trials".to_string())
        })
    }
}

impl std::fmt::Debug for Benchmark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Benchmark")
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmark::clock::ManualClock;
    use crate::benchmark::types::InclusionReceipt;
    use alloy::primitives::{Address, TxHash, U256};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Chain whose inclusion delays are scripted per trial and whose
    /// finality is immediate.
    struct ScriptedInclusion {
        clock: Arc<ManualClock>,
        delays: Mutex<VecDeque<BenchResult<Duration>>>,
        calls: AtomicU64,
    }

    impl ScriptedInclusion {
        fn new(clock: Arc<ManualClock>, delays: Vec<BenchResult<Duration>>) -> Self {
            Self {
                clock,
                delays: Mutex::new(delays.into()),
                calls: AtomicU64::new(0),
            }
        }

        fn calls(&self) -> u64 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChainAdapter for ScriptedInclusion {
        async fn get_balance(&self, _address: Address) -> BenchResult<U256> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(U256::MAX)
        }

        async fn submit_transfer(&self, _spec: &TransferSpec) -> BenchResult<TxHash> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(TxHash::ZERO)
        }

        async fn await_inclusion(&self, tx_hash: TxHash) -> BenchResult<InclusionReceipt> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.delays.lock().unwrap().pop_front().expect("scripted trial");
            self.clock.advance(next?);
            Ok(InclusionReceipt {
                tx_hash,
                block_number: 10,
            })
        }

        async fn current_height(&self) -> BenchResult<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(u64::MAX)
        }
    }

    fn spec() -> TransferSpec {
        TransferSpec {
            sender: Address::ZERO,
            recipient: Address::ZERO,
            value: U256::from(1),
            soft_depth: 6,
            hard_depth: 12,
            poll_interval: Duration::from_secs(1),
        }
    }

    fn benchmark(chain: Arc<ScriptedInclusion>, clock: Arc<ManualClock>) -> Benchmark {
        Benchmark::new(chain, clock, RunPolicy::default())
    }

    #[tokio::test]
    async fn test_average_of_three_trials() {
        let clock = Arc::new(ManualClock::new());
        let chain = Arc::new(ScriptedInclusion::new(
            clock.clone(),
            vec![
                Ok(Duration::from_millis(100)),
                Ok(Duration::from_millis(200)),
                Ok(Duration::from_millis(300)),
            ],
        ));

        let result = benchmark(chain, clock)
            .run(&spec(), 3, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result.average_first_confirmation_ms, 200.0);
        assert_eq!(result.average_soft_finality_ms, 200.0);
        assert_eq!(result.average_hard_finality_ms, 200.0);
        assert_eq!(result.trials, 3);
    }

    #[tokio::test]
    async fn test_zero_trials_is_rejected_before_any_call() {
        let clock = Arc::new(ManualClock::new());
        let chain = Arc::new(ScriptedInclusion::new(clock.clone(), vec![]));

        let result = benchmark(chain.clone(), clock)
            .run(&spec(), 0, &CancellationToken::new())
            .await;

        assert!(matches!(result, Err(BenchError::InvalidConfiguration(_))));
        assert_eq!(chain.calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_trial_aborts_run() {
        let clock = Arc::new(ManualClock::new());
        let chain = Arc::new(ScriptedInclusion::new(
            clock.clone(),
            vec![
                Ok(Duration::from_millis(100)),
                Err(BenchError::Timeout {
                    stage: "inclusion",
                    after: Duration::from_secs(300),
                }),
                Ok(Duration::from_millis(300)),
            ],
        ));

        let result = benchmark(chain.clone(), clock)
            .run(&spec(), 3, &CancellationToken::new())
            .await;

        assert!(matches!(result, Err(BenchError::Timeout { .. })));
        // The third trial never starts.
        assert_eq!(chain.delays.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_run_reports_cancellation() {
        let clock = Arc::new(ManualClock::new());
        let chain = Arc::new(ScriptedInclusion::new(clock.clone(), vec![Ok(Duration::ZERO)]));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = benchmark(chain.clone(), clock).run(&spec(), 1, &cancel).await;

        assert!(matches!(result, Err(BenchError::Cancelled)));
        assert_eq!(chain.calls(), 0);
    }
}
