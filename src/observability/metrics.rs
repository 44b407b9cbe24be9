//! Metrics collection and exposition.
//!
//! # Metrics
//! - `bench_trials_total` (counter): finished trials by outcome
//! - `bench_runs_total` (counter): finished runs by outcome
//! - `bench_first_receipt_seconds` (histogram): submission to inclusion
//! - `bench_soft_finality_seconds` (histogram): submission to soft depth
//! - `bench_hard_finality_seconds` (histogram): submission to hard depth
//! - `bench_height_polls_total` (counter): block height queries
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use ::metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;

use crate::benchmark::types::TrialResult;

/// Install the Prometheus recorder and serve `/metrics` on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(addr = %addr, "Serving metrics");
    Ok(())
}

/// Record a completed trial.
pub fn record_trial(result: &TrialResult) {
    counter!("bench_trials_total", "outcome" => "success").increment(1);
    histogram!("bench_first_receipt_seconds").record(result.first_confirmation.as_secs_f64());
    histogram!("bench_soft_finality_seconds").record(result.soft_finality.as_secs_f64());
    histogram!("bench_hard_finality_seconds").record(result.hard_finality.as_secs_f64());
}

/// Record a failed trial, labelled by error kind.
pub fn record_trial_failure(kind: &'static str) {
    counter!("bench_trials_total", "outcome" => kind).increment(1);
}

/// Record the end of a run.
pub fn record_run(outcome: &'static str) {
    counter!("bench_runs_total", "outcome" => outcome).increment(1);
}

pub fn record_height_poll() {
    counter!("bench_height_polls_total").increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_recording_without_exporter_is_noop() {
        record_height_poll();
        record_run("success");
        record_trial_failure("timeout_error");
        record_trial(&TrialResult {
            first_confirmation: Duration::from_secs(12),
            soft_finality: Duration::from_secs(18),
            hard_finality: Duration::from_secs(24),
        });
    }
}
