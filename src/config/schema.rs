//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the benchmark
//! service. All types derive Serde traits for deserialization from config files.

use alloy::primitives::utils::parse_ether;
use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::benchmark::trial::RunPolicy;
use crate::benchmark::types::TransferSpec;
use crate::error::{BenchError, BenchResult};
use crate::resilience::RetryPolicy;

/// Root configuration for the benchmark service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BenchConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,

    /// Chain and RPC settings.
    pub chain: ChainConfig,

    /// Transfer and trial settings.
    pub benchmark: BenchmarkConfig,

    /// Retry configuration for transient RPC failures.
    pub retries: RetryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Directory served as static files (index.html at `/`).
    pub static_dir: String,

    /// Request timeout in seconds. Must cover a whole run.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            static_dir: "public".to_string(),
            request_timeout_secs: 3600,
        }
    }
}

/// Chain configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// Chain ID used for signing (11155111 for Sepolia).
    pub chain_id: u64,

    /// Per-call RPC timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Transfer recipient. Defaults to the sender (self-transfer).
    pub recipient: Option<String>,

    /// Gas price multiplier (1.0 = node estimate, 1.2 = 20% buffer).
    pub gas_price_multiplier: f64,

    /// Maximum gas price in gwei (protection against spikes).
    pub max_gas_price_gwei: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: 11_155_111,
            rpc_timeout_secs: 10,
            recipient: None,
            gas_price_multiplier: 1.2,
            max_gas_price_gwei: 500,
        }
    }
}

/// Benchmark run configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Transfer amount in ether (decimal string, e.g. "0.001").
    pub amount_eth: String,

    /// Number of sequential trials per run.
    pub trials: u32,

    /// Confirmations counted as soft finality.
    pub soft_confirmations: u64,

    /// Confirmations counted as hard finality.
    pub hard_confirmations: u64,

    /// Delay between chain height polls in milliseconds.
    pub poll_interval_ms: u64,

    /// Delay between receipt lookups while waiting for inclusion.
    pub receipt_poll_interval_ms: u64,

    /// Ceiling on the wait for inclusion in seconds.
    pub inclusion_timeout_secs: u64,

    /// Overall budget per trial, submission to hard finality, in seconds.
    pub trial_timeout_secs: u64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            amount_eth: "0.001".to_string(),
            trials: 1,
            soft_confirmations: 6,
            hard_confirmations: 12,
            poll_interval_ms: 1000,
            receipt_poll_interval_ms: 1000,
            inclusion_timeout_secs: 300,
            trial_timeout_secs: 900,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 200,
            max_delay_ms: 2000,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

impl BenchConfig {
    /// Build the transfer measured by each trial for `sender`.
    pub fn transfer_spec(&self, sender: Address) -> BenchResult<TransferSpec> {
        let value = parse_ether(&self.benchmark.amount_eth).map_err(|e| {
            BenchError::InvalidConfiguration(format!(
                "Invalid amount '{}': {}",
                self.benchmark.amount_eth, e
            ))
        })?;

        let recipient = match &self.chain.recipient {
            Some(raw) => raw.parse::<Address>().map_err(|e| {
                BenchError::InvalidConfiguration(format!("Invalid recipient '{}': {}", raw, e))
            })?,
            None => sender,
        };

        Ok(TransferSpec {
            sender,
            recipient,
            value,
            soft_depth: self.benchmark.soft_confirmations,
            hard_depth: self.benchmark.hard_confirmations,
            poll_interval: Duration::from_millis(self.benchmark.poll_interval_ms),
        })
    }

    /// Deadline and retry limits for each trial.
    pub fn run_policy(&self) -> RunPolicy {
        RunPolicy {
            trial_timeout: Duration::from_secs(self.benchmark.trial_timeout_secs),
            retry: RetryPolicy::from(&self.retries),
        }
    }
}
