//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and parses the
//! string-typed fields (addresses, amounts) up front. Every problem is
//! reported, not just the first one.

use alloy::primitives::utils::parse_ether;
use alloy::primitives::Address;
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::BenchConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &BenchConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "server.bind_address",
            format!("'{}' is not a socket address", config.server.bind_address),
        ));
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::new("server.request_timeout_secs", "must be greater than 0"));
    }

    if config.chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("chain.rpc_timeout_secs", "must be greater than 0"));
    }
    if let Some(recipient) = &config.chain.recipient {
        if recipient.parse::<Address>().is_err() {
            errors.push(ValidationError::new(
                "chain.recipient",
                format!("'{}' is not an address", recipient),
            ));
        }
    }
    if !(config.chain.gas_price_multiplier > 0.0) {
        errors.push(ValidationError::new("chain.gas_price_multiplier", "must be positive"));
    }

    let bench = &config.benchmark;
    if parse_ether(&bench.amount_eth).is_err() {
        errors.push(ValidationError::new(
            "benchmark.amount_eth",
            format!("'{}' is not an ether amount", bench.amount_eth),
        ));
    }
    for (field, value) in [
        ("benchmark.trials", u64::from(bench.trials)),
        ("benchmark.soft_confirmations", bench.soft_confirmations),
        ("benchmark.hard_confirmations", bench.hard_confirmations),
        ("benchmark.poll_interval_ms", bench.poll_interval_ms),
        ("benchmark.receipt_poll_interval_ms", bench.receipt_poll_interval_ms),
        ("benchmark.inclusion_timeout_secs", bench.inclusion_timeout_secs),
        ("benchmark.trial_timeout_secs", bench.trial_timeout_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::new(field, "must be greater than 0"));
        }
    }
    if bench.soft_confirmations >= bench.hard_confirmations {
        tracing::warn!(
            soft = bench.soft_confirmations,
            hard = bench.hard_confirmations,
            "Soft finality depth is not below hard finality depth"
        );
    }

    if config.retries.max_attempts == 0 {
        errors.push(ValidationError::new("retries.max_attempts", "must be at least 1"));
    }
    if config.retries.base_delay_ms > config.retries.max_delay_ms {
        errors.push(ValidationError::new(
            "retries.base_delay_ms",
            "must not exceed retries.max_delay_ms",
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
