//! Transfer building, broadcast, and inclusion monitoring.
//!
//! # Responsibilities
//! - Build value transfers with the on-chain nonce and a capped gas price
//! - Sign and broadcast them
//! - Poll for the receipt until the transfer is mined

use alloy::network::TransactionBuilder;
use alloy::primitives::utils::format_ether;
use alloy::primitives::{Address, TxHash, U256};
use alloy::rpc::types::TransactionRequest;
use std::time::Duration;
use tokio::time::{interval, timeout, MissedTickBehavior};

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::blockchain::wallet::Wallet;
use crate::config::schema::ChainConfig;

/// Gas limit of a plain value transfer.
const TRANSFER_GAS_LIMIT: u64 = 21_000;

/// Limits on the wait for a transfer's first receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InclusionWait {
    /// Delay between receipt lookups.
    pub poll_interval: Duration,
    /// Ceiling on the whole wait.
    pub timeout: Duration,
    /// Consecutive failed lookups tolerated before the error is returned.
    pub max_failures: u32,
}

/// Builds and sends transfers from one wallet.
#[derive(Debug, Clone)]
pub struct TxBuilder {
    client: BlockchainClient,
    wallet: Wallet,
    gas_price_multiplier: f64,
    max_gas_price_gwei: u64,
}

impl TxBuilder {
    pub fn new(client: BlockchainClient, wallet: Wallet, config: &ChainConfig) -> Self {
        Self {
            client,
            wallet,
            gas_price_multiplier: config.gas_price_multiplier,
            max_gas_price_gwei: config.max_gas_price_gwei,
        }
    }

    /// Legacy transfer request with the chain's pending nonce and gas price.
    ///
    /// Fails with `GasPriceTooHigh` when the node's price exceeds the cap.
    pub async fn transfer_request(&self, to: Address, value: U256) -> BlockchainResult<TransactionRequest> {
        let nonce = self.client.get_transaction_count(self.wallet.address()).await?;

        let gas_price = self.client.get_gas_price().await?;
        let gas_price_gwei = gas_price / 1_000_000_000;
        if gas_price_gwei > u128::from(self.max_gas_price_gwei) {
            return Err(BlockchainError::GasPriceTooHigh {
                current_gwei: u64::try_from(gas_price_gwei).unwrap_or(u64::MAX),
                max_gwei: self.max_gas_price_gwei,
            });
        }
        let adjusted_gas_price = (gas_price as f64 * self.gas_price_multiplier) as u128;

        Ok(TransactionRequest::default()
            .with_from(self.wallet.address())
            .with_to(to)
            .with_value(value)
            .with_nonce(nonce)
            .with_gas_price(adjusted_gas_price)
            .with_chain_id(self.wallet.chain_id())
            .with_gas_limit(TRANSFER_GAS_LIMIT))
    }

    /// Build, sign and broadcast a plain value transfer.
    pub async fn send_transfer(&self, to: Address, value: U256) -> BlockchainResult<TxHash> {
        let tx = self.transfer_request(to, value).await?;
        let tx_hash = self.client.send_transaction(tx).await?;

        tracing::info!(
            tx_hash = %tx_hash,
            from = %self.wallet.address(),
            to = %to,
            value_eth = %format_ether(value),
            "Transfer broadcast"
        );
        Ok(tx_hash)
    }

    /// Wait for a transfer to be mined and return its block number.
    ///
    /// Only a missing receipt counts as pending. A failed lookup is retried
    /// on the next tick; after `max_failures` failures in a row the last
    /// error is returned with its own kind.
    pub async fn wait_for_inclusion(&self, tx_hash: TxHash, wait: InclusionWait) -> BlockchainResult<u64> {
        let max_failures = wait.max_failures.max(1);

        let polling = async {
            let mut ticker = interval(wait.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut failures = 0u32;

            loop {
                ticker.tick().await;

                let receipt = match self.client.get_transaction_receipt(tx_hash).await {
                    Ok(Some(receipt)) => receipt,
                    Ok(None) => {
                        failures = 0;
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                        continue;
                    }
                    Err(e) => {
                        failures += 1;
                        if failures >= max_failures {
                            tracing::warn!(
                                tx_hash = %tx_hash,
                                failures = failures,
                                error = %e,
                                "Receipt lookups keep failing, giving up"
                            );
                            return Err(e);
                        }
                        tracing::warn!(
                            tx_hash = %tx_hash,
                            failures = failures,
                            error = %e,
                            "Receipt lookup failed, retrying"
                        );
                        continue;
                    }
                };
                failures = 0;

                if !receipt.status() {
                    return Err(BlockchainError::Reverted(tx_hash.to_string()));
                }
                match receipt.block_number {
                    Some(block_number) => return Ok(block_number),
                    None => tracing::debug!(tx_hash = %tx_hash, "Receipt without block number"),
                }
            }
        };

        timeout(wait.timeout, polling)
            .await
            .unwrap_or(Err(BlockchainError::InclusionTimeout(wait.timeout.as_secs())))
    }

    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    pub fn client(&self) -> &BlockchainClient {
        &self.client
    }
}
