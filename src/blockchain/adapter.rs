//! [`ChainAdapter`] backed by a live JSON-RPC endpoint.

use alloy::primitives::utils::format_ether;
use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use std::time::Duration;

use crate::benchmark::chain::ChainAdapter;
use crate::benchmark::types::{InclusionReceipt, TransferSpec};
use crate::blockchain::client::BlockchainClient;
use crate::blockchain::transaction::{InclusionWait, TxBuilder};
use crate::blockchain::wallet::Wallet;
use crate::config::schema::BenchConfig;
use crate::error::{BenchError, BenchResult};

/// Chain adapter for one endpoint under test.
#[derive(Debug, Clone)]
pub struct RpcAdapter {
    tx_builder: TxBuilder,
    inclusion_wait: InclusionWait,
}

impl RpcAdapter {
    /// Build an adapter for `rpc_url` signing with `wallet`.
    ///
    /// Fails with `InvalidConfiguration` for a malformed URL.
    pub fn connect(rpc_url: &str, wallet: Wallet, config: &BenchConfig) -> BenchResult<Self> {
        let client = BlockchainClient::connect(rpc_url, &wallet, &config.chain)?;
        Ok(Self {
            tx_builder: TxBuilder::new(client, wallet, &config.chain),
            inclusion_wait: InclusionWait {
                poll_interval: Duration::from_millis(config.benchmark.receipt_poll_interval_ms),
                timeout: Duration::from_secs(config.benchmark.inclusion_timeout_secs),
                max_failures: config.retries.max_attempts,
            },
        })
    }

    fn client(&self) -> &BlockchainClient {
        self.tx_builder.client()
    }
}

#[async_trait]
impl ChainAdapter for RpcAdapter {
    async fn get_balance(&self, address: Address) -> BenchResult<U256> {
        let balance = self.client().get_balance(address).await?;
        tracing::info!(
            address = %address,
            balance_eth = %format_ether(balance),
            "Sender balance"
        );
        Ok(balance)
    }

    async fn submit_transfer(&self, spec: &TransferSpec) -> BenchResult<TxHash> {
        if spec.sender != self.tx_builder.address() {
            return Err(BenchError::InvalidConfiguration(format!(
                "transfer sender {} does not match signing wallet {}",
                spec.sender,
                self.tx_builder.address()
            )));
        }
        Ok(self.tx_builder.send_transfer(spec.recipient, spec.value).await?)
    }

    async fn await_inclusion(&self, tx_hash: TxHash) -> BenchResult<InclusionReceipt> {
        let block_number = self
            .tx_builder
            .wait_for_inclusion(tx_hash, self.inclusion_wait)
            .await?;
        Ok(InclusionReceipt {
            tx_hash,
            block_number,
        })
    }

    async fn current_height(&self) -> BenchResult<u64> {
        Ok(self.client().get_block_number().await?)
    }
}
