//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint under test
//! - Query chain state (block number, balances, nonces, receipts, gas price)
//! - Broadcast signed transactions
//! - Bound every call with a timeout and classify failures

use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use std::fmt::Display;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::blockchain::wallet::Wallet;
use crate::config::schema::ChainConfig;

/// RPC client bound to one endpoint and one signing wallet.
#[derive(Clone)]
pub struct BlockchainClient {
    /// Provider with the wallet filler installed.
    provider: Arc<dyn Provider + Send + Sync>,
    /// Endpoint URL, kept for logging.
    rpc_url: String,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a client for `rpc_url` that signs with `wallet`.
    ///
    /// No request is made; an unreachable endpoint surfaces on first use.
    pub fn connect(rpc_url: &str, wallet: &Wallet, config: &ChainConfig) -> BlockchainResult<Self> {
        let url: url::Url = rpc_url.parse().map_err(|e: url::ParseError| BlockchainError::InvalidUrl {
            url: rpc_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(BlockchainError::InvalidUrl {
                url: rpc_url.to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        let provider = ProviderBuilder::new()
            .wallet(wallet.ethereum_wallet())
            .connect_http(url);

        tracing::debug!(rpc_url = %rpc_url, chain_id = config.chain_id, "Blockchain client created");

        Ok(Self {
            provider: Arc::new(provider) as Arc<dyn Provider + Send + Sync>,
            rpc_url: rpc_url.to_string(),
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
        })
    }

    /// Await an RPC call under the client timeout.
    async fn call<T, E, F>(&self, op: &'static str, fut: F) -> BlockchainResult<T>
    where
        F: IntoFuture<Output = Result<T, E>>,
        E: Display,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::warn!(op = op, rpc_url = %self.rpc_url, error = %e, "RPC error");
                Err(BlockchainError::Rpc(format!("{} failed: {}", op, e)))
            }
            Err(_) => {
                tracing::warn!(op = op, rpc_url = %self.rpc_url, "RPC timeout");
                Err(BlockchainError::Timeout(self.timeout_duration.as_secs()))
            }
        }
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> BlockchainResult<u64> {
        self.call("eth_blockNumber", self.provider.get_block_number()).await
    }

    /// Get the balance of an address.
    pub async fn get_balance(&self, address: Address) -> BlockchainResult<U256> {
        self.call("eth_getBalance", self.provider.get_balance(address)).await
    }

    /// Get the transaction count (nonce) for an address.
    pub async fn get_transaction_count(&self, address: Address) -> BlockchainResult<u64> {
        self.call("eth_getTransactionCount", self.provider.get_transaction_count(address))
            .await
    }

    /// Get a transaction receipt by hash.
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<Option<TransactionReceipt>> {
        self.call("eth_getTransactionReceipt", self.provider.get_transaction_receipt(tx_hash))
            .await
    }

    /// Get current gas price in wei.
    pub async fn get_gas_price(&self) -> BlockchainResult<u128> {
        self.call("eth_gasPrice", self.provider.get_gas_price()).await
    }

    /// Sign and broadcast a transaction.
    ///
    /// An error response from the node is a rejection; anything else is a
    /// transport failure.
    pub async fn send_transaction(&self, tx: TransactionRequest) -> BlockchainResult<TxHash> {
        match timeout(self.timeout_duration, self.provider.send_transaction(tx)).await {
            Ok(Ok(pending)) => Ok(*pending.tx_hash()),
            Ok(Err(e)) if e.as_error_resp().is_some() => {
                tracing::warn!(rpc_url = %self.rpc_url, error = %e, "Transaction rejected by node");
                Err(BlockchainError::Rejected(e.to_string()))
            }
            Ok(Err(e)) => {
                tracing::warn!(rpc_url = %self.rpc_url, error = %e, "RPC error on submission");
                Err(BlockchainError::Rpc(format!("eth_sendRawTransaction failed: {}", e)))
            }
            Err(_) => Err(BlockchainError::Timeout(self.timeout_duration.as_secs())),
        }
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.rpc_url)
            .field("timeout", &self.timeout_duration)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn test_config() -> ChainConfig {
        ChainConfig {
            chain_id: 31337, // Anvil default
            rpc_timeout_secs: 2,
            ..ChainConfig::default()
        }
    }

    fn wallet() -> Wallet {
        Wallet::from_private_key(TEST_PRIVATE_KEY, 31337).unwrap()
    }

    #[tokio::test]
    async fn test_client_creation_does_not_touch_network() {
        let client = BlockchainClient::connect("http://localhost:8545", &wallet(), &test_config());
        assert!(client.is_ok());
    }

    #[test]
    fn test_malformed_url_is_rejected() {
        let err = BlockchainClient::connect("not a url", &wallet(), &test_config()).unwrap_err();
        assert!(matches!(err, BlockchainError::InvalidUrl { .. }));

        let err = BlockchainClient::connect("ftp://node.example", &wallet(), &test_config()).unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_rpc_error() {
        // Nothing listens on port 1.
        let client = BlockchainClient::connect("http://127.0.0.1:1", &wallet(), &test_config()).unwrap();
        let result = client.get_block_number().await;
        assert!(matches!(
            result,
            Err(BlockchainError::Rpc(_)) | Err(BlockchainError::Timeout(_))
        ));
    }
}
