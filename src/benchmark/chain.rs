//! Chain access contract required by the benchmark core.

use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;

use crate::benchmark::types::{InclusionReceipt, TransferSpec};
use crate::error::BenchResult;

/// Operations the tracker, trial runner and aggregator need from a node.
///
/// Implementations classify failures into [`crate::error::BenchError`]:
/// transport problems are `Connectivity`, node rejections are `Submission`.
#[async_trait]
pub trait ChainAdapter: Send + Sync {
    /// Balance of `address` in wei.
    async fn get_balance(&self, address: Address) -> BenchResult<U256>;

    /// Sign and broadcast the transfer described by `spec`.
    async fn submit_transfer(&self, spec: &TransferSpec) -> BenchResult<TxHash>;

    /// Suspend until `tx_hash` is mined.
    ///
    /// Must give up with `Timeout` after an implementation-defined ceiling.
    async fn await_inclusion(&self, tx_hash: TxHash) -> BenchResult<InclusionReceipt>;

    /// Latest block height known to the node.
    async fn current_height(&self) -> BenchResult<u64>;
}
