//! Shared utilities for integration tests.
#![allow(dead_code)]

use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use axum::{extract::State, routing::post, Json, Router};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use finality_bench::benchmark::{ChainAdapter, InclusionReceipt, ManualClock, TransferSpec};
use finality_bench::blockchain::Wallet;
use finality_bench::config::BenchConfig;
use finality_bench::error::{BenchError, BenchResult};
use finality_bench::http::HttpServer;
use finality_bench::lifecycle::Shutdown;

/// Anvil's first dev account.
pub const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const TEST_CHAIN_ID: u64 = 31337;

pub fn test_wallet() -> Wallet {
    Wallet::from_private_key(TEST_PRIVATE_KEY, TEST_CHAIN_ID).unwrap()
}

pub fn transfer_spec(soft_depth: u64, hard_depth: u64) -> TransferSpec {
    TransferSpec {
        sender: Address::repeat_byte(0x0a),
        recipient: Address::repeat_byte(0x0a),
        value: U256::from(1_000u64),
        soft_depth,
        hard_depth,
        poll_interval: Duration::from_secs(1),
    }
}

/// In-memory chain driven by a [`ManualClock`].
///
/// Height starts at the inclusion block and advances one block per height
/// query, unless a scripted sequence of heights is queued.
pub struct SimulatedChain {
    clock: Arc<ManualClock>,
    balance: U256,
    inclusion_block: u64,
    inclusion_delays: Mutex<VecDeque<Duration>>,
    default_inclusion_delay: Duration,
    scripted_heights: Mutex<VecDeque<u64>>,
    fail_inclusion_on: Option<u64>,
    polls_since_inclusion: AtomicU64,
    pub balance_calls: AtomicU64,
    pub submit_calls: AtomicU64,
    pub inclusion_calls: AtomicU64,
    pub height_calls: AtomicU64,
}

impl SimulatedChain {
    pub fn new(clock: Arc<ManualClock>) -> Self {
        Self {
            clock,
            balance: U256::from(1_000_000u64),
            inclusion_block: 1_000,
            inclusion_delays: Mutex::new(VecDeque::new()),
            default_inclusion_delay: Duration::from_secs(12),
            scripted_heights: Mutex::new(VecDeque::new()),
            fail_inclusion_on: None,
            polls_since_inclusion: AtomicU64::new(0),
            balance_calls: AtomicU64::new(0),
            submit_calls: AtomicU64::new(0),
            inclusion_calls: AtomicU64::new(0),
            height_calls: AtomicU64::new(0),
        }
    }

    pub fn with_balance(mut self, balance: u64) -> Self {
        self.balance = U256::from(balance);
        self
    }

    /// Virtual inclusion latency for successive trials.
    pub fn with_inclusion_delays(self, delays: &[Duration]) -> Self {
        self.inclusion_delays.lock().unwrap().extend(delays.iter().copied());
        self
    }

    /// Heights returned by the next height queries, in order.
    pub fn with_heights(self, heights: &[u64]) -> Self {
        self.scripted_heights.lock().unwrap().extend(heights.iter().copied());
        self
    }

    /// The `n`th inclusion wait (1-based) fails with an inclusion timeout.
    pub fn failing_inclusion_on(mut self, n: u64) -> Self {
        self.fail_inclusion_on = Some(n);
        self
    }

    pub fn inclusion_block(&self) -> u64 {
        self.inclusion_block
    }

    pub fn total_calls(&self) -> u64 {
        self.balance_calls.load(Ordering::SeqCst)
            + self.submit_calls.load(Ordering::SeqCst)
            + self.inclusion_calls.load(Ordering::SeqCst)
            + self.height_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainAdapter for SimulatedChain {
    async fn get_balance(&self, _address: Address) -> BenchResult<U256> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.balance)
    }

    async fn submit_transfer(&self, _spec: &TransferSpec) -> BenchResult<TxHash> {
        let n = self.submit_calls.fetch_add(1, Ordering::SeqCst);
        Ok(TxHash::with_last_byte(n as u8 + 1))
    }

    async fn await_inclusion(&self, tx_hash: TxHash) -> BenchResult<InclusionReceipt> {
        let n = self.inclusion_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_inclusion_on == Some(n) {
            return Err(BenchError::Timeout {
                stage: "inclusion",
                after: Duration::from_secs(300),
            });
        }

        let delay = self
            .inclusion_delays
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.default_inclusion_delay);
        self.clock.advance(delay);
        self.polls_since_inclusion.store(0, Ordering::SeqCst);

        Ok(InclusionReceipt {
            tx_hash,
            block_number: self.inclusion_block,
        })
    }

    async fn current_height(&self) -> BenchResult<u64> {
        self.height_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(height) = self.scripted_heights.lock().unwrap().pop_front() {
            return Ok(height);
        }
        let polls = self.polls_since_inclusion.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(self.inclusion_block + polls)
    }
}

/// Behaviour of the mock JSON-RPC node.
#[derive(Debug, Clone)]
pub struct MockNodeOptions {
    /// Balance reported for every account, in wei.
    pub balance: U256,
    /// Receipt lookups answered with `null` before the receipt appears.
    /// `None` means the receipt never appears.
    pub pending_receipt_polls: Option<u64>,
    pub inclusion_block: u64,
}

impl Default for MockNodeOptions {
    fn default() -> Self {
        Self {
            balance: U256::from(1_000_000_000_000_000_000u128),
            pending_receipt_polls: Some(1),
            inclusion_block: 100,
        }
    }
}

/// Call counters of a running mock node.
#[derive(Debug, Default)]
pub struct MockNodeStats {
    pub send_raw: AtomicU64,
    pub receipt_polls: AtomicU64,
    pub block_number: AtomicU64,
}

struct MockNodeState {
    options: MockNodeOptions,
    stats: Arc<MockNodeStats>,
}

/// Start a JSON-RPC node that answers just enough methods for one transfer.
///
/// Block height advances one block per `eth_blockNumber` call after the
/// receipt has been served.
pub async fn start_mock_node(options: MockNodeOptions) -> (SocketAddr, Arc<MockNodeStats>) {
    let stats = Arc::new(MockNodeStats::default());
    let state = Arc::new(MockNodeState {
        options,
        stats: stats.clone(),
    });

    let app = Router::new().route("/", post(rpc_handler)).with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, stats)
}

async fn rpc_handler(State(state): State<Arc<MockNodeState>>, Json(request): Json<Value>) -> Json<Value> {
    let id = request.get("id").cloned().unwrap_or(Value::Null);
    let method = request.get("method").and_then(Value::as_str).unwrap_or_default();
    let options = &state.options;
    let stats = &state.stats;

    let result = match method {
        "eth_chainId" => json!(format!("{:#x}", TEST_CHAIN_ID)),
        "eth_getBalance" => json!(format!("0x{:x}", options.balance)),
        "eth_getTransactionCount" => json!("0x0"),
        "eth_gasPrice" => json!("0x3b9aca00"),
        "eth_estimateGas" => json!("0x5208"),
        "eth_sendRawTransaction" => {
            stats.send_raw.fetch_add(1, Ordering::SeqCst);
            json!(TxHash::repeat_byte(0xab).to_string())
        }
        "eth_getTransactionReceipt" => {
            let polls = stats.receipt_polls.fetch_add(1, Ordering::SeqCst);
            match options.pending_receipt_polls {
                Some(pending) if polls >= pending => receipt_json(options.inclusion_block),
                _ => Value::Null,
            }
        }
        "eth_blockNumber" => {
            let n = stats.block_number.fetch_add(1, Ordering::SeqCst) + 1;
            json!(format!("{:#x}", options.inclusion_block + n))
        }
        other => {
            return Json(json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": -32601, "message": format!("method {} not found", other) },
            }));
        }
    };

    Json(json!({ "jsonrpc": "2.0", "id": id, "result": result }))
}

fn receipt_json(block_number: u64) -> Value {
    let sender = test_wallet().address();
    json!({
        "transactionHash": TxHash::repeat_byte(0xab).to_string(),
        "transactionIndex": "0x0",
        "blockHash": TxHash::repeat_byte(0x11).to_string(),
        "blockNumber": format!("{:#x}", block_number),
        "from": sender.to_string(),
        "to": sender.to_string(),
        "cumulativeGasUsed": "0x5208",
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0x3b9aca00",
        "contractAddress": null,
        "logs": [],
        "logsBloom": format!("0x{}", "0".repeat(512)),
        "type": "0x0",
        "status": "0x1",
    })
}

/// Config tuned for fast runs against the mock node.
pub fn fast_config(static_dir: &str) -> BenchConfig {
    let mut config = BenchConfig::default();
    config.server.static_dir = static_dir.to_string();
    config.chain.chain_id = TEST_CHAIN_ID;
    config.chain.rpc_timeout_secs = 2;
    config.benchmark.trials = 1;
    config.benchmark.soft_confirmations = 2;
    config.benchmark.hard_confirmations = 3;
    config.benchmark.poll_interval_ms = 10;
    config.benchmark.receipt_poll_interval_ms = 10;
    config.benchmark.inclusion_timeout_secs = 10;
    config.benchmark.trial_timeout_secs = 30;
    config
}

/// Serve the benchmark on an ephemeral port.
pub async fn spawn_server(config: BenchConfig) -> (SocketAddr, Shutdown, tokio::task::JoinHandle<()>) {
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, test_wallet(), shutdown.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        server.run(listener).await.unwrap();
    });
    (addr, shutdown, handle)
}
