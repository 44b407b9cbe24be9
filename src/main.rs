//! finality-bench server
//!
//! Measures how long a chain takes to include and finalize a value transfer.
//!
//! # Architecture Overview
//!
//! ```text
//!   POST /runTest {"rpcEndpoint"}
//!        │
//!        ▼
//!   ┌─────────┐   ┌──────────────┐   ┌─────────────┐   ┌──────────────┐
//!   │  http   │──▶│  Benchmark   │──▶│ TrialRunner │──▶│ Confirmation │
//!   │ handler │   │ (N trials,   │   │ (precheck,  │   │   Tracker    │
//!   └─────────┘   │  averages)   │   │  submit)    │   │ (poll height)│
//!                 └──────────────┘   └──────┬──────┘   └──────┬───────┘
//!                                           │                 │
//!                                           ▼                 ▼
//!                                    ┌─────────────────────────────┐
//!                                    │  RpcAdapter (blockchain)    │──▶ node
//!                                    └─────────────────────────────┘
//!
//!   Cross-cutting: config, resilience (retry/deadline/cancel),
//!                  observability (tracing, metrics), lifecycle (shutdown)
//! ```

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;

use finality_bench::blockchain::Wallet;
use finality_bench::config::{load_config, BenchConfig};
use finality_bench::http::HttpServer;
use finality_bench::lifecycle::{shutdown_signal, Shutdown};
use finality_bench::observability::{init_logging, init_metrics};

#[derive(Parser)]
#[command(name = "finality-bench")]
#[command(about = "Transaction finality latency benchmark server", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // A missing .env is fine; the key may come from the real environment.
    let _ = dotenvy::dotenv();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => BenchConfig::default(),
    };

    init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.server.bind_address,
        chain_id = config.chain.chain_id,
        trials = config.benchmark.trials,
        soft_confirmations = config.benchmark.soft_confirmations,
        hard_confirmations = config.benchmark.hard_confirmations,
        "finality-bench starting"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        init_metrics(addr)?;
    }

    let wallet = Wallet::from_env(config.chain.chain_id)?;

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    tokio::spawn(shutdown_signal(shutdown.clone()));

    let server = HttpServer::new(config, wallet, shutdown);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
