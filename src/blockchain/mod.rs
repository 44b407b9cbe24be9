//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment variable (private key) + endpoint URL from the request
//!     → wallet.rs (key loading, chain-bound signer)
//!     → client.rs (RPC connection with timeouts)
//!     → transaction.rs (build, sign, broadcast, await receipt)
//!     → adapter.rs (ChainAdapter for the benchmark core)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod adapter;
pub mod client;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use adapter::RpcAdapter;
pub use client::BlockchainClient;
pub use types::{BlockchainError, BlockchainResult};
pub use wallet::Wallet;
