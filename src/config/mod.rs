//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → BenchConfig (validated, immutable)
//!     → TransferSpec + RunPolicy handed to each run
//! ```
//!
//! # Design Decisions
//! - Config is immutable for the process lifetime
//! - All fields have defaults to allow minimal configs
//! - The signing key never lives in the config file; see `blockchain::wallet`

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    BenchConfig, BenchmarkConfig, ChainConfig, LogFormat, ObservabilityConfig, RetryConfig,
    ServerConfig,
};
