//! Transaction finality latency benchmark.

pub mod benchmark;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use benchmark::{AggregateResult, Benchmark, ChainAdapter};
pub use config::schema::BenchConfig;
pub use error::{BenchError, BenchResult};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
