//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! HTTP handlers and benchmark core produce:
//!     → logging.rs (structured log events, run/trial spans)
//!     → metrics.rs (counters and latency histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
pub use metrics::init_metrics;
