//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call against the node:
//!     → timeouts.rs (per-stage deadline, cancellation)
//!     → On transient failure: retries.rs (bounded attempts)
//!     → backoff.rs (exponential delay with jitter between attempts)
//! ```
//!
//! # Design Decisions
//! - Every wait has a deadline; an unresponsive node ends in `Timeout`
//! - Only connectivity failures are retried
//! - Delays go through the injected clock so tests run in virtual time

pub mod backoff;
pub mod retries;
pub mod timeouts;

pub use retries::{retry_transient, RetryPolicy};
