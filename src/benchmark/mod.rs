//! Finality benchmark core.
//!
//! # Data Flow
//! ```text
//! Benchmark::run (aggregator.rs)         N sequential trials, mean timings
//!     → TrialRunner::run_trial (trial.rs)  precheck, submit, include, soft, hard
//!     → ConfirmationTracker (tracker.rs)   poll height until depth reached
//!     → ChainAdapter (chain.rs)            balance, submit, inclusion, height
//! ```
//!
//! # Design Decisions
//! - Time comes from an injected `Clock`; tests run in virtual time
//! - Every wait is bounded by the trial deadline and a cancellation token
//! - A failed trial fails the run; averages are never partial

pub mod aggregator;
pub mod chain;
pub mod clock;
pub mod guard;
pub mod tracker;
pub mod trial;
pub mod types;

pub use aggregator::Benchmark;
pub use chain::ChainAdapter;
pub use clock::{Clock, ManualClock, TokioClock};
pub use guard::SenderLocks;
pub use tracker::ConfirmationTracker;
pub use trial::{RunPolicy, TrialRunner};
pub use types::{AggregateResult, InclusionReceipt, TransferSpec, TrialPhase, TrialResult};
