//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, body types)
//!     → handlers.rs (spawn run, hold cancellation guard)
//!     → response.rs (result JSON or error body with status)
//! ```

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RunTestRequest, X_REQUEST_ID};
pub use response::{ApiError, ErrorBody};
pub use server::{AppState, HttpServer};
