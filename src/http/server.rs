//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the benchmark handlers and static files
//! - Wire up middleware (request ID, tracing, timeout)
//! - Bind server to listener and shut down gracefully

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::benchmark::SenderLocks;
use crate::blockchain::Wallet;
use crate::config::BenchConfig;
use crate::http::handlers;
use crate::http::request::{make_request_span, propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::Shutdown;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<BenchConfig>,
    pub wallet: Wallet,
    pub locks: Arc<SenderLocks>,
    pub shutdown: Shutdown,
}

/// HTTP server for the benchmark service.
pub struct HttpServer {
    router: Router,
    shutdown: Shutdown,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: BenchConfig, wallet: Wallet, shutdown: Shutdown) -> Self {
        let config = Arc::new(config);
        let state = AppState {
            config: config.clone(),
            wallet,
            locks: Arc::new(SenderLocks::new()),
            shutdown: shutdown.clone(),
        };

        let router = Self::build_router(&config, state);
        Self { router, shutdown }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &BenchConfig, state: AppState) -> Router {
        Router::new()
            .route("/runTest", post(handlers::run_test))
            .route("/health", get(handlers::health))
            .fallback_service(ServeDir::new(&config.server.static_dir))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.server.request_timeout_secs,
                    )))
                    .layer(propagate_request_id_layer()),
            )
    }

    /// The router, for serving on a custom listener or in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Returns once the shutdown signal fires and open connections drain.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let shutdown = self.shutdown.clone();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.wait().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
