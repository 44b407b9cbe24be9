//! Request handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::Instrument;

use crate::benchmark::{AggregateResult, Benchmark, TokioClock};
use crate::blockchain::RpcAdapter;
use crate::error::BenchError;
use crate::http::request::{request_id, RunTestRequest};
use crate::http::response::ApiError;
use crate::http::server::AppState;

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "sender": state.wallet.address().to_string(),
        "chainId": state.wallet.chain_id(),
    }))
}

/// `POST /runTest`: run the configured trials against `rpcEndpoint`.
///
/// The run happens on its own task. Dropping this handler (the caller went
/// away) cancels it.
pub async fn run_test(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<RunTestRequest>, JsonRejection>,
) -> Result<Json<AggregateResult>, ApiError> {
    let Json(request) = body.map_err(|e| {
        BenchError::InvalidConfiguration(format!("invalid request body: {}", e.body_text()))
    })?;

    let rpc_endpoint = request.rpc_endpoint.trim();
    if rpc_endpoint.is_empty() {
        return Err(BenchError::InvalidConfiguration("rpcEndpoint is required".to_string()).into());
    }

    tracing::info!(
        request_id = %request_id(&headers),
        rpc_endpoint = %rpc_endpoint,
        "Benchmark requested"
    );

    let adapter = RpcAdapter::connect(rpc_endpoint, state.wallet.clone(), &state.config)?;
    let spec = state.config.transfer_spec(state.wallet.address())?;
    let trials = state.config.benchmark.trials;
    let benchmark = Benchmark::new(
        Arc::new(adapter),
        Arc::new(TokioClock),
        state.config.run_policy(),
    );

    let cancel = state.shutdown.child_token();
    let guard = cancel.clone().drop_guard();
    let locks = state.locks.clone();

    let task = tokio::spawn(
        async move {
            let _lock = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(BenchError::Cancelled),
                lock = locks.acquire(spec.sender) => lock,
            };
            benchmark.run(&spec, trials, &cancel).await
        }
        .instrument(tracing::Span::current()),
    );

    let outcome = task.await;
    guard.disarm();

    match outcome {
        Ok(Ok(result)) => Ok(Json(result)),
        Ok(Err(e)) => Err(e.into()),
        Err(e) => {
            tracing::error!(error = %e, "Benchmark task failed");
            Err(ApiError::Internal(e.to_string()))
        }
    }
}
