//! Request identification and body types.
//!
//! Every request carries an `x-request-id` (generated as a UUID when the
//! caller sends none) that is echoed on the response and recorded on the
//! request span.

use axum::body::Body;
use axum::http::{HeaderMap, HeaderName, Request};
use serde::{Deserialize, Serialize};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Body of `POST /runTest`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunTestRequest {
    /// JSON-RPC endpoint of the chain under test.
    #[serde(rename = "rpcEndpoint")]
    pub rpc_endpoint: String,
}

/// Layer that assigns a UUID request ID when none is present.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID), MakeRequestUuid)
}

/// Layer that copies the request ID onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID))
}

/// Request ID from the headers, or `"unknown"`.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Span for one HTTP request, tagged with its ID.
pub fn make_request_span(request: &Request<Body>) -> tracing::Span {
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id(request.headers()),
    )
}
