//! Response construction.
//!
//! # Responsibilities
//! - Build the JSON error envelope for locally synthesized failures
//! - Pass upstream bodies through byte-for-byte
//! - Attach the cross-origin header to every response
//!
//! # Design Decisions
//! - Upstream bodies are never parsed or re-serialized
//! - 429 keeps its status but gets a normalized body
//! - Timeouts become 504, every other transport failure 500

use axum::{
    body::Bytes,
    http::{
        header::{ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, CONTENT_TYPE},
        HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::upstream::{FetchError, UpstreamReply};

pub const RATE_LIMITED: &str = "Rate limited";

/// Body of every locally synthesized failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    /// Milliseconds since the Unix epoch.
    pub time: i64,
    /// Always `null`; keeps the shape of a successful payload.
    pub states: Option<serde_json::Value>,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            time: chrono::Utc::now().timestamp_millis(),
            states: None,
        }
    }
}

fn allow_any_origin() -> HeaderValue {
    HeaderValue::from_static("*")
}

/// JSON envelope response with the given status.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        [(ACCESS_CONTROL_ALLOW_ORIGIN, allow_any_origin())],
        Json(ErrorEnvelope::new(message)),
    )
        .into_response()
}

/// Upstream body relayed verbatim under the upstream status.
pub fn passthrough_response(status: StatusCode, body: Bytes, cache_control: &HeaderValue) -> Response {
    (
        status,
        [
            (CONTENT_TYPE, HeaderValue::from_static("application/json")),
            (ACCESS_CONTROL_ALLOW_ORIGIN, allow_any_origin()),
            (CACHE_CONTROL, cache_control.clone()),
        ],
        body,
    )
        .into_response()
}

/// Map the outcome of the upstream call onto the client response.
pub fn map_outcome(
    outcome: Result<UpstreamReply, FetchError>,
    cache_control: &HeaderValue,
) -> Response {
    match outcome {
        Ok(UpstreamReply::RateLimited) => {
            error_response(StatusCode::TOO_MANY_REQUESTS, RATE_LIMITED)
        }
        Ok(UpstreamReply::Passthrough { status, body }) => {
            passthrough_response(status, body, cache_control)
        }
        Err(e) => error_response(e.status(), e.message()),
    }
}
