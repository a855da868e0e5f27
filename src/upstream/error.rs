//! Upstream failure taxonomy.

use std::time::Duration;

use axum::http::header::InvalidHeaderValue;
use axum::http::StatusCode;
use thiserror::Error;

/// Local failures of the single outbound call.
///
/// Upstream-reported statuses (including 429) are not errors; they arrive as
/// an [`UpstreamReply`](super::UpstreamReply).
#[derive(Debug, Error)]
pub enum FetchError {
    /// No response headers before the deadline.
    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),

    /// Headers arrived but the body did not finish before the deadline.
    #[error("upstream body incomplete after {0:?}")]
    BodyStalled(Duration),

    /// DNS, connect, TLS or body read failure.
    #[error("upstream transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

impl FetchError {
    /// Status returned to the caller for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            FetchError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            FetchError::BodyStalled(_) | FetchError::Transport(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message placed in the error envelope.
    pub fn message(&self) -> &'static str {
        match self {
            FetchError::Timeout(_) => "Request timeout",
            FetchError::BodyStalled(_) | FetchError::Transport(_) => "Failed to fetch data",
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Timeout(_) => "timeout",
            FetchError::BodyStalled(_) => "body_stalled",
            FetchError::Transport(_) => "transport",
        }
    }
}

/// Errors building the upstream client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid upstream URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),

    #[error("invalid Cache-Control value: {0}")]
    CacheControl(#[from] InvalidHeaderValue),
}
