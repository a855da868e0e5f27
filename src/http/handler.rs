//! The proxy handler: one inbound request, one upstream call, one response.

use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    response::Response,
};

use crate::config::{Credentials, UpstreamConfig};
use crate::http::request::{bounding_box, request_id};
use crate::http::response::map_outcome;
use crate::observability::metrics;
use crate::upstream::{ClientError, FetchError, UpstreamClient, UpstreamReply};

/// Forwards bounding-box queries to the upstream and normalizes the result.
///
/// Credentials are fixed at construction; `handle` never reads the
/// environment and never returns an error.
pub struct ProxyHandler {
    upstream: UpstreamClient,
    cache_control: HeaderValue,
}

impl ProxyHandler {
    pub fn new(config: &UpstreamConfig, credentials: Credentials) -> Result<Self, ClientError> {
        let upstream = UpstreamClient::new(config, credentials)?;
        let cache_control =
            HeaderValue::from_str(&format!("public, max-age={}", config.cache_max_age_secs))?;

        Ok(Self {
            upstream,
            cache_control,
        })
    }

    pub async fn handle(&self, request: Request<Body>) -> Response {
        let start_time = Instant::now();
        let (parts, _) = request.into_parts();

        let request_id = request_id(&parts.headers);
        let bbox = bounding_box(&parts.uri);

        tracing::debug!(
            request_id = %request_id,
            upstream_url = %self.upstream.url_for(&bbox),
            "Forwarding to upstream"
        );

        let outcome = self.upstream.fetch(&bbox).await;
        log_outcome(&request_id, &outcome, start_time);

        map_outcome(outcome, &self.cache_control)
    }
}

fn log_outcome(request_id: &str, outcome: &Result<UpstreamReply, FetchError>, start_time: Instant) {
    let elapsed_ms = start_time.elapsed().as_millis() as u64;

    match outcome {
        Ok(UpstreamReply::RateLimited) => {
            tracing::warn!(request_id = %request_id, elapsed_ms, "Upstream rate limited");
            metrics::record_request("rate_limited", 429, start_time);
        }
        Ok(UpstreamReply::Passthrough { status, body }) => {
            tracing::info!(
                request_id = %request_id,
                status = %status,
                bytes = body.len(),
                elapsed_ms,
                "Upstream responded"
            );
            metrics::record_request("passthrough", status.as_u16(), start_time);
        }
        Err(e) if matches!(e, FetchError::Timeout(_)) => {
            tracing::warn!(request_id = %request_id, error = %e, elapsed_ms, "Upstream timed out");
            metrics::record_request(e.kind(), e.status().as_u16(), start_time);
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, elapsed_ms, "Upstream request failed");
            metrics::record_request(e.kind(), e.status().as_u16(), start_time);
        }
    }
}
