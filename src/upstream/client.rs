//! Upstream HTTP client with deadline and optional Basic credentials.
//!
//! # Responsibilities
//! - Build the outbound URL from the bounding-box filter
//! - Attach `Accept` and, when configured, `Authorization` headers
//! - Race the call against the deadline; dropping the loser cancels it
//! - Read the body under the same deadline so a stalled body cannot hang
//! - Classify the outcome (rate limited, passthrough, local failure)

use std::time::Duration;

use axum::body::Bytes;
use axum::http::StatusCode;
use reqwest::header::ACCEPT;
use tokio::time::{timeout_at, Instant};
use url::Url;

use crate::config::{Credentials, UpstreamConfig};
use crate::upstream::error::{ClientError, FetchError};
use crate::upstream::query::BoundingBoxQuery;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// What the upstream said, when it said anything at all.
#[derive(Debug)]
pub enum UpstreamReply {
    /// Upstream answered 429. The body is not read.
    RateLimited,
    /// Any other status, with the body exactly as received.
    Passthrough { status: StatusCode, body: Bytes },
}

impl UpstreamReply {
    pub fn status(&self) -> StatusCode {
        match self {
            UpstreamReply::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            UpstreamReply::Passthrough { status, .. } => *status,
        }
    }
}

/// Client for the flight-state endpoint.
///
/// Cheap to share: the connection pool lives inside `reqwest::Client` and all
/// other fields are read-only after construction.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
    timeout: Duration,
}

impl UpstreamClient {
    /// Create a client for the configured endpoint.
    pub fn new(config: &UpstreamConfig, credentials: Credentials) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.base_url).map_err(|source| ClientError::InvalidUrl {
            url: config.base_url.clone(),
            source,
        })?;

        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if !config.system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder.build()?;

        if credentials.pair().is_some() {
            tracing::info!("Upstream requests will use Basic authentication");
        } else {
            tracing::info!("Upstream credentials not configured, requests are anonymous");
        }

        Ok(Self {
            http,
            base_url,
            credentials,
            timeout: Duration::from_millis(config.timeout_ms),
        })
    }

    /// Upstream URL for a bounding box. No `?` is added when the box is empty.
    pub fn url_for(&self, bbox: &BoundingBoxQuery) -> Url {
        let mut url = self.base_url.clone();
        if !bbox.is_empty() {
            url.query_pairs_mut().extend_pairs(bbox.pairs());
        }
        url
    }

    /// The outbound request, ready to send.
    pub fn request_for(&self, bbox: &BoundingBoxQuery) -> reqwest::RequestBuilder {
        let builder = self
            .http
            .get(self.url_for(bbox))
            .header(ACCEPT, "application/json");

        match self.credentials.pair() {
            Some((username, password)) => builder.basic_auth(username, Some(password)),
            None => builder,
        }
    }

    /// Perform exactly one upstream call.
    ///
    /// Headers missing at the deadline is a timeout. Headers in time but a
    /// body still incomplete at the same deadline is a stalled body.
    pub async fn fetch(&self, bbox: &BoundingBoxQuery) -> Result<UpstreamReply, FetchError> {
        let request = self.request_for(bbox);
        let deadline = Instant::now() + self.timeout;

        let response = match timeout_at(deadline, request.send()).await {
            Ok(result) => result?,
            Err(_) => return Err(FetchError::Timeout(self.timeout)),
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Ok(UpstreamReply::RateLimited);
        }

        let body = match timeout_at(deadline, response.bytes()).await {
            Ok(result) => result?,
            Err(_) => return Err(FetchError::BodyStalled(self.timeout)),
        };
        Ok(UpstreamReply::Passthrough { status, body })
    }
}
