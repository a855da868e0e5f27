//! Upstream flight-state API access.
//!
//! # Data Flow
//! ```text
//! BoundingBoxQuery (query.rs)
//!     → UpstreamClient::request_for (URL + Accept + optional Basic auth)
//!     → UpstreamClient::fetch (one call, raced against the deadline)
//!     → Ok(UpstreamReply) | Err(FetchError)
//! ```
//!
//! # Design Decisions
//! - Exactly one attempt per call; retry policy belongs to the caller
//! - Timeouts are distinct from other transport errors
//! - 429 is classified here so the body is never read

pub mod client;
pub mod error;
pub mod query;

pub use client::{UpstreamClient, UpstreamReply};
pub use error::{ClientError, FetchError};
pub use query::BoundingBoxQuery;
