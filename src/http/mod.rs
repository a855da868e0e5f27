//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, bounding-box extraction)
//!     → handler.rs (one upstream call via crate::upstream)
//!     → response.rs (passthrough or error envelope, CORS)
//!     → Send to client
//! ```

pub mod handler;
pub mod request;
pub mod response;
pub mod server;

pub use handler::ProxyHandler;
pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use response::ErrorEnvelope;
pub use server::HttpServer;
