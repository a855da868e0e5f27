//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the proxy route
//! - Wire up middleware (request ID, tracing, CORS, execution budget)
//! - Bind server to listener and drain on shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    error_handling::HandleErrorLayer,
    extract::{Request, State},
    http::{header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue, StatusCode},
    response::Response,
    routing::any,
    BoxError, Router,
};
use tokio::net::TcpListener;
use tower::{timeout::error::Elapsed, ServiceBuilder};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::http::handler::ProxyHandler;
use crate::http::request::MakeRequestUuidV4;
use crate::http::response::error_response;
use crate::lifecycle::ShutdownSignal;
use crate::upstream::ClientError;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<ProxyHandler>,
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, ClientError> {
        let handler = ProxyHandler::new(&config.upstream, config.credentials.clone())?;
        let state = AppState {
            handler: Arc::new(handler),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers added last run first: the request ID is assigned before the
    /// trace span opens, and the CORS header wraps the execution budget so a
    /// request that exhausts it still carries the header.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let budget = Duration::from_secs(config.timeouts.execution_budget_secs);

        Router::new()
            .route(&config.listener.route_path, any(proxy_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(HandleErrorLayer::new(budget_exceeded))
                    .timeout(budget),
            )
            .layer(SetResponseHeaderLayer::overriding(
                ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static("*"),
            ))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV4))
    }

    /// The fully layered router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownSignal,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            route = %self.config.listener.route_path,
            upstream = %self.config.upstream.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Every method on the proxy route is handled the same way.
async fn proxy_handler(State(state): State<AppState>, request: Request) -> Response {
    state.handler.handle(request).await
}

/// Requests that outlive the execution budget get the timeout envelope.
async fn budget_exceeded(err: BoxError) -> Response {
    if err.is::<Elapsed>() {
        tracing::warn!("Execution budget exceeded");
        error_response(StatusCode::GATEWAY_TIMEOUT, "Request timeout")
    } else {
        tracing::error!(error = %err, "Unhandled middleware error");
        error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch data")
    }
}
