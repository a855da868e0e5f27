//! Shared utilities for integration and load testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::http::{HeaderMap, StatusCode, Uri};
use axum::{routing::get, Router};
use opensky_proxy::config::{Credentials, ProxyConfig};
use opensky_proxy::{HttpServer, Shutdown};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

pub const UPSTREAM_PATH: &str = "/api/states/all";

/// A request as the mock upstream saw it.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub uri: Uri,
    pub headers: HeaderMap,
}

/// Everything the mock upstream received, in arrival order.
#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<SeenRequest>>>);

#[allow(dead_code)]
impl Recorder {
    fn push(&self, uri: Uri, headers: HeaderMap) {
        self.0.lock().unwrap().push(SeenRequest { uri, headers });
    }

    pub fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    pub fn last(&self) -> SeenRequest {
        self.0.lock().unwrap().last().cloned().expect("upstream was never called")
    }
}

/// Start a programmable mock upstream serving `UPSTREAM_PATH`.
pub async fn start_mock_upstream<F, Fut>(f: F) -> (SocketAddr, Recorder)
where
    F: Fn() -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = (StatusCode, String)> + Send + 'static,
{
    let recorder = Recorder::default();
    let seen = recorder.clone();

    let app = Router::new().route(
        UPSTREAM_PATH,
        get(move |uri: Uri, headers: HeaderMap| {
            let seen = seen.clone();
            let f = f.clone();
            async move {
                seen.push(uri, headers);
                f().await
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (addr, recorder)
}

/// Start a mock upstream that always answers with the same status and body.
#[allow(dead_code)]
pub async fn start_fixed_upstream(status: StatusCode, body: &'static str) -> (SocketAddr, Recorder) {
    start_mock_upstream(move || async move { (status, body.to_string()) }).await
}

/// Start a single-connection upstream that writes `reply` verbatim once the
/// request head arrives, then holds the socket open. The receiver yields how
/// long after the request the proxy closed the connection.
#[allow(dead_code)]
pub async fn start_raw_upstream(reply: &'static str) -> (SocketAddr, mpsc::UnboundedReceiver<Duration>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];

        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => return,
                Ok(n) => head.extend_from_slice(&buf[..n]),
            }
        }
        let requested = Instant::now();

        if !reply.is_empty() && socket.write_all(reply.as_bytes()).await.is_err() {
            return;
        }

        loop {
            match socket.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(_) => continue,
            }
        }
        let _ = tx.send(requested.elapsed());
    });

    (addr, rx)
}

/// An address nothing is listening on.
#[allow(dead_code)]
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Proxy configuration pointed at a local upstream.
pub fn config_for(upstream: SocketAddr) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.upstream.base_url = format!("http://{}{}", upstream, UPSTREAM_PATH);
    config.upstream.system_proxy = false;
    config.observability.metrics_enabled = false;
    config.credentials = Credentials::default();
    config
}

/// Start the proxy; returns the base URL of its route and the shutdown handle.
pub async fn start_proxy(config: ProxyConfig) -> (String, Shutdown) {
    let route = config.listener.route_path.clone();
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (format!("http://{}{}", addr, route), shutdown)
}

/// A client that never routes through an environment proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
