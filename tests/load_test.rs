//! Load testing for the proxy.

use std::time::{Duration, Instant};

use axum::http::StatusCode;

mod common;

#[tokio::test]
async fn test_one_upstream_call_per_request_under_load() {
    // 1. Setup mock upstream
    let (upstream, seen) = common::start_mock_upstream(|| async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        (StatusCode::OK, r#"{"time":1,"states":[]}"#.to_string())
    })
    .await;

    // 2. Start proxy
    let (url, shutdown) = common::start_proxy(common::config_for(upstream)).await;

    // 3. Run load
    let concurrency = 20;
    let requests_per_task = 25;
    let total_requests = concurrency * requests_per_task;

    let client = common::client();
    let start = Instant::now();

    let mut handles = Vec::new();
    for task in 0..concurrency {
        let client = client.clone();
        let url = url.clone();
        handles.push(tokio::spawn(async move {
            let mut ok = 0;
            for i in 0..requests_per_task {
                let res = client
                    .get(format!("{}?lamin={}&lamax={}", url, task, i))
                    .send()
                    .await;
                if let Ok(res) = res {
                    if res.status() == 200 && res.headers()["access-control-allow-origin"] == "*" {
                        ok += 1;
                    }
                }
            }
            ok
        }));
    }

    let mut successes = 0;
    for handle in handles {
        successes += handle.await.unwrap();
    }
    let elapsed = start.elapsed();

    println!(
        "{} requests in {:?} ({:.0} req/s)",
        total_requests,
        elapsed,
        total_requests as f64 / elapsed.as_secs_f64()
    );

    // 4. Every inbound request maps to exactly one upstream call
    assert_eq!(successes, total_requests);
    assert_eq!(seen.count(), total_requests);

    shutdown.trigger();
}
