//! Shared test utilities for gatewatch integration tests.
//!
//! Mock gateway endpoints, client construction and view waiting helpers.

#![allow(dead_code)]

use gatewatch::client::{ApiClient, API_KEY_HEADER};
use gatewatch::config::ApiConfig;
use gatewatch::view::View;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::watch;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Well-Known Test Constants
// =============================================================================

pub const VALID_KEY: &str = "3f2a9c1e-77b0-4c55-9d3e-5a1b2c3d4e5f";

/// Upper bound for anything that should happen within a few poll ticks
pub const WAIT_LIMIT: Duration = Duration::from_secs(5);

// =============================================================================
// Gateway Bodies
// =============================================================================

/// `/metrics` body with only the headline fields
pub fn metrics_body(total: u64, rate_limited: u64, avg_ms: f64, p95_ms: f64) -> Value {
    json!({
        "total_requests": total,
        "rate_limited_requests": rate_limited,
        "average_latency_ms": avg_ms,
        "p95_latency_ms": p95_ms,
    })
}

pub fn healthy_body() -> Value {
    json!({ "status": "healthy", "redis_connected": true, "active_api_keys": 1 })
}

// =============================================================================
// Mock Gateway
// =============================================================================

/// Mount `/metrics` answering `body` for `VALID_KEY` and 401 for anything else,
/// plus a healthy `/health`.
pub async fn mount_gateway(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path("/metrics"))
        .and(header(API_KEY_HEADER, VALID_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .with_priority(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/metrics"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid API key"})))
        .with_priority(2)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(healthy_body()))
        .mount(server)
        .await;
}

/// Number of `/metrics` requests the server has seen so far
pub async fn metrics_requests(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == "/metrics")
        .count()
}

// =============================================================================
// Clients
// =============================================================================

pub fn client_for(base_url: &str) -> ApiClient {
    ApiClient::new(&ApiConfig {
        base_url: base_url.to_string(),
        timeout_seconds: 2,
    })
    .unwrap()
}

/// A local address with nothing listening on it
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

// =============================================================================
// Views
// =============================================================================

/// Wait until the published view satisfies `pred`, returning it.
pub async fn wait_for_view(
    views: &mut watch::Receiver<View>,
    pred: impl Fn(&View) -> bool,
) -> View {
    let wait = async {
        loop {
            {
                let view = views.borrow_and_update();
                if pred(&view) {
                    return view.clone();
                }
            }
            views.changed().await.expect("scheduler dropped");
        }
    };
    tokio::time::timeout(WAIT_LIMIT, wait)
        .await
        .expect("view never reached the expected state")
}
