//! Wire types for the gateway's `/metrics`, `/health` and `/register` endpoints.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body of `GET /metrics`.
///
/// The four headline fields are required; the rest are reported by newer
/// gateways and default to empty when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub rate_limited_requests: u64,
    pub average_latency_ms: f64,
    pub p95_latency_ms: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_errors: Option<u64>,
    /// Hits per request path
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub endpoint_hits: BTreeMap<String, u64>,
    /// Requests per API key
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub client_usage: BTreeMap<String, u64>,
}

impl MetricsSnapshot {
    /// Snapshot with only the headline fields set.
    pub fn new(
        total_requests: u64,
        rate_limited_requests: u64,
        average_latency_ms: f64,
        p95_latency_ms: f64,
    ) -> Self {
        Self {
            total_requests,
            rate_limited_requests,
            average_latency_ms,
            p95_latency_ms,
            success_count: None,
            server_errors: None,
            endpoint_hits: BTreeMap::new(),
            client_usage: BTreeMap::new(),
        }
    }
}

/// Status value the gateway reports when it is up.
pub const HEALTHY: &str = "healthy";

/// Body of `GET /health`.
///
/// Anything other than `status == "healthy"`, including a missing status,
/// counts as down.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redis_connected: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_api_keys: Option<u64>,
}

impl HealthStatus {
    /// Synthetic status used whenever the health check itself fails.
    pub fn down() -> Self {
        Self {
            status: Some("down".to_string()),
            ..Default::default()
        }
    }

    pub fn healthy() -> Self {
        Self {
            status: Some(HEALTHY.to_string()),
            ..Default::default()
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status.as_deref() == Some(HEALTHY)
    }
}

/// Body of `POST /register`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RegisterResponse {
    pub api_key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_metrics() {
        let body = r#"{"total_requests": 10, "rate_limited_requests": 0,
                       "average_latency_ms": 5, "p95_latency_ms": 12}"#;
        let snapshot: MetricsSnapshot = serde_json::from_str(body).unwrap();
        assert_eq!(snapshot, MetricsSnapshot::new(10, 0, 5.0, 12.0));
    }

    #[test]
    fn test_parse_full_gateway_metrics() {
        let body = r#"{
            "total_requests": 42,
            "rate_limited_requests": 3,
            "success_count": 37,
            "server_errors": 2,
            "average_latency_ms": 4.27,
            "p95_latency_ms": 11.9,
            "endpoint_hits": {"/": 30, "/metrics": 12},
            "client_usage": {"3f2a9c1e-77b0": 30}
        }"#;
        let snapshot: MetricsSnapshot = serde_json::from_str(body).unwrap();
        assert_eq!(snapshot.success_count, Some(37));
        assert_eq!(snapshot.server_errors, Some(2));
        assert_eq!(snapshot.endpoint_hits.get("/metrics"), Some(&12));
        assert_eq!(snapshot.client_usage.len(), 1);
    }

    #[test]
    fn test_metrics_missing_required_field_fails() {
        let body = r#"{"total_requests": 10}"#;
        assert!(serde_json::from_str::<MetricsSnapshot>(body).is_err());
    }

    #[test]
    fn test_metrics_negative_count_fails() {
        let body = r#"{"total_requests": -1, "rate_limited_requests": 0,
                       "average_latency_ms": 0, "p95_latency_ms": 0}"#;
        assert!(serde_json::from_str::<MetricsSnapshot>(body).is_err());
    }

    #[test]
    fn test_health_status_values() {
        let up: HealthStatus = serde_json::from_str(r#"{"status": "healthy"}"#).unwrap();
        assert!(up.is_healthy());

        let degraded: HealthStatus = serde_json::from_str(r#"{"status": "degraded"}"#).unwrap();
        assert!(!degraded.is_healthy());

        let missing: HealthStatus = serde_json::from_str("{}").unwrap();
        assert!(!missing.is_healthy());

        assert!(!HealthStatus::down().is_healthy());
        assert_eq!(HealthStatus::down().status.as_deref(), Some("down"));
    }

    #[test]
    fn test_health_extra_fields() {
        let body = r#"{"status": "healthy", "redis_connected": false, "active_api_keys": 4}"#;
        let health: HealthStatus = serde_json::from_str(body).unwrap();
        assert!(health.is_healthy());
        assert_eq!(health.redis_connected, Some(false));
        assert_eq!(health.active_api_keys, Some(4));
    }
}
