//! Render derivation: the dashboard state as one of three views.
//!
//! [`derive_view`] is total and side-effect free, so it can be recomputed on
//! every state change and tested without any network timing involved.
//! [`render`] turns a view into terminal text.

pub mod render;

pub use render::{render, render_json, sparkline};

use serde::Serialize;

use crate::client::{HealthStatus, MetricsSnapshot};
use crate::history::ChartSeries;
use crate::logging::redact_key;
use crate::poller::DashboardState;

/// What the front end should show
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View {
    /// Disconnected: key prompt plus the last error, if any
    Login { error: Option<String> },
    /// Connected, waiting for the first successful metrics poll
    Loading {
        error: Option<String>,
        health: HealthIndicator,
    },
    /// Connected with a snapshot
    Dashboard(DashboardView),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub cards: Vec<Card>,
    pub chart: ChartSeries,
    pub health: HealthIndicator,
    /// Last metrics error; the cards keep showing the previous snapshot
    pub error: Option<String>,
    pub breakdown: TrafficBreakdown,
}

/// One headline number
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub title: &'static str,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
    /// Highlight the card (rate limiting is happening)
    pub alert: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthIndicator {
    Healthy,
    Down,
}

impl HealthIndicator {
    /// Anything short of an explicit "healthy" is down, including no answer yet.
    pub fn from_status(health: Option<&HealthStatus>) -> Self {
        match health {
            Some(h) if h.is_healthy() => HealthIndicator::Healthy,
            _ => HealthIndicator::Down,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HealthIndicator::Healthy => "● Healthy",
            HealthIndicator::Down => "● Down",
        }
    }
}

/// Named counter in a breakdown table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub label: String,
    pub count: u64,
}

/// Secondary gateway figures, shown when the gateway reports them
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TrafficBreakdown {
    pub success_count: Option<u64>,
    pub server_errors: Option<u64>,
    pub redis_connected: Option<bool>,
    pub active_api_keys: Option<u64>,
    /// Busiest first
    pub endpoint_hits: Vec<Tally>,
    /// Busiest first, keys redacted
    pub client_usage: Vec<Tally>,
}

impl TrafficBreakdown {
    pub fn is_empty(&self) -> bool {
        self.success_count.is_none()
            && self.server_errors.is_none()
            && self.redis_connected.is_none()
            && self.active_api_keys.is_none()
            && self.endpoint_hits.is_empty()
            && self.client_usage.is_empty()
    }
}

/// Map the current state to a view.
pub fn derive_view(state: &DashboardState) -> View {
    if !state.is_connected() {
        return View::Login {
            error: state.error().map(str::to_string),
        };
    }

    let health = HealthIndicator::from_status(state.health());
    let error = state.error().map(str::to_string);

    match state.metrics() {
        None => View::Loading { error, health },
        Some(metrics) => View::Dashboard(DashboardView {
            cards: cards(metrics),
            chart: state.history().to_chart_series(),
            health,
            error,
            breakdown: breakdown(metrics, state.health()),
        }),
    }
}

fn cards(metrics: &MetricsSnapshot) -> Vec<Card> {
    vec![
        Card {
            title: "Total Requests",
            value: metrics.total_requests.to_string(),
            unit: None,
            alert: false,
        },
        Card {
            title: "Rate Limited",
            value: metrics.rate_limited_requests.to_string(),
            unit: None,
            alert: metrics.rate_limited_requests > 0,
        },
        Card {
            title: "Average Latency",
            value: metrics.average_latency_ms.to_string(),
            unit: Some("ms"),
            alert: false,
        },
        Card {
            title: "P95 Latency",
            value: metrics.p95_latency_ms.to_string(),
            unit: Some("ms"),
            alert: false,
        },
    ]
}

fn breakdown(metrics: &MetricsSnapshot, health: Option<&HealthStatus>) -> TrafficBreakdown {
    let mut endpoint_hits: Vec<Tally> = metrics
        .endpoint_hits
        .iter()
        .map(|(path, count)| Tally {
            label: path.clone(),
            count: *count,
        })
        .collect();
    endpoint_hits.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));

    let mut client_usage: Vec<Tally> = metrics
        .client_usage
        .iter()
        .map(|(key, count)| Tally {
            label: redact_key(key),
            count: *count,
        })
        .collect();
    client_usage.sort_by(|a, b| b.count.cmp(&a.count));

    TrafficBreakdown {
        success_count: metrics.success_count,
        server_errors: metrics.server_errors,
        redis_connected: health.and_then(|h| h.redis_connected),
        active_api_keys: health.and_then(|h| h.active_api_keys),
        endpoint_hits,
        client_usage,
    }
}
