//! Session context shared between the scheduler and its in-flight fetches.

use chrono::{DateTime, Local};

use crate::client::{FetchError, HealthStatus, MetricsSnapshot};
use crate::config::AuthFailurePolicy;
use crate::history::{HistoryBuffer, HistorySample};
use crate::session::{ActiveSession, SessionError, SessionGate};

/// Everything the dashboard shows, plus the gate that decides whether a
/// response may still change it.
///
/// Every mutation from a fetch goes through [`apply_metrics`](Self::apply_metrics)
/// or [`apply_health`](Self::apply_health), which drop responses from a
/// session that has since ended.
#[derive(Debug, Default)]
pub struct DashboardState {
    gate: SessionGate,
    metrics: Option<MetricsSnapshot>,
    health: Option<HealthStatus>,
    error: Option<String>,
    history: HistoryBuffer,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session with `candidate`.
    ///
    /// On blank input the state stays disconnected and the error message is
    /// set. Otherwise all session-scoped data is reset.
    pub fn connect(&mut self, candidate: &str) -> Result<ActiveSession, SessionError> {
        match self.gate.submit(candidate) {
            Ok(session) => {
                self.reset_session_data();
                Ok(session)
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// End the session and drop everything it accumulated.
    pub fn logout(&mut self) {
        self.gate.logout();
        self.reset_session_data();
    }

    fn reset_session_data(&mut self) {
        self.metrics = None;
        self.health = None;
        self.error = None;
        self.history.clear();
    }

    /// Apply a metrics result from the session tagged `generation`.
    ///
    /// Returns false (and changes nothing) if that session is no longer
    /// current. A success replaces the snapshot, clears the error and appends
    /// one history sample; a failure only replaces the error.
    pub fn apply_metrics(
        &mut self,
        generation: u64,
        result: Result<MetricsSnapshot, FetchError>,
        captured_at: DateTime<Local>,
        policy: AuthFailurePolicy,
    ) -> bool {
        if !self.gate.is_current(generation) {
            return false;
        }

        match result {
            Ok(snapshot) => {
                self.history
                    .append(HistorySample::capture(&snapshot, &captured_at));
                self.metrics = Some(snapshot);
                self.error = None;
            }
            Err(e) => {
                let message = e.to_string();
                if e.is_rejection() && policy == AuthFailurePolicy::Disconnect {
                    self.logout();
                }
                self.error = Some(message);
            }
        }
        true
    }

    /// Apply a health result from the session tagged `generation`.
    ///
    /// Returns false if that session is no longer current. Never touches the
    /// error message.
    pub fn apply_health(&mut self, generation: u64, health: HealthStatus) -> bool {
        if !self.gate.is_current(generation) {
            return false;
        }
        self.health = Some(health);
        true
    }

    pub fn gate(&self) -> &SessionGate {
        &self.gate
    }

    pub fn is_connected(&self) -> bool {
        self.gate.is_connected()
    }

    pub fn metrics(&self) -> Option<&MetricsSnapshot> {
        self.metrics.as_ref()
    }

    pub fn health(&self) -> Option<&HealthStatus> {
        self.health.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }
}
