//! Poll scheduler settings

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// What the scheduler does when `/metrics` rejects the API key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthFailurePolicy {
    /// Show the error and keep polling with the same key
    #[default]
    KeepPolling,
    /// Drop back to the login view and stop polling
    Disconnect,
}

impl FromStr for AuthFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keep_polling" | "keep-polling" => Ok(AuthFailurePolicy::KeepPolling),
            "disconnect" => Ok(AuthFailurePolicy::Disconnect),
            _ => Err(format!("Invalid auth failure policy: {}", s)),
        }
    }
}

/// Poll scheduler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Delay between two ticks; each tick fetches metrics and health
    pub interval_ms: u64,
    pub on_auth_failure: AuthFailurePolicy,
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2000,
            on_auth_failure: AuthFailurePolicy::KeepPolling,
        }
    }
}
