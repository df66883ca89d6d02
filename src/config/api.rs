//! Gateway API connection settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Where the gateway lives and how long to wait for it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the gateway, without a trailing path (e.g. `http://localhost:8000`)
    pub base_url: String,
    /// Per-request timeout applied to every call
    pub timeout_seconds: u64,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_seconds: 5,
        }
    }
}
