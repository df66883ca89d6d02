//! Error types for gateway requests.

use thiserror::Error;

/// Message shown when the gateway rejects a request without saying why.
pub const DEFAULT_REJECTION: &str = "Invalid API key";

/// Errors from an authenticated gateway request.
///
/// `Display` is the text shown to the user, so `Unreachable` hides its
/// underlying reason; log it with `{:?}` or [`FetchError::reason`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The gateway answered with a non-success status
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// Connection failed, timed out, or the body could not be parsed
    #[error("Server not reachable")]
    Unreachable(String),
}

impl FetchError {
    /// Build a rejection from a status and the raw error body.
    ///
    /// Uses the body's `detail` string when there is one.
    pub fn rejected(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REJECTION.to_string());

        FetchError::Rejected { status, message }
    }

    /// True for a non-success response, as opposed to a transport problem.
    pub fn is_rejection(&self) -> bool {
        matches!(self, FetchError::Rejected { .. })
    }

    /// Underlying cause, for logs.
    pub fn reason(&self) -> &str {
        match self {
            FetchError::Rejected { message, .. } => message,
            FetchError::Unreachable(reason) => reason,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Unreachable(format!("request timed out: {}", e))
        } else {
            FetchError::Unreachable(e.to_string())
        }
    }
}
