//! Error types for the session gate.

use thiserror::Error;

/// Errors raised when starting a session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The submitted key was empty or whitespace only
    #[error("API key is required")]
    EmptyCredential,
}
