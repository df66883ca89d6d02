//! Session gate: the API key and the connected/disconnected switch.
//!
//! The gate never talks to the network. Submitting a key only flips the
//! state to connected; the first poll is what proves the key works.

mod error;

pub use error::SessionError;

use serde::Serialize;
use std::fmt;

/// Opaque API key. Never empty once constructed.
///
/// `Debug` is redacted so a credential cannot leak through `{:?}` in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Trim `candidate` and reject it if nothing is left.
    pub fn parse(candidate: &str) -> Result<Self, SessionError> {
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            return Err(SessionError::EmptyCredential);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn redacted(&self) -> String {
        crate::logging::redact_key(&self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&self.redacted()).finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
}

/// Key and generation a poll loop runs under.
///
/// Responses carry the generation back so the session context can tell a
/// current response from one that belongs to an earlier session.
#[derive(Debug, Clone)]
pub struct ActiveSession {
    pub generation: u64,
    pub credential: Credential,
}

/// Holds the credential and connection state; gates all polling.
#[derive(Debug, Default)]
pub struct SessionGate {
    credential: Option<Credential>,
    state: ConnectionState,
    generation: u64,
}

impl SessionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt `candidate` as the credential and connect.
    ///
    /// Blank input fails with [`SessionError::EmptyCredential`] and leaves the
    /// gate untouched.
    pub fn submit(&mut self, candidate: &str) -> Result<ActiveSession, SessionError> {
        let credential = Credential::parse(candidate)?;
        self.generation += 1;
        self.state = ConnectionState::Connected;
        self.credential = Some(credential.clone());
        Ok(ActiveSession {
            generation: self.generation,
            credential,
        })
    }

    /// Return to the created-state defaults. Always succeeds.
    pub fn logout(&mut self) {
        self.generation += 1;
        self.state = ConnectionState::Disconnected;
        self.credential = None;
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True when a response tagged with `generation` may still mutate state.
    pub fn is_current(&self, generation: u64) -> bool {
        self.is_connected() && self.generation == generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_gate_is_disconnected() {
        let gate = SessionGate::new();
        assert_eq!(gate.state(), ConnectionState::Disconnected);
        assert!(gate.credential().is_none());
        assert_eq!(gate.generation(), 0);
    }

    #[test]
    fn test_submit_connects_and_trims() {
        let mut gate = SessionGate::new();
        let session = gate.submit("  abc \n").unwrap();

        assert!(gate.is_connected());
        assert_eq!(session.credential.expose(), "abc");
        assert_eq!(gate.credential().unwrap().expose(), "abc");
        assert!(gate.is_current(session.generation));
    }

    #[test]
    fn test_submit_blank_rejected() {
        let mut gate = SessionGate::new();
        for candidate in ["", "   ", "\t\n"] {
            let result = gate.submit(candidate);
            assert!(matches!(result, Err(SessionError::EmptyCredential)));
            assert_eq!(gate.state(), ConnectionState::Disconnected);
            assert!(gate.credential().is_none());
        }
        assert_eq!(gate.generation(), 0);
    }

    #[test]
    fn test_logout_resets_and_invalidates_generation() {
        let mut gate = SessionGate::new();
        let session = gate.submit("abc").unwrap();

        gate.logout();

        assert_eq!(gate.state(), ConnectionState::Disconnected);
        assert!(gate.credential().is_none());
        assert!(!gate.is_current(session.generation));
    }

    #[test]
    fn test_resubmit_invalidates_previous_session() {
        let mut gate = SessionGate::new();
        let first = gate.submit("first-key").unwrap();
        let second = gate.submit("second-key").unwrap();

        assert!(!gate.is_current(first.generation));
        assert!(gate.is_current(second.generation));
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = Credential::parse("3f2a9c1e-77b0-4c55").unwrap();
        let debug = format!("{:?}", credential);
        assert!(debug.contains("3f2a****"));
        assert!(!debug.contains("77b0"));
    }
}
