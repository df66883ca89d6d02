//! gatewatch - terminal dashboard for a rate-limited API gateway
//!
//! This library provides the session gate, the poll scheduler that fetches
//! `/metrics` and `/health` while connected, the rolling request history and
//! the view derivation the CLI renders.

pub mod cli;
pub mod client;
pub mod config;
pub mod history;
pub mod logging;
pub mod poller;
pub mod session;
pub mod view;
