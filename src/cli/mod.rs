//! CLI module for gatewatch
//!
//! Command-line interface definitions and handlers for the gateway dashboard.
//!
//! # Commands
//!
//! - `watch` - Interactive dashboard: enter an API key, watch metrics live
//! - `snapshot` - Fetch metrics and health once and print the dashboard
//! - `register` - Ask the gateway for a new API key
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Watch the local gateway
//! gatewatch watch
//!
//! # One-off JSON dump for scripts
//! gatewatch snapshot --api-key "$KEY" --json
//!
//! # Generate shell completions
//! gatewatch completions bash > ~/.bash_completion.d/gatewatch
//! ```

pub mod completions;
pub mod config;
pub mod register;
pub mod snapshot;
pub mod watch;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::client::ApiClient;
use crate::config::GatewatchConfig;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// gatewatch - API gateway dashboard
#[derive(Parser, Debug)]
#[command(
    name = "gatewatch",
    version,
    about = "Terminal dashboard for a rate-limited API gateway"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch live metrics and health
    Watch(WatchArgs),
    /// Fetch metrics and health once and print them
    Snapshot(SnapshotArgs),
    /// Register a new API key with the gateway
    Register(RegisterArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Options shared by every command that talks to the gateway
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "gatewatch.toml")]
    pub config: PathBuf,

    /// Override gateway base URL
    #[arg(short, long, env = "GATEWATCH_URL")]
    pub url: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "GATEWATCH_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Connect with this key at startup instead of prompting
    #[arg(short = 'k', long, env = "GATEWATCH_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Override poll interval in milliseconds
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Append each frame instead of clearing the screen
    #[arg(long)]
    pub no_clear: bool,
}

#[derive(Args, Debug)]
pub struct SnapshotArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// API key sent as x-api-key
    #[arg(short = 'k', long, env = "GATEWATCH_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "gatewatch.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Load configuration with CLI overrides
///
/// A missing config file falls back to defaults; a present but broken one is
/// an error.
pub fn load_config_with_overrides(
    args: &ConnectionArgs,
) -> Result<GatewatchConfig, Box<dyn std::error::Error>> {
    let mut config = if args.config.exists() {
        GatewatchConfig::load(Some(&args.config))?
    } else {
        tracing::debug!("Config file not found, using defaults");
        GatewatchConfig::default()
    };

    config = config.with_env_overrides();

    if let Some(ref url) = args.url {
        config.api.base_url = url.clone();
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }

    Ok(config)
}

/// Validate the merged configuration, install logging and build the client.
///
/// Called once per process by every command that talks to the gateway.
pub fn start_client(config: &GatewatchConfig) -> Result<ApiClient, Box<dyn std::error::Error>> {
    config.validate()?;
    crate::logging::init_tracing(&config.logging)?;
    tracing::debug!(?config, "Loaded configuration");

    Ok(ApiClient::new(&config.api)?)
}
