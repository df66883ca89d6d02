//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors loading or validating `gatewatch.toml`
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file {} does not exist (run `gatewatch config init`)", .0.display())]
    NotFound(PathBuf),

    #[error("{}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },
}
