//! Errors reported by the CLI.

use std::{io, path::PathBuf};

use thiserror::Error;

use cadence::{CadenceError, semantic::ParseTagError};

/// Everything that can stop a CLI run.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse TOML in `{path}`: {message}")]
    Toml { path: PathBuf, message: String },

    #[error("Missing configuration file: {0}")]
    MissingConfig(PathBuf),

    #[error("Invalid argument: {0}")]
    Argument(#[from] ParseTagError),

    #[error("Failed to encode output: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Cadence(#[from] CadenceError),
}

impl CliError {
    pub(crate) fn toml(path: impl Into<PathBuf>, err: toml::de::Error) -> Self {
        Self::Toml {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
