//! Errors raised at the I/O edge of the crate.
//!
//! The comparison core never fails; only loading documents and rule
//! configuration files can.

use std::path::PathBuf;
use thiserror::Error;

/// LoadError represents a failure to read or parse an input.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {location}: {message}")]
    InvalidYaml { location: String, message: String },

    #[error("invalid JSON in {location}: {message}")]
    InvalidJson { location: String, message: String },

    #[error("invalid breaking rules configuration: {message}")]
    InvalidRules { message: String },
}

impl LoadError {
    /// Creates an I/O error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a YAML parse error.
    pub fn invalid_yaml(location: impl Into<String>, message: impl Into<String>) -> Self {
        LoadError::InvalidYaml {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Creates a JSON parse error.
    pub fn invalid_json(location: impl Into<String>, message: impl Into<String>) -> Self {
        LoadError::InvalidJson {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Creates a rules configuration error.
    pub fn invalid_rules(message: impl Into<String>) -> Self {
        LoadError::InvalidRules {
            message: message.into(),
        }
    }
}
