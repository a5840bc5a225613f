//! Error types for vultr-nocloud

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for vultr-nocloud operations
///
/// Every variant is fatal: the binary logs it and exits non-zero.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Error getting interface {name}: {message}")]
    Interface { name: String, message: String },

    #[error("Command execution failed: {0}")]
    Command(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Invalid response from metadata service ({status}): {body}")]
    MetadataStatus { status: u16, body: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Timeout waiting for {0}")]
    Timeout(String),

    #[error("Error writing {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Interrupted by signal")]
    Interrupted,
}

impl BridgeError {
    /// Create an interface error
    pub fn interface(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Interface {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a write error for the given path
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for BridgeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(format!("metadata service: {}", err))
        } else {
            Self::Http(err.to_string())
        }
    }
}
