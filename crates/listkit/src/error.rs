//! Error types for the listkit crate.
//!
//! Querying never fails. Errors only come from the edges where data enters
//! the crate: configuration files and date strings handed to builders.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading configuration or parsing input values.
#[derive(Debug, Error)]
pub enum ListError {
    /// A date string could not be read as ISO-8601.
    #[error("invalid timestamp: '{0}'")]
    InvalidTimestamp(String),

    /// Reading a configuration file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// YAML configuration could not be parsed.
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON configuration could not be parsed.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file extension is not one we read.
    #[error("unsupported config format for {0} (expected .yaml, .yml or .json)")]
    UnsupportedFormat(PathBuf),

    /// No list with this name exists in the catalog.
    #[error("unknown list '{0}'")]
    UnknownList(String),

    /// The configuration parsed but is not usable.
    #[error("invalid list configuration '{list}': {reason}")]
    InvalidConfig { list: String, reason: String },
}

/// Result type for listkit operations.
pub type Result<T> = std::result::Result<T, ListError>;
