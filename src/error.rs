//! Error types for configuration operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, saving, or mutating the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file (or its directory) not found at the expected path.
    ///
    /// Recovered internally by [`ConfigStore::open`](crate::ConfigStore::open):
    /// a missing file triggers default construction and, when a legacy source
    /// is present, one-time migration. Callers only see this variant from the
    /// lower-level [`file_store::load`](crate::file_store::load).
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    /// Failed to read the config file.
    #[error("Failed to read configuration file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File exists but is not valid JSON or not the expected document shape.
    ///
    /// Never recovered automatically: a malformed file is surfaced to the
    /// caller of `open` rather than silently overwritten.
    #[error("Failed to parse configuration file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to serialize the configuration document.
    #[error("Failed to serialize configuration: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// Failed to write the config file (permissions, disk full, uncreatable
    /// directory). Raised synchronously from the setter that triggered it.
    #[error("Failed to write configuration file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to resolve a caller-supplied relative path against the current
    /// working directory.
    #[error("Failed to resolve path '{path}': {source}")]
    PathResolution {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No platform data directory could be determined and no explicit path or
    /// environment override was given.
    #[error("Could not determine a platform data directory for the configuration file")]
    NoDataDir,
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
