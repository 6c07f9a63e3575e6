//! Configuration-related errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ConfigError {
    /// Rate limit window is not of the form `<n><s|m|h>`
    #[error("Invalid rate limit window '{value}': expected e.g. '30s', '1m' or '2h'")]
    InvalidWindow { value: String },

    /// A field holds a value outside its allowed domain
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// Config file could not be read or written
    #[error("Config I/O error at {path}: {message}")]
    Io { path: String, message: String },

    /// Config file is not valid JSON for the expected schema
    #[error("Failed to parse config: {message}")]
    Parse { message: String },

    /// No data directory could be determined
    #[error("Data directory unavailable: {message}")]
    DataDirUnavailable { message: String },
}
