//! Error types for directory operations.
//!
//! The geospatial core never fails; these errors come from the layers that
//! turn untrusted input (query strings, submissions, settings) into the
//! well-typed values the core requires.

use thiserror::Error;

/// Error type for directory operations.
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// A search query could not be turned into a search region.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A listing submission failed validation.
    #[error("Invalid submission: {0}")]
    InvalidSubmission(String),

    /// A configuration value could not be parsed.
    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    /// JSON (de)serialization failed.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for directory operations.
pub type Result<T> = std::result::Result<T, DirectoryError>;
