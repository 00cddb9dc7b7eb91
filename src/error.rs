//! Error types for prioritysort.

use thiserror::Error;

/// Error type for prioritysort operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A required argument was absent
    #[error("required input is missing: {0}")]
    NullInput(&'static str),

    /// An argument violated a precondition
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Unexpected failure while building or caching a template
    #[error("internal failure: {0}")]
    InternalFailure(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether the error was caused by the caller's input rather than by
    /// this crate or its environment.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Error::NullInput(_) | Error::InvalidArgument(_))
    }
}

/// Result type alias for prioritysort operations.
pub type Result<T> = std::result::Result<T, Error>;
