//! Error types for axescan

use thiserror::Error;

/// Result type alias using the axescan Error
pub type Result<T> = std::result::Result<T, Error>;

/// axescan error types
#[derive(Error, Debug)]
pub enum Error {
    /// A required value was not supplied (an empty list where at least one entry is needed)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A supplied list contained an empty string
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// Legacy raw options and structured options were mixed
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// The engine response did not have a recognizable shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Frame switch, element lookup or script execution failed in the automation layer
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Engine script timed out after {millis}ms")]
    Timeout { millis: u64 },

    #[error("Download error: {0}")]
    Download(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Failures raised by the automation transport, including the engine call timing out.
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Timeout { .. })
    }
}

/// Validate a list argument handed to a configuration mutator.
///
/// An empty list is treated as a missing argument; an empty entry is an invalid value.
pub(crate) fn validate_values(name: &str, values: &[String]) -> Result<()> {
    if values.is_empty() {
        return Err(Error::InvalidArgument(format!(
            "{} requires at least one value",
            name
        )));
    }

    if values.iter().any(|v| v.is_empty()) {
        return Err(Error::InvalidValue(format!(
            "{} contains an empty value",
            name
        )));
    }

    Ok(())
}
