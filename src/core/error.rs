use std::time::Duration;

use thiserror::Error;

/// Errors produced by the relay pipeline.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("invalid writer state: {0}")]
    InvalidState(String),

    #[error(
        "send interval out of range: {}s is below the {}s minimum",
        actual.as_secs(),
        minimum.as_secs()
    )]
    IntervalOutOfRange { actual: Duration, minimum: Duration },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for relay operations
pub type Result<T> = std::result::Result<T, RelayError>;

impl RelayError {
    /// Creates a new invalid-state error
    pub fn invalid_state<S: Into<String>>(msg: S) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Creates a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a new transport error
    pub fn transport<S: Into<String>>(msg: S) -> Self {
        Self::Transport(msg.into())
    }

    /// Returns true if this error is recoverable
    ///
    /// Transmission failures are recoverable in the sense that the next
    /// scheduled publish cycle carries independent data; state and
    /// configuration errors are not.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Http(_) => true,
            Self::Io(_) => true,
            _ => false,
        }
    }

    /// Returns the error category for metrics/logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidState(_) => "state",
            Self::IntervalOutOfRange { .. } => "config",
            Self::Config(_) => "config",
            Self::Transport(_) | Self::Http(_) => "transport",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
        }
    }
}
