use std::io;
use thiserror::Error;

/// Custom error type for chatline
#[derive(Error, Debug)]
pub enum ChatlineError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Probe unavailable: {0}")]
    ProbeUnavailable(String),

    #[error("Probe timed out: {0}")]
    ProbeTimeout(String),

    #[error("Probe failed: {0}")]
    ProbeFailed(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("GPU not available: {0}")]
    GpuNotAvailable(String),

    #[error("OSC error: {0}")]
    Osc(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for chatline
pub type Result<T> = std::result::Result<T, ChatlineError>;

impl ChatlineError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        ChatlineError::Config(msg.into())
    }

    pub fn probe_unavailable<S: Into<String>>(msg: S) -> Self {
        ChatlineError::ProbeUnavailable(msg.into())
    }

    pub fn probe_timeout<S: Into<String>>(msg: S) -> Self {
        ChatlineError::ProbeTimeout(msg.into())
    }

    pub fn probe_failed<S: Into<String>>(msg: S) -> Self {
        ChatlineError::ProbeFailed(msg.into())
    }

    /// Create a parse error (probe output did not match the expected grammar)
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        ChatlineError::Parse(msg.into())
    }

    pub fn gpu_not_available<S: Into<String>>(msg: S) -> Self {
        ChatlineError::GpuNotAvailable(msg.into())
    }

    pub fn osc<S: Into<String>>(msg: S) -> Self {
        ChatlineError::Osc(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        ChatlineError::Other(msg.into())
    }
}
