use std::fmt;

use crate::error::Result;

/// Where composed messages are sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Outbound transport for status messages.
///
/// Implementations are provided in the platform layer (OSC over UDP).
pub trait MessageSink: Send + Sync {
    fn send(&self, endpoint: &Endpoint, text: &str) -> Result<()>;
}
