// Core business logic module

pub mod config;
pub mod status;

// Re-export commonly used items
pub use config::DisplayConfig;
pub use status::{compose, resolve_primary, Broadcaster, MetricsSnapshot, PrimaryGpuCache, SharedState};
