// chatline library - public API

// Re-export error types
pub mod error;
pub use error::{ChatlineError, Result};

// Module declarations
pub mod commands;
pub mod core;
pub mod platform;

// Re-export commonly used types
pub use crate::core::config::DisplayConfig;

// Initialize logging
pub fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}
