// Command handlers module
pub mod completions;
pub mod config;
pub mod gpu;
pub mod preview;
pub mod run;
pub mod version;

// Re-exports for cleaner imports
pub use gpu::execute as gpu;
pub use preview::execute as preview;
pub use run::execute as run;
pub use version::execute as version;
