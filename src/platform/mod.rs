// Platform-specific code module

pub mod gpu;
pub mod media;
pub mod osc;
pub mod probe;

// Re-exports for cleaner imports
pub use gpu::{strategy_for, DrmTree, SystemGpuProbes};
pub use media::now_playing;
pub use osc::OscClient;
pub use probe::{ProbeOutput, PROBE_TIMEOUT};
