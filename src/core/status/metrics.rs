use serde::{Deserialize, Serialize};

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// One tick's worth of readings. `None` means the field was not collected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub cpu_usage: Option<f64>,
    pub cpu_temp: Option<f64>,
    pub gpu_usage: Option<f64>,
    pub gpu_temp: Option<f64>,
    pub ram_used: Option<f64>,
    pub ram_total: Option<f64>,
    pub vram_used: Option<f64>,
    pub vram_total: Option<f64>,
}

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Bytes to gibibytes, rounded to one decimal
pub fn bytes_to_gib(bytes: u64) -> f64 {
    round1(bytes as f64 / BYTES_PER_GIB)
}
