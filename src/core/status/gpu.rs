use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static AMD_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(amd|ati)\b").unwrap());
static NVIDIA_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bnvidia\b").unwrap());
static INTEL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bintel\b").unwrap());

/// GPU vendors we know how to classify
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GpuVendor {
    Amd,
    Nvidia,
    Intel,
}

impl GpuVendor {
    /// Classify a PCI device description by vendor keyword.
    ///
    /// Matches whole words only, so "Corporation" or "compatible" never read as ATI.
    pub fn classify(description: &str) -> Option<Self> {
        if AMD_PATTERN.is_match(description) {
            Some(GpuVendor::Amd)
        } else if NVIDIA_PATTERN.is_match(description) {
            Some(GpuVendor::Nvidia)
        } else if INTEL_PATTERN.is_match(description) {
            Some(GpuVendor::Intel)
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GpuVendor::Amd => "AMD",
            GpuVendor::Nvidia => "NVIDIA",
            GpuVendor::Intel => "Intel",
        }
    }
}

impl fmt::Display for GpuVendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A GPU found on the PCI bus. The bus address is the identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpuDescriptor {
    pub bus_id: String,
    pub vendor: GpuVendor,
    pub display_name: String,
    /// DRM card node (e.g. "card1"), when one could be mapped
    pub device_handle: Option<String>,
}

impl GpuDescriptor {
    pub fn has_device_node(&self) -> bool {
        self.device_handle.is_some()
    }
}

impl fmt::Display for GpuDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {} ({})",
            self.vendor,
            self.bus_id,
            self.device_handle.as_deref().unwrap_or("no card")
        )
    }
}

/// Vendor-specific way of reading runtime counters for one GPU.
///
/// Implementations never fail: any unreadable counter reports 0.0, and each
/// method is independent so one broken counter cannot hide another.
pub trait GpuMetricStrategy: Send + Sync {
    fn vendor(&self) -> GpuVendor;

    /// Current utilization in percent
    fn usage_percent(&self, gpu: &GpuDescriptor) -> f64;

    fn temperature_celsius(&self, _gpu: &GpuDescriptor) -> f64 {
        0.0
    }

    fn vram_used_gib(&self, _gpu: &GpuDescriptor) -> f64 {
        0.0
    }

    fn vram_total_gib(&self, _gpu: &GpuDescriptor) -> f64 {
        0.0
    }
}
