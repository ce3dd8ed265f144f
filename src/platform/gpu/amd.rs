use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::status::{bytes_to_gib, GpuDescriptor, GpuMetricStrategy, GpuVendor};
use crate::error::{ChatlineError, Result};
use crate::platform::probe::{self, PROBE_TIMEOUT};

use super::drm::{read_number, DrmTree};

static RADEONTOP_GPU: Lazy<Regex> = Lazy::new(|| Regex::new(r"gpu\s+(\d+\.\d+)%").unwrap());

/// AMD metrics from amdgpu sysfs counters, with radeontop as the usage fallback
pub struct AmdGpuStrategy {
    drm: DrmTree,
}

impl AmdGpuStrategy {
    pub fn new(drm: DrmTree) -> Self {
        Self { drm }
    }

    fn sysfs_usage(&self, gpu: &GpuDescriptor) -> Result<f64> {
        let card = gpu
            .device_handle
            .as_deref()
            .ok_or_else(|| ChatlineError::gpu_not_available("no DRM card"))?;
        self.drm.read_number(card, "gpu_busy_percent")
    }

    fn sysfs_temperature(&self, card: &str) -> Result<f64> {
        let sensor = self
            .drm
            .hwmon_file(card, "temp1_input")
            .ok_or_else(|| ChatlineError::gpu_not_available(format!("no hwmon sensor for {}", card)))?;
        Ok(read_number(&sensor)? / 1000.0)
    }

    fn sysfs_vram_gib(&self, gpu: &GpuDescriptor, name: &str) -> f64 {
        let Some(card) = gpu.device_handle.as_deref() else {
            return 0.0;
        };

        match self.drm.read_number(card, name) {
            Ok(bytes) => bytes_to_gib(bytes as u64),
            Err(e) => {
                log::debug!("VRAM error ({}): {}", name, e);
                0.0
            }
        }
    }
}

impl GpuMetricStrategy for AmdGpuStrategy {
    fn vendor(&self) -> GpuVendor {
        GpuVendor::Amd
    }

    fn usage_percent(&self, gpu: &GpuDescriptor) -> f64 {
        match self.sysfs_usage(gpu) {
            Ok(usage) => {
                log::debug!("AMD GPU usage (sysfs, {}): {}%", gpu, usage);
                return usage;
            }
            Err(e) => log::debug!("sysfs usage unavailable for {}: {}", gpu, e),
        }

        match radeontop_usage() {
            Ok(usage) => {
                log::debug!("AMD GPU usage (radeontop, bus {}): {}%", gpu.bus_id, usage);
                usage
            }
            Err(e) => {
                log::debug!("radeontop error: {}", e);
                0.0
            }
        }
    }

    fn temperature_celsius(&self, gpu: &GpuDescriptor) -> f64 {
        let Some(card) = gpu.device_handle.as_deref() else {
            return 0.0;
        };

        self.sysfs_temperature(card).unwrap_or_else(|e| {
            log::debug!("GPU temp error: {}", e);
            0.0
        })
    }

    fn vram_used_gib(&self, gpu: &GpuDescriptor) -> f64 {
        self.sysfs_vram_gib(gpu, "mem_info_vram_used")
    }

    fn vram_total_gib(&self, gpu: &GpuDescriptor) -> f64 {
        self.sysfs_vram_gib(gpu, "mem_info_vram_total")
    }
}

/// Sample usage once with radeontop, bounded by the probe timeout
fn radeontop_usage() -> Result<f64> {
    let output = probe::run("radeontop", &["-d", "-", "-l", "1"], &[], PROBE_TIMEOUT)?;

    if output.stderr.contains("Permission denied") || output.stderr.contains("root") {
        log::warn!(
            "radeontop needs access to the GPU. Run as root or add your user to the 'video' group"
        );
    }

    parse_radeontop(&output.stdout)
        .ok_or_else(|| ChatlineError::parse("no AMD GPU usage data from radeontop"))
}

/// Extract the `gpu NN.NN%` figure from a radeontop dump line
pub fn parse_radeontop(stdout: &str) -> Option<f64> {
    RADEONTOP_GPU
        .captures(stdout)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
