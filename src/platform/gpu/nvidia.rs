use crate::core::status::{GpuDescriptor, GpuMetricStrategy, GpuVendor};

/// NVIDIA GPUs are detected and selectable, but no counters are read yet:
/// usage reports 0.0 and temperature/VRAM keep the trait defaults.
pub struct NvidiaGpuStrategy;

impl GpuMetricStrategy for NvidiaGpuStrategy {
    fn vendor(&self) -> GpuVendor {
        GpuVendor::Nvidia
    }

    fn usage_percent(&self, gpu: &GpuDescriptor) -> f64 {
        log::debug!("NVIDIA usage not supported ({})", gpu.bus_id);
        0.0
    }
}
