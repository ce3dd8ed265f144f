use crate::core::status::{GpuDescriptor, GpuMetricStrategy, GpuVendor};

/// Intel GPU usage is not implemented; every counter reads 0.0.
pub struct IntelGpuStrategy;

impl GpuMetricStrategy for IntelGpuStrategy {
    fn vendor(&self) -> GpuVendor {
        GpuVendor::Intel
    }

    fn usage_percent(&self, gpu: &GpuDescriptor) -> f64 {
        log::debug!("Intel GPU usage not implemented ({})", gpu.bus_id);
        0.0
    }
}
