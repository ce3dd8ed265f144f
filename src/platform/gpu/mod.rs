//! GPU-specific platform code.
//!
//! Enumerates GPUs from the PCI bus and the DRM sysfs tree, and provides the
//! per-vendor metric strategies. Only AMD reads real counters; NVIDIA and
//! Intel are detected but report 0.0.

mod amd;
pub mod display;
pub mod drm;
mod intel;
mod nvidia;
pub mod pci;

pub use amd::{parse_radeontop, AmdGpuStrategy};
pub use drm::DrmTree;
pub use intel::IntelGpuStrategy;
pub use nvidia::NvidiaGpuStrategy;

use std::sync::Arc;

use crate::core::status::{
    GpuDescriptor, GpuMetricStrategy, GpuMonitor, GpuProbes, GpuVendor, OffloadPreference,
};

/// Metric strategy for a vendor
pub fn strategy_for(vendor: GpuVendor, drm: &DrmTree) -> Box<dyn GpuMetricStrategy> {
    match vendor {
        GpuVendor::Amd => Box::new(AmdGpuStrategy::new(drm.clone())),
        GpuVendor::Nvidia => Box::new(NvidiaGpuStrategy),
        GpuVendor::Intel => Box::new(IntelGpuStrategy),
    }
}

/// Probes backed by the live system: lspci, xrandr, glxinfo and sysfs
#[derive(Debug, Clone, Default)]
pub struct SystemGpuProbes {
    drm: DrmTree,
}

impl SystemGpuProbes {
    pub fn new(drm: DrmTree) -> Self {
        Self { drm }
    }

    pub fn drm(&self) -> &DrmTree {
        &self.drm
    }

    /// Pair a resolved GPU with its vendor strategy
    pub fn monitor_for(&self, gpu: Arc<GpuDescriptor>) -> GpuMonitor {
        let strategy = strategy_for(gpu.vendor, &self.drm);
        GpuMonitor::new(gpu, strategy)
    }
}

impl GpuProbes for SystemGpuProbes {
    fn enumerate(&self) -> Vec<GpuDescriptor> {
        pci::enumerate(&self.drm)
    }

    fn primary_display_bus_id(&self) -> Option<String> {
        display::primary_display_bus_id(&self.drm)
    }

    fn renderer(&self, offload: OffloadPreference) -> Option<String> {
        display::renderer(offload)
    }

    fn usage(&self, gpu: &GpuDescriptor) -> f64 {
        strategy_for(gpu.vendor, &self.drm).usage_percent(gpu)
    }
}
