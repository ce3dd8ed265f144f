//! Primary GPU selection.
//!
//! Several unreliable hardware probes are consulted in a fixed priority order.
//! Each heuristic only proposes a candidate; display and rendering affinity must
//! additionally be confirmed by a nonzero usage reading before they win.

use parking_lot::Mutex;
use std::sync::Arc;

use super::gpu::{GpuDescriptor, GpuVendor};

/// Bus address used as a last resort before falling back to the first GPU
pub const FALLBACK_BUS_ID: &str = "28:00.0";

/// Source of the hardware facts the resolver reasons about.
///
/// Every method degrades instead of failing: a missing tool or unparseable
/// output simply yields nothing (or 0.0 usage).
pub trait GpuProbes {
    /// Candidate GPUs in enumeration order
    fn enumerate(&self) -> Vec<GpuDescriptor>;

    /// Bus address of the GPU driving the primary display output
    fn primary_display_bus_id(&self) -> Option<String>;

    /// Lowercased OpenGL renderer string for the given offload preference
    fn renderer(&self, offload: OffloadPreference) -> Option<String>;

    /// Current utilization of a GPU in percent
    fn usage(&self, gpu: &GpuDescriptor) -> f64;
}

/// PRIME render offload selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffloadPreference {
    Discrete,
    Integrated,
}

impl OffloadPreference {
    /// Order in which rendering affinity queries the offload selector
    pub const ORDER: [OffloadPreference; 2] =
        [OffloadPreference::Discrete, OffloadPreference::Integrated];

    /// Value for the `DRI_PRIME` environment variable
    pub fn dri_prime(&self) -> &'static str {
        match self {
            OffloadPreference::Discrete => "1",
            OffloadPreference::Integrated => "0",
        }
    }
}

/// Cached primary GPU, owned by whoever drives resolution.
#[derive(Debug, Default)]
pub struct PrimaryGpuCache {
    slot: Mutex<Option<Arc<GpuDescriptor>>>,
}

impl PrimaryGpuCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Arc<GpuDescriptor>> {
        self.slot.lock().clone()
    }

    /// Forget the cached choice so the next resolution re-runs every heuristic
    pub fn invalidate(&self) {
        *self.slot.lock() = None;
    }

    /// Store `gpu` unless another resolution got there first; returns the cached value
    fn fill(&self, gpu: GpuDescriptor) -> Arc<GpuDescriptor> {
        let mut slot = self.slot.lock();
        slot.get_or_insert_with(|| Arc::new(gpu)).clone()
    }
}

type Selector = fn(&dyn GpuProbes, &[GpuDescriptor]) -> Option<GpuDescriptor>;

struct Heuristic {
    name: &'static str,
    select: Selector,
    /// Require a device node and nonzero usage before accepting the candidate
    confirm_usage: bool,
}

const HEURISTICS: &[Heuristic] = &[
    Heuristic {
        name: "display",
        select: display_affinity,
        confirm_usage: true,
    },
    Heuristic {
        name: "rendering",
        select: rendering_affinity,
        confirm_usage: true,
    },
    Heuristic {
        name: "first-usage",
        select: first_with_usage,
        confirm_usage: false,
    },
    Heuristic {
        name: "fallback-bus",
        select: fallback_bus,
        confirm_usage: false,
    },
    Heuristic {
        name: "first",
        select: first_candidate,
        confirm_usage: false,
    },
];

/// Resolve the primary GPU, reusing the cached choice when present.
///
/// Returns `None` only when enumeration finds no candidates; that outcome is not cached.
pub fn resolve_primary(
    probes: &dyn GpuProbes,
    cache: &PrimaryGpuCache,
) -> Option<Arc<GpuDescriptor>> {
    if let Some(gpu) = cache.get() {
        return Some(gpu);
    }

    let candidates = probes.enumerate();
    if candidates.is_empty() {
        log::warn!("No GPUs detected");
        return None;
    }

    for heuristic in HEURISTICS {
        let Some(gpu) = (heuristic.select)(probes, &candidates) else {
            log::debug!("GPU heuristic '{}' found no candidate", heuristic.name);
            continue;
        };

        if heuristic.confirm_usage && !confirmed_by_usage(probes, &gpu) {
            log::debug!(
                "GPU heuristic '{}' picked {} but it reports no usage",
                heuristic.name,
                gpu
            );
            continue;
        }

        log::info!("Primary GPU ({}): {}", heuristic.name, gpu);
        return Some(cache.fill(gpu));
    }

    None
}

fn confirmed_by_usage(probes: &dyn GpuProbes, gpu: &GpuDescriptor) -> bool {
    gpu.has_device_node() && probes.usage(gpu) > 0.0
}

/// GPU whose bus address matches the one driving the primary display
pub fn display_affinity(
    probes: &dyn GpuProbes,
    candidates: &[GpuDescriptor],
) -> Option<GpuDescriptor> {
    let bus_id = probes.primary_display_bus_id()?;
    let found = candidates.iter().find(|gpu| gpu.bus_id == bus_id).cloned();
    if found.is_none() {
        log::debug!("No GPU found for bus ID {}", bus_id);
    }
    found
}

/// First GPU whose vendor matches the active OpenGL renderer
pub fn rendering_affinity(
    probes: &dyn GpuProbes,
    candidates: &[GpuDescriptor],
) -> Option<GpuDescriptor> {
    for offload in OffloadPreference::ORDER {
        let Some(renderer) = probes.renderer(offload) else {
            continue;
        };

        let Some(vendor) = renderer_vendor(&renderer) else {
            log::debug!("No GPU matched for renderer: {}", renderer);
            continue;
        };

        if let Some(gpu) = candidates.iter().find(|gpu| gpu.vendor == vendor) {
            log::debug!(
                "Rendering GPU (DRI_PRIME={}): {}",
                offload.dri_prime(),
                gpu
            );
            return Some(gpu.clone());
        }
    }

    None
}

/// Map an OpenGL renderer string to a vendor by keyword
pub fn renderer_vendor(renderer: &str) -> Option<GpuVendor> {
    let renderer = renderer.to_lowercase();
    if renderer.contains("amd") || renderer.contains("radeon") {
        Some(GpuVendor::Amd)
    } else if renderer.contains("nvidia") {
        Some(GpuVendor::Nvidia)
    } else if renderer.contains("intel") {
        Some(GpuVendor::Intel)
    } else {
        None
    }
}

/// First GPU with a device node that is visibly doing work
pub fn first_with_usage(
    probes: &dyn GpuProbes,
    candidates: &[GpuDescriptor],
) -> Option<GpuDescriptor> {
    candidates
        .iter()
        .filter(|gpu| gpu.has_device_node())
        .find(|gpu| probes.usage(gpu) > 0.0)
        .cloned()
}

pub fn fallback_bus(_probes: &dyn GpuProbes, candidates: &[GpuDescriptor]) -> Option<GpuDescriptor> {
    candidates
        .iter()
        .find(|gpu| gpu.bus_id == FALLBACK_BUS_ID)
        .cloned()
}

pub fn first_candidate(
    _probes: &dyn GpuProbes,
    candidates: &[GpuDescriptor],
) -> Option<GpuDescriptor> {
    candidates.first().cloned()
}
