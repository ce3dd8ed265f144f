//! GPU enumeration from `lspci -nn`.

use crate::core::status::{GpuDescriptor, GpuVendor};
use crate::platform::probe::{self, PROBE_TIMEOUT};

use super::drm::DrmTree;

/// A display controller line from lspci, before DRM mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PciGpu {
    pub bus_id: String,
    pub vendor: GpuVendor,
    pub description: String,
}

/// List GPUs on the PCI bus and map each to its DRM card.
///
/// Never fails: a missing or failing `lspci` yields an empty list.
pub fn enumerate(drm: &DrmTree) -> Vec<GpuDescriptor> {
    let stdout = match probe::run("lspci", &["-nn"], &[], PROBE_TIMEOUT)
        .and_then(|output| output.into_stdout("lspci"))
    {
        Ok(stdout) => stdout,
        Err(e) => {
            log::warn!("Error listing GPUs: {}", e);
            return Vec::new();
        }
    };

    parse_lspci(&stdout)
        .into_iter()
        .map(|gpu| {
            let device_handle = drm.card_for_bus(&gpu.bus_id);
            if device_handle.is_none() {
                log::debug!("No DRM card for GPU at {}", gpu.bus_id);
            }
            GpuDescriptor {
                bus_id: gpu.bus_id,
                vendor: gpu.vendor,
                display_name: gpu.description,
                device_handle,
            }
        })
        .collect()
}

/// Parse `lspci -nn` output, keeping VGA and 3D controllers of known vendors.
///
/// Lines look like
/// `28:00.0 VGA compatible controller [0300]: Advanced Micro Devices, Inc. [AMD/ATI] Navi 21 [1002:73a5] (rev c0)`.
pub fn parse_lspci(output: &str) -> Vec<PciGpu> {
    output
        .lines()
        .filter_map(|line| {
            let (bus_id, rest) = line.trim().split_once(' ')?;
            let (class, description) = rest.split_once(": ")?;

            if !(class.contains("VGA") || class.contains("3D")) {
                return None;
            }

            let description = description.trim();
            let vendor = GpuVendor::classify(description)?;

            Some(PciGpu {
                bus_id: bus_id.to_lowercase(),
                vendor,
                description: description.to_string(),
            })
        })
        .collect()
}
