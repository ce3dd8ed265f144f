//! Display and rendering affinity probes (xrandr, glxinfo).

use crate::core::status::OffloadPreference;
use crate::platform::probe::{self, PROBE_TIMEOUT};

use super::drm::DrmTree;

/// Bus address of the GPU driving the primary xrandr output
pub fn primary_display_bus_id(drm: &DrmTree) -> Option<String> {
    let stdout = match probe::run("xrandr", &["--current"], &[], PROBE_TIMEOUT)
        .and_then(|output| output.into_stdout("xrandr"))
    {
        Ok(stdout) => stdout,
        Err(e) => {
            log::debug!("xrandr error: {}", e);
            return None;
        }
    };

    let Some(output) = parse_primary_output(&stdout) else {
        log::debug!("No primary output detected");
        return None;
    };

    let bus_id = drm
        .card_with_connector(&output)
        .and_then(|card| drm.bus_id_of(&card));

    if bus_id.is_none() {
        log::debug!("Could not map primary output {} to a GPU", output);
    }
    bus_id
}

/// Name of the connected output flagged as primary
pub fn parse_primary_output(xrandr: &str) -> Option<String> {
    xrandr
        .lines()
        .find(|line| line.contains(" connected ") && line.contains(" primary "))
        .and_then(|line| line.split_whitespace().next())
        .map(str::to_string)
}

/// Lowercased OpenGL renderer line reported under the given offload selector
pub fn renderer(offload: OffloadPreference) -> Option<String> {
    let env = [("DRI_PRIME", offload.dri_prime())];
    match probe::run("glxinfo", &[], &env, PROBE_TIMEOUT)
        .and_then(|output| output.into_stdout("glxinfo"))
    {
        Ok(stdout) => parse_renderer(&stdout),
        Err(e) => {
            log::debug!("glxinfo error (DRI_PRIME={}): {}", offload.dri_prime(), e);
            None
        }
    }
}

pub fn parse_renderer(glxinfo: &str) -> Option<String> {
    glxinfo
        .lines()
        .find(|line| line.contains("OpenGL renderer"))
        .map(|line| line.trim().to_lowercase())
}
