//! Access to the DRM sysfs tree (`/sys/class/drm`).

use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ChatlineError, Result};

pub const DEFAULT_DRM_ROOT: &str = "/sys/class/drm";

static CARD_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^card(\d+)$").unwrap());
static PCI_SLOT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"PCI_SLOT_NAME=[0-9a-fA-F]{4}:([0-9a-fA-F:.]+)").unwrap());

/// A DRM sysfs tree. Rooted at `/sys/class/drm` normally, anywhere in tests.
#[derive(Debug, Clone)]
pub struct DrmTree {
    root: PathBuf,
}

impl Default for DrmTree {
    fn default() -> Self {
        Self::new(DEFAULT_DRM_ROOT)
    }
}

impl DrmTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Card nodes (`card0`, `card1`, ...) in numeric order; connectors are skipped
    pub fn cards(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.root) else {
            return Vec::new();
        };

        let mut cards: Vec<(u32, String)> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                let index = CARD_NAME.captures(&name)?.get(1)?.as_str().parse().ok()?;
                Some((index, name))
            })
            .collect();

        cards.sort();
        cards.into_iter().map(|(_, name)| name).collect()
    }

    /// Path of a file under a card's `device/` directory
    pub fn device_file(&self, card: &str, name: &str) -> PathBuf {
        self.root.join(card).join("device").join(name)
    }

    pub fn read_uevent(&self, card: &str) -> Result<String> {
        Ok(fs::read_to_string(self.device_file(card, "uevent"))?)
    }

    /// First card whose PCI slot is exactly `bus_id`
    pub fn card_for_bus(&self, bus_id: &str) -> Option<String> {
        let bus_id = bus_id.to_lowercase();
        self.cards()
            .into_iter()
            .find(|card| self.bus_id_of(card).as_deref() == Some(bus_id.as_str()))
    }

    /// Bus address of a card, without the PCI domain
    pub fn bus_id_of(&self, card: &str) -> Option<String> {
        let uevent = self.read_uevent(card).ok()?;
        parse_pci_slot(&uevent)
    }

    /// Card that owns the display connector `output` (e.g. "DP-1")
    pub fn card_with_connector(&self, output: &str) -> Option<String> {
        self.cards().into_iter().find(|card| {
            self.root.join(format!("{}-{}", card, output)).exists()
        })
    }

    /// Parse a single numeric value from a file under the card's `device/`
    pub fn read_number(&self, card: &str, name: &str) -> Result<f64> {
        read_number(&self.device_file(card, name))
    }

    /// First hwmon sensor file called `name` under the card (e.g. `temp1_input`)
    pub fn hwmon_file(&self, card: &str, name: &str) -> Option<PathBuf> {
        let mut dirs: Vec<PathBuf> = fs::read_dir(self.device_file(card, "hwmon"))
            .ok()?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .collect();
        dirs.sort();

        dirs.into_iter()
            .map(|dir| dir.join(name))
            .find(|path| path.exists())
    }
}

pub fn read_number(path: &Path) -> Result<f64> {
    let raw = fs::read_to_string(path)?;
    raw.trim()
        .parse::<f64>()
        .map_err(|e| ChatlineError::parse(format!("{:?}: {}", path, e)))
}

/// Extract the bus address from a uevent `PCI_SLOT_NAME=0000:28:00.0` line
pub fn parse_pci_slot(uevent: &str) -> Option<String> {
    PCI_SLOT
        .captures(uevent)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
}
