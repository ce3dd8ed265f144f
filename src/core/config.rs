use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::status::Endpoint;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 9000;
const DEFAULT_CHAT_TIMEOUT_SECS: f64 = 5.0;

/// Everything the status line can be configured with.
///
/// Numeric settings that users type by hand (`app.port`, `chat_timeout`) are kept
/// as strings and parsed at the point of use, falling back to defaults when malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub system_stats: SystemStatsConfig,
    pub time: TimeConfig,
    pub music: MusicConfig,
    /// Compact formatting: appends a control suffix the chatbox renders narrower
    pub skinny_mode: bool,
    pub app: AppConfig,
    pub chat_timeout: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            system_stats: SystemStatsConfig::default(),
            time: TimeConfig::default(),
            music: MusicConfig::default(),
            skinny_mode: true,
            app: AppConfig::default(),
            chat_timeout: "5".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemStatsConfig {
    pub enable: bool,
    pub cpu_usage: bool,
    pub cpu_temp: bool,
    pub gpu_usage: bool,
    pub gpu_temp: bool,
    pub ram_usage: bool,
    pub vram_usage: bool,
    pub temp_unit: TempUnit,
}

impl Default for SystemStatsConfig {
    fn default() -> Self {
        Self {
            enable: true,
            cpu_usage: true,
            cpu_temp: false,
            gpu_usage: true,
            gpu_temp: false,
            ram_usage: false,
            vram_usage: false,
            temp_unit: TempUnit::Celsius,
        }
    }
}

impl SystemStatsConfig {
    /// True when any field beyond plain CPU/GPU usage is enabled
    pub fn has_extra_stats(&self) -> bool {
        self.cpu_temp || self.gpu_temp || self.ram_usage || self.vram_usage
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TempUnit {
    #[default]
    #[serde(rename = "C")]
    Celsius,
    #[serde(rename = "F")]
    Fahrenheit,
}

impl TempUnit {
    /// Convert a Celsius reading into this unit
    pub fn from_celsius(&self, celsius: f64) -> f64 {
        match self {
            TempUnit::Celsius => celsius,
            TempUnit::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    /// Suffix used in the status line ("c" / "f")
    pub fn suffix(&self) -> &'static str {
        match self {
            TempUnit::Celsius => "c",
            TempUnit::Fahrenheit => "f",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    pub enable: bool,
    /// Prepend "My time: "
    pub prefix: bool,
    /// Append the local zone
    pub timezone: bool,
    /// Zone name (`%Z`) instead of the numeric offset
    pub short_tz: bool,
    #[serde(rename = "24hour")]
    pub hour24: bool,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            enable: true,
            prefix: true,
            timezone: false,
            short_tz: false,
            hour24: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MusicConfig {
    pub enable: bool,
    /// Append "position/duration" of the current track
    pub progress: bool,
    pub prefix: MusicPrefix,
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            enable: true,
            progress: false,
            prefix: MusicPrefix::Emoji,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MusicPrefix {
    #[default]
    Emoji,
    Text,
    None,
}

impl MusicPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            MusicPrefix::Emoji => "🎶 ",
            MusicPrefix::Text => "Listening to: ",
            MusicPrefix::None => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub ip: String,
    pub port: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ip: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT.to_string(),
        }
    }
}

impl AppConfig {
    /// Resolve the OSC endpoint, substituting defaults for malformed values
    pub fn endpoint(&self) -> Endpoint {
        let host = match self.ip.trim() {
            "" => DEFAULT_HOST.to_string(),
            ip => ip.to_string(),
        };

        let port = self.port.trim().parse::<u16>().unwrap_or_else(|_| {
            log::warn!(
                "Invalid port '{}', falling back to {}",
                self.port,
                DEFAULT_PORT
            );
            DEFAULT_PORT
        });

        Endpoint { host, port }
    }
}

impl DisplayConfig {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    /// Load from an explicit path. Missing, empty or unreadable JSON yields defaults.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(DisplayConfig::default());
        }

        let data = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        if data.trim().is_empty() {
            return Ok(DisplayConfig::default());
        }

        Ok(serde_json::from_str(&data).unwrap_or_else(|e| {
            log::warn!("Config load error ({:?}): {}. Using defaults.", config_path, e);
            DisplayConfig::default()
        }))
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let data =
            serde_json::to_string_pretty(self).with_context(|| "Failed to serialize config")?;

        fs::write(config_path, data)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().with_context(|| "Could not determine config directory")?;

        Ok(config_dir.join("chatline").join("config.json"))
    }

    /// How long a submitted chat message overrides the live status
    pub fn chat_timeout(&self) -> Duration {
        let parsed = self
            .chat_timeout
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok());

        parsed.unwrap_or_else(|| {
            log::warn!(
                "Invalid chat timeout '{}', falling back to {}s",
                self.chat_timeout,
                DEFAULT_CHAT_TIMEOUT_SECS
            );
            Duration::from_secs_f64(DEFAULT_CHAT_TIMEOUT_SECS)
        })
    }

    /// Set a value by dotted key (e.g. `system_stats.cpu_temp`, `app.port`).
    ///
    /// The key must already exist. Raw values are parsed as JSON where possible,
    /// otherwise stored as strings; the result is validated by deserializing.
    pub fn set_value(&mut self, key: &str, raw: &str) -> Result<()> {
        let mut tree = serde_json::to_value(&*self)?;

        let mut slot = &mut tree;
        for part in key.split('.') {
            slot = slot
                .get_mut(part)
                .ok_or_else(|| anyhow!("Unknown config key: {}", key))?;
        }

        if slot.is_object() {
            bail!("'{}' is a section, not a value", key);
        }

        *slot = match serde_json::from_str::<Value>(raw) {
            Ok(Value::String(s)) => Value::String(s),
            Ok(value) if !slot.is_string() => value,
            _ => Value::String(raw.to_string()),
        };

        *self = serde_json::from_value(tree)
            .with_context(|| format!("Invalid value '{}' for {}", raw, key))?;

        Ok(())
    }
}
