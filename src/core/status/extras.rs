//! Time and now-playing lines.

use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;

use crate::core::config::{MusicConfig, TimeConfig};
use crate::platform::media;

/// Sources of the non-metric status lines
pub trait StatusExtras: Send {
    fn time_string(&self, config: &TimeConfig) -> String;
    fn media_string(&self, config: &MusicConfig) -> String;
}

/// Local clock and the system media player
pub struct SystemExtras;

impl StatusExtras for SystemExtras {
    fn time_string(&self, config: &TimeConfig) -> String {
        format_clock(&Local::now(), config)
    }

    fn media_string(&self, config: &MusicConfig) -> String {
        media::now_playing(config)
    }
}

/// Format the clock line for `now`. Empty when the time module is disabled.
pub fn format_clock<Tz>(now: &DateTime<Tz>, config: &TimeConfig) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if !config.enable {
        return String::new();
    }

    let pattern = if config.hour24 { "%H:%M" } else { "%I:%M %p" };
    let mut time = now.format(pattern).to_string();

    if config.timezone {
        let zone = if config.short_tz { "%Z" } else { "%:z" };
        time.push(' ');
        time.push_str(&now.format(zone).to_string());
    }

    if config.prefix {
        format!("My time: {}", time)
    } else {
        time
    }
}
