//! Now-playing line from the MPRIS player via `playerctl`.

use crate::core::config::{MusicConfig, MusicPrefix};
use crate::error::Result;
use crate::platform::probe::{self, PROBE_TIMEOUT};

/// Shown whenever nothing is playing or the player cannot be queried
pub const PAUSED_GLYPH: &str = "⏸️";

/// Current track line. Empty when the music module is disabled.
pub fn now_playing(config: &MusicConfig) -> String {
    if !config.enable {
        return String::new();
    }

    let status = match playerctl(&["status"]) {
        Ok(status) => status,
        Err(e) => {
            log::debug!("Music detection error: {}", e);
            return PAUSED_GLYPH.to_string();
        }
    };

    if status != "Playing" {
        log::debug!(
            "Player status: {}",
            if status.is_empty() { "No player" } else { &status }
        );
        return PAUSED_GLYPH.to_string();
    }

    let track = match playerctl(&["metadata", "--format", "{{title}} - {{artist}}"]) {
        Ok(track) => track,
        Err(e) => {
            log::debug!("Music detection error: {}", e);
            return PAUSED_GLYPH.to_string();
        }
    };

    let progress = if config.progress { track_progress() } else { None };

    format_track(&track, config.prefix, progress.as_ref())
        .unwrap_or_else(|| PAUSED_GLYPH.to_string())
}

/// Build the media line from raw metadata. `None` for empty metadata.
pub fn format_track(
    track: &str,
    prefix: MusicPrefix,
    progress: Option<&(String, String)>,
) -> Option<String> {
    let track = track.trim();
    if track.is_empty() || track == "-" {
        return None;
    }

    let mut line = format!("{}{}", prefix.as_str(), track);
    if let Some((position, duration)) = progress {
        line.push_str(&format!(" {}/{}", position, duration));
    }
    Some(line)
}

fn track_progress() -> Option<(String, String)> {
    let position = playerctl(&["position", "--format", "{{duration(position)}}"]);
    let duration = playerctl(&["metadata", "--format", "{{duration(mpris:length)}}"]);

    match (position, duration) {
        (Ok(position), Ok(duration)) if !position.is_empty() && !duration.is_empty() => {
            Some((position, duration))
        }
        (Err(e), _) | (_, Err(e)) => {
            log::debug!("Music progress error: {}", e);
            None
        }
        _ => None,
    }
}

/// Trimmed stdout of one `playerctl` call. A nonzero exit (no player) is not an error.
fn playerctl(args: &[&str]) -> Result<String> {
    let output = probe::run("playerctl", args, &[], PROBE_TIMEOUT)?;
    Ok(output.stdout.trim().to_string())
}
