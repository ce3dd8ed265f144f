//! Status line composition.
//!
//! Pure function of its inputs: manual text wins outright, otherwise the enabled
//! stats, time and media lines are stacked in that order.

use crate::core::config::{DisplayConfig, SystemStatsConfig};

use super::metrics::MetricsSnapshot;

/// Chatbox message limit
pub const MAX_MESSAGE_CHARS: usize = 140;

/// Control suffix appended in skinny mode
pub const COMPACT_SUFFIX: &str = "\u{3}\u{1f}";

/// Build the string sent to the chatbox
pub fn compose(
    snapshot: &MetricsSnapshot,
    time: &str,
    media: &str,
    manual: &str,
    config: &DisplayConfig,
) -> String {
    let suffix = if config.skinny_mode { COMPACT_SUFFIX } else { "" };

    if !manual.trim().is_empty() {
        return truncate_chars(manual, MAX_MESSAGE_CHARS) + suffix;
    }

    let mut lines = Vec::new();

    if config.system_stats.enable {
        lines.extend(stat_lines(snapshot, &config.system_stats));
    }
    if !time.is_empty() {
        lines.push(time.to_string());
    }
    if !media.is_empty() {
        lines.push(media.to_string());
    }

    lines.join("\n") + suffix
}

/// Keep at most `max` characters (not bytes)
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn stat_lines(snapshot: &MetricsSnapshot, stats: &SystemStatsConfig) -> Vec<String> {
    let value = |field: Option<f64>| field.unwrap_or(0.0);
    let unit = stats.temp_unit.suffix();

    if stats.cpu_usage && stats.gpu_usage && !stats.has_extra_stats() {
        return vec![format!(
            "CPU: {:.1}% | GPU: {:.1}%",
            value(snapshot.cpu_usage),
            value(snapshot.gpu_usage)
        )];
    }

    let mut cpu = Vec::new();
    if stats.cpu_usage {
        cpu.push(format!("CPU: {:.1}%", value(snapshot.cpu_usage)));
    }
    if stats.cpu_temp {
        cpu.push(format!("Temp: {:.0}{}", value(snapshot.cpu_temp), unit));
    }

    let mut gpu = Vec::new();
    if stats.gpu_usage {
        gpu.push(format!("GPU: {:.1}%", value(snapshot.gpu_usage)));
    }
    if stats.gpu_temp {
        gpu.push(format!("Temp: {:.0}{}", value(snapshot.gpu_temp), unit));
    }

    let mut memory = Vec::new();
    if stats.ram_usage {
        memory.push(format!(
            "RAM: {:.1}/{:.1}gb",
            value(snapshot.ram_used),
            value(snapshot.ram_total)
        ));
    }
    if stats.vram_usage {
        memory.push(format!(
            "VRAM: {:.1}/{:.1}gb",
            value(snapshot.vram_used),
            value(snapshot.vram_total)
        ));
    }

    [cpu, gpu, memory]
        .into_iter()
        .filter(|group| !group.is_empty())
        .map(|group| group.join(" | "))
        .collect()
}
