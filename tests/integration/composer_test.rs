use chatline::core::config::{SystemStatsConfig, TempUnit};
use chatline::core::status::{compose, MetricsSnapshot, COMPACT_SUFFIX, MAX_MESSAGE_CHARS};
use chatline::core::DisplayConfig;

fn busy_snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        cpu_usage: Some(42.0),
        cpu_temp: Some(65.0),
        gpu_usage: Some(17.5),
        gpu_temp: Some(71.4),
        ram_used: Some(11.2),
        ram_total: Some(31.3),
        vram_used: Some(2.0),
        vram_total: Some(16.0),
    }
}

#[test]
fn test_manual_text_ignores_everything_else() {
    let config = DisplayConfig::default();

    let a = compose(&busy_snapshot(), "My time: 09:05 PM", "🎶 song", "be right back", &config);
    let b = compose(&MetricsSnapshot::default(), "", "", "be right back", &config);

    assert_eq!(a, b);
    assert_eq!(a, format!("be right back{}", COMPACT_SUFFIX));
}

#[test]
fn test_long_manual_text_truncated_to_limit() {
    let config = DisplayConfig {
        skinny_mode: false,
        ..Default::default()
    };
    let manual = "é".repeat(200);

    let message = compose(&MetricsSnapshot::default(), "", "", &manual, &config);
    assert_eq!(message.chars().count(), MAX_MESSAGE_CHARS);
}

#[test]
fn test_compact_suffix_follows_truncated_text() {
    let config = DisplayConfig {
        skinny_mode: true,
        ..Default::default()
    };
    let manual = "é".repeat(200);

    let message = compose(&MetricsSnapshot::default(), "", "", &manual, &config);
    assert_eq!(
        message.chars().count(),
        MAX_MESSAGE_CHARS + COMPACT_SUFFIX.chars().count()
    );
    assert_eq!(message, format!("{}{}", "é".repeat(MAX_MESSAGE_CHARS), COMPACT_SUFFIX));
}

#[test]
fn test_full_layout_in_fahrenheit() {
    let config = DisplayConfig {
        system_stats: SystemStatsConfig {
            cpu_temp: true,
            gpu_temp: true,
            ram_usage: true,
            vram_usage: true,
            temp_unit: TempUnit::Fahrenheit,
            ..Default::default()
        },
        skinny_mode: false,
        ..Default::default()
    };

    let message = compose(&busy_snapshot(), "My time: 09:05 PM", "⏸️", "", &config);

    assert_eq!(
        message,
        "CPU: 42.0% | Temp: 65f\n\
         GPU: 17.5% | Temp: 71f\n\
         RAM: 11.2/31.3gb | VRAM: 2.0/16.0gb\n\
         My time: 09:05 PM\n\
         ⏸️"
    );
}

#[test]
fn test_missing_values_render_as_zero() {
    let config = DisplayConfig {
        skinny_mode: false,
        ..Default::default()
    };

    let message = compose(&MetricsSnapshot::default(), "", "", "", &config);
    assert_eq!(message, "CPU: 0.0% | GPU: 0.0%");
}

#[test]
fn test_stats_disabled_leaves_time_and_media() {
    let mut config = DisplayConfig::default();
    config.system_stats.enable = false;

    let message = compose(&busy_snapshot(), "21:05", "🎶 song", "   ", &config);
    assert_eq!(message, format!("21:05\n🎶 song{}", COMPACT_SUFFIX));
}
