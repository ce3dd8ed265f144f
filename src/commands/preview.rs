//! `chatline preview`: compose one status message without sending it.

use anyhow::Result;
use clap::ArgMatches;
use colored::Colorize;
use serde_json::json;

use crate::core::status::{
    compose, resolve_primary, MetricsCollector, MetricsSnapshot, MetricsSource, PrimaryGpuCache,
    StatusExtras, SystemExtras, COMPACT_SUFFIX,
};
use crate::core::DisplayConfig;
use crate::platform::SystemGpuProbes;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let config = DisplayConfig::load()?;
    let manual = matches
        .get_one::<String>("message")
        .map(String::as_str)
        .unwrap_or("");

    let snapshot = if config.system_stats.enable {
        let probes = SystemGpuProbes::default();
        let monitor = resolve_primary(&probes, &PrimaryGpuCache::new())
            .map(|gpu| probes.monitor_for(gpu));
        MetricsCollector::new(monitor).collect(&config.system_stats)
    } else {
        MetricsSnapshot::default()
    };

    let extras = SystemExtras;
    let time = extras.time_string(&config.time);
    let media = extras.media_string(&config.music);
    let message = compose(&snapshot, &time, &media, manual, &config);

    if matches.get_flag("json") {
        let output = json!({
            "metrics": snapshot,
            "time": time,
            "media": media,
            "message": message,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", "Status preview:".white().bold());
    for line in message.trim_end_matches(COMPACT_SUFFIX).lines() {
        println!("  {}", line.cyan());
    }
    println!(
        "{}",
        format!("({} chars)", message.chars().count()).dimmed()
    );

    Ok(())
}
