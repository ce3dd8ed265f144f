//! `chatline gpu`: show detected GPUs and which one the status line reports.

use anyhow::Result;
use clap::ArgMatches;
use colored::Colorize;
use serde_json::json;

use crate::core::status::{resolve_primary, GpuProbes, PrimaryGpuCache};
use crate::platform::{strategy_for, SystemGpuProbes};

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let probes = SystemGpuProbes::default();
    let gpus = probes.enumerate();
    let primary = resolve_primary(&probes, &PrimaryGpuCache::new());

    if matches.get_flag("json") {
        let output = json!({
            "gpus": gpus,
            "primary": primary.as_ref().map(|gpu| gpu.bus_id.clone()),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if gpus.is_empty() {
        println!("{}", "No GPUs detected.".yellow());
        println!("{}", "Is lspci (pciutils) installed?".dimmed());
        return Ok(());
    }

    println!("{}", "Detected GPUs:".white().bold());
    for gpu in &gpus {
        let is_primary = primary
            .as_ref()
            .is_some_and(|selected| selected.bus_id == gpu.bus_id);

        let marker = if is_primary { "*".green().bold() } else { " ".normal() };
        let card = gpu.device_handle.as_deref().unwrap_or("no card");

        println!(
            "{} {} {:<6} {} {}",
            marker,
            gpu.bus_id.cyan(),
            gpu.vendor.label(),
            card.dimmed(),
            gpu.display_name
        );

        let strategy = strategy_for(gpu.vendor, probes.drm());
        println!(
            "    usage {:.1}%  temp {:.0}c  vram {:.1}/{:.1}gb",
            strategy.usage_percent(gpu),
            strategy.temperature_celsius(gpu),
            strategy.vram_used_gib(gpu),
            strategy.vram_total_gib(gpu)
        );
    }

    match primary {
        Some(gpu) => println!("\n{} {}", "Primary:".white(), gpu.to_string().green()),
        None => println!("\n{}", "No primary GPU selected.".yellow()),
    }

    Ok(())
}
