use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;

use crate::core::DisplayConfig;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("show", _)) => show(),
        Some(("path", _)) => path(),
        Some(("set", sub_matches)) => set(sub_matches),
        Some(("reset", _)) => reset(),
        _ => {
            println!("Use 'chatline config --help' for more information.");
            Ok(())
        }
    }
}

fn show() -> Result<()> {
    let config = DisplayConfig::load()?;
    let path = DisplayConfig::get_config_path()?;

    println!("{} {}", "Configuration:".white(), path.display().to_string().dimmed());
    println!("{}", serde_json::to_string_pretty(&config)?);

    let endpoint = config.app.endpoint();
    println!();
    println!("{} {}", "Sending to:".white(), endpoint.to_string().cyan().bold());
    println!(
        "{} {}s",
        "Chat timeout:".white(),
        config.chat_timeout().as_secs_f64()
    );

    Ok(())
}

fn path() -> Result<()> {
    let path = DisplayConfig::get_config_path()?;
    println!("{}", path.display());
    Ok(())
}

fn set(matches: &ArgMatches) -> Result<()> {
    let key = matches
        .get_one::<String>("key")
        .context("Key argument is required")?;
    let value = matches
        .get_one::<String>("value")
        .context("Value argument is required")?;

    let mut config = DisplayConfig::load()?;
    config.set_value(key, value)?;
    config.save()?;

    println!("{} {} = {}", "✓".green().bold(), key.cyan(), value.white().bold());
    Ok(())
}

fn reset() -> Result<()> {
    DisplayConfig::default().save()?;
    println!("{}", "Configuration reset to defaults".green());
    Ok(())
}
