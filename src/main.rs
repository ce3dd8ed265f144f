use anyhow::Result;
use clap::{Arg, ArgAction, Command};

use chatline::commands;

fn build_cli() -> Command {
    Command::new("chatline")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Broadcasts system load, time and now-playing status to an OSC chatbox")
        .disable_version_flag(true)
        .arg(
            Arg::new("version")
                .short('v')
                .short_alias('V')
                .long("version")
                .help("Print version information")
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("run")
                .about("Start broadcasting; type chat messages on stdin")
                .arg(
                    Arg::new("ip")
                        .long("ip")
                        .value_name("HOST")
                        .help("Send to this host instead of the configured one"),
                )
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .value_name("PORT")
                        .help("Send to this port instead of the configured one"),
                ),
        )
        .subcommand(
            Command::new("gpu")
                .about("List detected GPUs and the one used for stats")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("preview")
                .about("Compose one status message without sending it")
                .arg(
                    Arg::new("message")
                        .short('m')
                        .long("message")
                        .value_name("TEXT")
                        .help("Manual chat text to compose instead of stats"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output metrics and message as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("config")
                .about("Show or change configuration (use 'chatline config --help' for subcommands)")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("show").about("Print the current configuration"))
                .subcommand(Command::new("path").about("Print the configuration file path"))
                .subcommand(
                    Command::new("set")
                        .about("Set a value by dotted key, e.g. system_stats.cpu_temp true")
                        .arg(
                            Arg::new("key")
                                .help("Dotted configuration key")
                                .required(true)
                                .index(1),
                        )
                        .arg(
                            Arg::new("value")
                                .help("New value (JSON or plain text)")
                                .required(true)
                                .index(2),
                        ),
                )
                .subcommand(Command::new("reset").about("Restore the default configuration")),
        )
        .subcommand(Command::new("version").about("Shows version information"))
        .subcommand(
            Command::new("completions")
                .about("Generate shell completions")
                .arg(
                    Arg::new("shell")
                        .help("Shell to generate for (bash, zsh, fish, powershell, elvish)")
                        .required(true)
                        .index(1),
                ),
        )
}

fn main() -> Result<()> {
    chatline::init_logging();

    let matches = build_cli().get_matches();

    if matches.get_flag("version") {
        return commands::version();
    }

    match matches.subcommand() {
        Some(("run", sub_matches)) => commands::run(sub_matches)?,
        Some(("gpu", sub_matches)) => commands::gpu(sub_matches)?,
        Some(("preview", sub_matches)) => commands::preview(sub_matches)?,
        Some(("config", sub_matches)) => commands::config::execute(sub_matches)?,
        Some(("version", _)) => commands::version()?,
        Some(("completions", sub_matches)) => {
            commands::completions::execute(sub_matches, &mut build_cli())?
        }
        _ => {
            println!("Welcome to chatline!");
            println!("Use 'chatline --help' for more information.");
        }
    }

    Ok(())
}
