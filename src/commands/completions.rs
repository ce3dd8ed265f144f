use anyhow::{bail, Result};
use clap::{ArgMatches, Command};
use clap_complete::{generate, Shell};
use std::io;

/// Print shell completions for the requested shell
pub fn execute(matches: &ArgMatches, cli: &mut Command) -> Result<()> {
    let Some(shell_str) = matches.get_one::<String>("shell") else {
        bail!("shell argument is required. Usage: chatline completions <SHELL>");
    };

    let Some(shell) = parse_shell(shell_str) else {
        bail!(
            "Unsupported shell: {}. Supported shells: bash, zsh, fish, powershell, elvish",
            shell_str
        );
    };

    generate(shell, cli, "chatline", &mut io::stdout());
    Ok(())
}

fn parse_shell(name: &str) -> Option<Shell> {
    match name.to_lowercase().as_str() {
        "bash" => Some(Shell::Bash),
        "zsh" => Some(Shell::Zsh),
        "fish" => Some(Shell::Fish),
        "powershell" => Some(Shell::PowerShell),
        "elvish" => Some(Shell::Elvish),
        _ => None,
    }
}
