//! `chatline run`: the broadcaster, driven interactively from stdin.

use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::core::status::{
    resolve_primary, BroadcastRuntime, Broadcaster, MessageSink, MetricsCollector,
    PrimaryGpuCache, SharedState, SystemExtras, COMPACT_SUFFIX,
};
use crate::core::DisplayConfig;
use crate::platform::{OscClient, SystemGpuProbes};

const INPUT_POLL: Duration = Duration::from_millis(100);

/// A line typed while the broadcaster is running
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Submit(String),
    Live(String),
    LiveOff,
    Pause,
    Resume,
    Clear,
    History,
    Resend(usize),
    Quit,
    Help,
    Invalid(String),
}

impl ChatCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);

        let Some(command) = line.strip_prefix('/') else {
            return ChatCommand::Submit(line.to_string());
        };

        let (name, arg) = match command.split_once(' ') {
            Some((name, arg)) => (name, arg.trim()),
            None => (command, ""),
        };

        match name {
            "live" if arg == "off" => ChatCommand::LiveOff,
            "live" => ChatCommand::Live(arg.to_string()),
            "pause" => ChatCommand::Pause,
            "resume" => ChatCommand::Resume,
            "clear" => ChatCommand::Clear,
            "history" => ChatCommand::History,
            "resend" => match arg.parse::<usize>() {
                Ok(n) if n > 0 => ChatCommand::Resend(n),
                _ => ChatCommand::Invalid(format!("'/resend' needs a history number, got '{}'", arg)),
            },
            "quit" | "exit" => ChatCommand::Quit,
            "help" => ChatCommand::Help,
            _ => ChatCommand::Invalid(format!("Unknown command '/{}'", name)),
        }
    }
}

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let mut config = DisplayConfig::load()?;
    if let Some(ip) = matches.get_one::<String>("ip") {
        config.app.ip = ip.clone();
    }
    if let Some(port) = matches.get_one::<String>("port") {
        config.app.port = port.clone();
    }

    println!(
        "{} {}",
        "Sending to".white(),
        config.app.endpoint().to_string().cyan().bold()
    );

    let probes = SystemGpuProbes::default();
    let cache = PrimaryGpuCache::new();
    let monitor = match resolve_primary(&probes, &cache) {
        Some(gpu) => {
            println!("{} {}", "Primary GPU:".white(), gpu.to_string().green());
            Some(probes.monitor_for(gpu))
        }
        None => {
            println!("{}", "No GPU detected, GPU stats will read 0".yellow());
            None
        }
    };

    let sink: Arc<dyn MessageSink> =
        Arc::new(OscClient::bind().context("Failed to open OSC socket")?);
    let shared = Arc::new(SharedState::new(config));

    let broadcaster = Broadcaster::new(
        Arc::clone(&shared),
        Box::new(MetricsCollector::new(monitor)),
        Box::new(SystemExtras),
        Arc::clone(&sink),
    );
    let mut runtime = BroadcastRuntime::start(broadcaster)?;

    let stop = Arc::new(AtomicBool::new(false));
    let stop_clone = Arc::clone(&stop);
    ctrlc::set_handler(move || {
        stop_clone.store(true, Ordering::Relaxed);
    })
    .map_err(|e| anyhow::anyhow!("Failed to set Ctrl+C handler: {}", e))?;

    print_help();
    let input = spawn_stdin_reader();
    let mut stdin_open = true;
    let mut last_preview = String::new();

    while !stop.load(Ordering::Relaxed) {
        if stdin_open {
            match input.recv_timeout(INPUT_POLL) {
                Ok(line) => {
                    let command = ChatCommand::parse(&line);
                    if command == ChatCommand::Quit {
                        break;
                    }
                    if let Err(e) = handle_command(command, &shared, sink.as_ref()) {
                        println!("{} {}", "Error:".red().bold(), e);
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    log::debug!("stdin closed, broadcasting until Ctrl+C");
                    stdin_open = false;
                }
            }
        } else {
            thread::sleep(INPUT_POLL);
        }

        if runtime.preview_rx.has_changed().unwrap_or(false) {
            let preview = runtime.preview_rx.borrow_and_update().clone();
            if preview != last_preview {
                print_preview(&preview);
                last_preview = preview;
            }
        }
    }

    println!("{}", "Stopping...".yellow());
    runtime.shutdown();
    Ok(())
}

fn handle_command(command: ChatCommand, shared: &SharedState, sink: &dyn MessageSink) -> Result<()> {
    match command {
        ChatCommand::Submit(text) => {
            if shared.submit_chat(sink, &text, Instant::now())?.is_none() {
                println!("{}", "Nothing to send".dimmed());
            }
        }
        ChatCommand::Live(text) => {
            let mut chat = shared.chat.lock();
            chat.set_draft(&text);
            chat.live_edit = true;
            println!("{}", "Live edit on".green());
        }
        ChatCommand::LiveOff => {
            let mut chat = shared.chat.lock();
            chat.live_edit = false;
            chat.draft.clear();
            println!("{}", "Live edit off".dimmed());
        }
        ChatCommand::Pause => {
            shared.set_program_on(false);
            println!("{}", "Program off".yellow());
        }
        ChatCommand::Resume => {
            shared.set_program_on(true);
            println!("{}", "Program on".green());
        }
        ChatCommand::Clear => shared.clear_chat(sink)?,
        ChatCommand::History => {
            let chat = shared.chat.lock();
            let mut empty = true;
            for (position, text) in chat.history().enumerate() {
                println!("  {} {}", format!("{}.", position + 1).cyan(), text);
                empty = false;
            }
            if empty {
                println!("{}", "No messages sent yet".dimmed());
            }
        }
        ChatCommand::Resend(position) => {
            let entry = shared.chat.lock().history_entry(position);
            match entry {
                Some(text) => {
                    shared.submit_chat(sink, &text, Instant::now())?;
                }
                None => println!("{}", format!("No history entry {}", position).yellow()),
            }
        }
        ChatCommand::Help => print_help(),
        ChatCommand::Invalid(reason) => println!("{}", reason.yellow()),
        ChatCommand::Quit => {}
    }

    Ok(())
}

/// Forward stdin lines to a channel so the main loop can poll it
fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn print_preview(preview: &str) {
    let preview = preview.trim_end_matches(COMPACT_SUFFIX);
    if preview.is_empty() {
        return;
    }
    println!("{}", "─".repeat(24).dimmed());
    for line in preview.lines() {
        println!("{}", line.cyan());
    }
}

fn print_help() {
    println!();
    println!("{}", "Type a message and press Enter to send it.".white());
    println!("  {}  {}", "/live <text>".cyan(), "show text live until submitted".dimmed());
    println!("  {}     {}", "/live off".cyan(), "leave live edit".dimmed());
    println!("  {}  {}", "/pause /resume".cyan(), "stop or restart broadcasting".dimmed());
    println!("  {}        {}", "/clear".cyan(), "blank the chatbox".dimmed());
    println!("  {}      {}", "/history".cyan(), "list sent messages".dimmed());
    println!("  {}    {}", "/resend <n>".cyan(), "send a history entry again".dimmed());
    println!("  {}         {}", "/quit".cyan(), "exit".dimmed());
    println!();
}
