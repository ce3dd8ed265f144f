//! Bounded execution of external probe tools (lspci, xrandr, glxinfo, ...).
//!
//! A hung tool must never stall the broadcast loop, so every invocation has a
//! hard deadline after which the child is killed.

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::{ChatlineError, Result};

/// Upper bound for any single probe invocation
pub const PROBE_TIMEOUT: Duration = Duration::from_millis(500);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Captured output of a finished probe
#[derive(Debug, Clone, Default)]
pub struct ProbeOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

impl ProbeOutput {
    /// Stdout of a successful run; a nonzero exit becomes `ProbeFailed`
    pub fn into_stdout(self, program: &str) -> Result<String> {
        if self.success {
            Ok(self.stdout)
        } else {
            Err(ChatlineError::probe_failed(format!(
                "{} exited with an error: {}",
                program,
                self.stderr.trim()
            )))
        }
    }
}

/// Run `program` with `args` and extra `env`, giving up after `timeout`.
pub fn run(
    program: &str,
    args: &[&str],
    env: &[(&str, &str)],
    timeout: Duration,
) -> Result<ProbeOutput> {
    let path = which::which(program)
        .map_err(|e| ChatlineError::probe_unavailable(format!("{}: {}", program, e)))?;

    let mut child = Command::new(path)
        .args(args)
        .envs(env.iter().copied())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| ChatlineError::probe_failed(format!("Failed to spawn {}: {}", program, e)))?;

    // Drain both pipes concurrently so a chatty tool cannot block on a full pipe
    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    let deadline = Instant::now() + timeout;
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }

        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Err(ChatlineError::probe_timeout(format!(
                "{} did not finish within {:?}",
                program, timeout
            )));
        }

        thread::sleep(POLL_INTERVAL);
    };

    Ok(ProbeOutput {
        stdout: collect(stdout),
        stderr: collect(stderr),
        success: status.success(),
    })
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn collect(reader: Option<JoinHandle<String>>) -> String {
    reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}
