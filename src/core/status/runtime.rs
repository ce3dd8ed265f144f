//! Tokio runtime that drives the broadcast loop.
//!
//! The loop runs independently of whatever reads stdin or renders the preview.

use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use tokio::sync::{broadcast, watch};
use tokio::time::{interval, MissedTickBehavior};

use crate::error::{ChatlineError, Result};

use super::broadcaster::{Broadcaster, TickOutcome, TICK_INTERVAL};

/// Owns the background runtime running the broadcast loop
pub struct BroadcastRuntime {
    /// Receiver for the latest preview text
    pub preview_rx: watch::Receiver<String>,

    /// Shutdown signal sender
    shutdown_tx: broadcast::Sender<()>,

    /// Handle to the runtime (for shutdown)
    _runtime_handle: tokio::runtime::Runtime,
}

impl BroadcastRuntime {
    /// Start the broadcast loop on its own runtime.
    pub fn start(broadcaster: Broadcaster) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_time()
            .thread_name("broadcast-worker")
            .build()?;

        let preview_rx = broadcaster.shared().subscribe_preview();
        let (shutdown_tx, _) = broadcast::channel::<()>(1);

        runtime.spawn(broadcast_task(broadcaster, shutdown_tx.subscribe()));

        log::info!("Broadcast loop started (every {:?})", TICK_INTERVAL);

        Ok(Self {
            preview_rx,
            shutdown_tx,
            _runtime_handle: runtime,
        })
    }

    /// Stop the loop. Takes effect between ticks.
    pub fn shutdown(self) {
        log::info!("Shutting down broadcast loop");
        let _ = self.shutdown_tx.send(());
        // Runtime will shutdown when dropped
    }
}

/// The perpetual broadcast cycle. Tick failures are logged and retried next period.
async fn broadcast_task(mut broadcaster: Broadcaster, mut shutdown: broadcast::Receiver<()>) {
    let mut ticker = interval(TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let started = Instant::now();

                // External tools block for up to their timeout; keep them off the async workers
                let outcome = tokio::task::block_in_place(|| guarded_tick(&mut broadcaster, started));

                match outcome {
                    Ok(TickOutcome::Sent(_)) => {
                        log::debug!("Update took {:.2}s", started.elapsed().as_secs_f64());
                    }
                    Ok(TickOutcome::Paused) => {}
                    Err(e) => {
                        log::error!("Broadcast error: {}. Retrying in {:?}", e, TICK_INTERVAL);
                    }
                }
            }
            _ = shutdown.recv() => {
                log::debug!("Broadcast task shutting down");
                break;
            }
        }
    }
}

/// Run one tick, reporting a panic inside it as an error so the loop keeps going
fn guarded_tick(broadcaster: &mut Broadcaster, now: Instant) -> Result<TickOutcome> {
    panic::catch_unwind(AssertUnwindSafe(|| broadcaster.tick(now))).unwrap_or_else(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(ChatlineError::other(format!("tick panicked: {}", reason)))
    })
}
