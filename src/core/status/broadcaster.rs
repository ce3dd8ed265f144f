//! One tick of the broadcast loop.
//!
//! The tick is synchronous and takes the current instant as input, so the
//! paused/active behaviour and override expiry can be driven from tests.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::Result;

use super::collector::MetricsSource;
use super::composer::compose;
use super::extras::StatusExtras;
use super::metrics::MetricsSnapshot;
use super::sink::MessageSink;
use super::state::{SharedState, PAUSED_PREVIEW};

/// Period of the broadcast loop
pub const TICK_INTERVAL: Duration = Duration::from_secs(2);

/// What a tick did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Program switched off; nothing collected or sent
    Paused,
    /// Message composed and handed to the sink
    Sent(String),
}

pub struct Broadcaster {
    shared: Arc<SharedState>,
    metrics: Box<dyn MetricsSource>,
    extras: Box<dyn StatusExtras>,
    sink: Arc<dyn MessageSink>,
}

impl Broadcaster {
    pub fn new(
        shared: Arc<SharedState>,
        metrics: Box<dyn MetricsSource>,
        extras: Box<dyn StatusExtras>,
        sink: Arc<dyn MessageSink>,
    ) -> Self {
        Self {
            shared,
            metrics,
            extras,
            sink,
        }
    }

    pub fn shared(&self) -> &Arc<SharedState> {
        &self.shared
    }

    /// Run one tick at `now`
    pub fn tick(&mut self, now: Instant) -> Result<TickOutcome> {
        if !self.shared.is_program_on() {
            self.shared.publish_preview(PAUSED_PREVIEW);
            return Ok(TickOutcome::Paused);
        }

        let config = self.shared.config_snapshot();

        let snapshot = if config.system_stats.enable {
            self.metrics.collect(&config.system_stats)
        } else {
            MetricsSnapshot::default()
        };

        let time = if config.time.enable {
            self.extras.time_string(&config.time)
        } else {
            String::new()
        };

        let media = if config.music.enable {
            self.extras.media_string(&config.music)
        } else {
            String::new()
        };

        let manual = self
            .shared
            .chat
            .lock()
            .manual_text(now, config.chat_timeout());

        let message = compose(&snapshot, &time, &media, &manual, &config);

        self.sink.send(&config.app.endpoint(), &message)?;
        log::debug!("Sent: {:?}", message);

        self.shared.publish_preview(&message);
        Ok(TickOutcome::Sent(message))
    }
}
