use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tokio::sync::watch;

use crate::core::config::DisplayConfig;
use crate::error::Result;

use super::chat::ChatState;
use super::composer::COMPACT_SUFFIX;
use super::sink::MessageSink;

/// Preview text while the program is switched off
pub const PAUSED_PREVIEW: &str = "Program Off";

/// Preview text after the chatbox was cleared
pub const CLEARED_PREVIEW: &str = "Chatbox cleared";

/// Cells shared between the interactive side and the broadcast loop.
///
/// The interactive side writes config, chat and the program toggle; the loop
/// reads them once at the start of each tick and is the only writer of the preview.
pub struct SharedState {
    pub config: RwLock<DisplayConfig>,
    pub chat: Mutex<ChatState>,
    program_on: AtomicBool,
    preview: watch::Sender<String>,
}

impl SharedState {
    pub fn new(config: DisplayConfig) -> Self {
        let (preview, _) = watch::channel(String::new());
        Self {
            config: RwLock::new(config),
            chat: Mutex::new(ChatState::new()),
            program_on: AtomicBool::new(true),
            preview,
        }
    }

    pub fn config_snapshot(&self) -> DisplayConfig {
        self.config.read().clone()
    }

    pub fn is_program_on(&self) -> bool {
        self.program_on.load(Ordering::Relaxed)
    }

    pub fn set_program_on(&self, on: bool) {
        self.program_on.store(on, Ordering::Relaxed);
    }

    pub fn publish_preview(&self, text: &str) {
        self.preview.send_replace(text.to_string());
    }

    pub fn subscribe_preview(&self) -> watch::Receiver<String> {
        self.preview.subscribe()
    }

    /// Submit a chat message and send it right away.
    ///
    /// Returns the accepted text, or `None` for blank input.
    pub fn submit_chat(
        &self,
        sink: &dyn MessageSink,
        text: &str,
        now: Instant,
    ) -> Result<Option<String>> {
        let config = self.config_snapshot();
        let Some(accepted) = self.chat.lock().submit(text, now) else {
            return Ok(None);
        };

        let suffix = if config.skinny_mode { COMPACT_SUFFIX } else { "" };
        sink.send(&config.app.endpoint(), &format!("{}{}", accepted, suffix))?;
        log::info!("Sent chat: {}", accepted);

        Ok(Some(accepted))
    }

    /// Blank the remote chatbox and drop any pending override
    pub fn clear_chat(&self, sink: &dyn MessageSink) -> Result<()> {
        let endpoint = self.config.read().app.endpoint();
        sink.send(&endpoint, "")?;
        self.chat.lock().clear_override();
        self.publish_preview(CLEARED_PREVIEW);
        log::info!("Cleared chatbox");
        Ok(())
    }
}
