use std::collections::VecDeque;
use std::time::{Duration, Instant};

use super::composer::{truncate_chars, MAX_MESSAGE_CHARS};

/// How many submitted messages are remembered for resend
pub const HISTORY_LIMIT: usize = 5;

/// A submitted message that replaces the live status for a limited time
#[derive(Debug, Clone, Default)]
pub struct ChatOverride {
    text: String,
    submitted_at: Option<Instant>,
}

impl ChatOverride {
    pub fn set(&mut self, text: String, now: Instant) {
        self.text = text;
        self.submitted_at = Some(now);
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.submitted_at = None;
    }

    pub fn is_pending(&self) -> bool {
        self.submitted_at.is_some()
    }

    /// The override text while it is younger than `timeout`.
    ///
    /// Once expired the override is cleared, so later calls keep returning `None`.
    pub fn active_text(&mut self, now: Instant, timeout: Duration) -> Option<&str> {
        let submitted_at = self.submitted_at?;
        if now.saturating_duration_since(submitted_at) < timeout {
            Some(&self.text)
        } else {
            self.clear();
            None
        }
    }
}

/// Everything the interactive side writes and the broadcast loop reads
#[derive(Debug, Clone, Default)]
pub struct ChatState {
    /// In-progress input, sent verbatim while live edit is on
    pub draft: String,
    pub live_edit: bool,
    override_msg: ChatOverride,
    history: VecDeque<String>,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the draft, capped to the chatbox limit
    pub fn set_draft(&mut self, text: &str) {
        self.draft = truncate_chars(text, MAX_MESSAGE_CHARS);
    }

    /// Submit a message. Returns the accepted text, or `None` if it was blank.
    ///
    /// Submitting always clears the draft and leaves live edit mode.
    pub fn submit(&mut self, text: &str, now: Instant) -> Option<String> {
        let text = truncate_chars(text.trim(), MAX_MESSAGE_CHARS);

        self.draft.clear();
        self.live_edit = false;

        if text.is_empty() {
            return None;
        }

        self.history.push_back(text.clone());
        while self.history.len() > HISTORY_LIMIT {
            self.history.pop_front();
        }
        self.override_msg.set(text.clone(), now);

        Some(text)
    }

    pub fn clear_override(&mut self) {
        self.override_msg.clear();
    }

    pub fn override_pending(&self) -> bool {
        self.override_msg.is_pending()
    }

    /// Manual text for this tick: the live draft, else an unexpired override, else empty
    pub fn manual_text(&mut self, now: Instant, timeout: Duration) -> String {
        if self.live_edit {
            let draft = self.draft.trim();
            if !draft.is_empty() {
                return draft.to_string();
            }
        }

        self.override_msg
            .active_text(now, timeout)
            .map(str::to_string)
            .unwrap_or_default()
    }

    /// Submitted messages, newest first
    pub fn history(&self) -> impl Iterator<Item = &String> {
        self.history.iter().rev()
    }

    /// History entry by 1-based position, newest first
    pub fn history_entry(&self, position: usize) -> Option<String> {
        position
            .checked_sub(1)
            .and_then(|index| self.history().nth(index))
            .cloned()
    }
}
