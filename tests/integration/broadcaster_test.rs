use chatline::core::config::{MusicConfig, SystemStatsConfig, TimeConfig};
use chatline::core::status::{
    Broadcaster, Endpoint, MessageSink, MetricsSnapshot, MetricsSource, SharedState, StatusExtras,
    TickOutcome, COMPACT_SUFFIX, PAUSED_PREVIEW,
};
use chatline::core::DisplayConfig;
use chatline::Result;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Default)]
struct RecordingSink {
    sent: Mutex<Vec<(Endpoint, String)>>,
}

impl RecordingSink {
    fn messages(&self) -> Vec<String> {
        self.sent.lock().iter().map(|(_, text)| text.clone()).collect()
    }
}

impl MessageSink for RecordingSink {
    fn send(&self, endpoint: &Endpoint, text: &str) -> Result<()> {
        self.sent.lock().push((endpoint.clone(), text.to_string()));
        Ok(())
    }
}

struct FixedMetrics {
    calls: Arc<Mutex<usize>>,
}

impl MetricsSource for FixedMetrics {
    fn collect(&mut self, _stats: &SystemStatsConfig) -> MetricsSnapshot {
        *self.calls.lock() += 1;
        MetricsSnapshot {
            cpu_usage: Some(42.0),
            gpu_usage: Some(17.5),
            ..Default::default()
        }
    }
}

struct FixedExtras;

impl StatusExtras for FixedExtras {
    fn time_string(&self, _config: &TimeConfig) -> String {
        "My time: 12:00 PM".to_string()
    }

    fn media_string(&self, _config: &MusicConfig) -> String {
        "⏸️".to_string()
    }
}

struct Harness {
    broadcaster: Broadcaster,
    shared: Arc<SharedState>,
    sink: Arc<RecordingSink>,
    collects: Arc<Mutex<usize>>,
}

fn harness(config: DisplayConfig) -> Harness {
    let shared = Arc::new(SharedState::new(config));
    let sink = Arc::new(RecordingSink::default());
    let collects = Arc::new(Mutex::new(0));

    let broadcaster = Broadcaster::new(
        Arc::clone(&shared),
        Box::new(FixedMetrics {
            calls: Arc::clone(&collects),
        }),
        Box::new(FixedExtras),
        sink.clone(),
    );

    Harness {
        broadcaster,
        shared,
        sink,
        collects,
    }
}

fn plain_config() -> DisplayConfig {
    DisplayConfig {
        skinny_mode: false,
        ..Default::default()
    }
}

const STATUS: &str = "CPU: 42.0% | GPU: 17.5%\nMy time: 12:00 PM\n⏸️";

#[test]
fn test_active_tick_sends_composed_status() {
    let mut h = harness(plain_config());

    let outcome = h.broadcaster.tick(Instant::now()).unwrap();

    assert_eq!(outcome, TickOutcome::Sent(STATUS.to_string()));
    assert_eq!(h.sink.messages(), vec![STATUS.to_string()]);
    assert_eq!(*h.shared.subscribe_preview().borrow(), STATUS);

    let sent = h.sink.sent.lock();
    assert_eq!(sent[0].0, Endpoint { host: "127.0.0.1".to_string(), port: 9000 });
}

#[test]
fn test_paused_tick_collects_and_sends_nothing() {
    let mut h = harness(plain_config());
    h.shared.set_program_on(false);

    let outcome = h.broadcaster.tick(Instant::now()).unwrap();

    assert_eq!(outcome, TickOutcome::Paused);
    assert!(h.sink.messages().is_empty());
    assert_eq!(*h.collects.lock(), 0);
    assert_eq!(*h.shared.subscribe_preview().borrow(), PAUSED_PREVIEW);

    h.shared.set_program_on(true);
    assert!(matches!(h.broadcaster.tick(Instant::now()).unwrap(), TickOutcome::Sent(_)));
}

#[test]
fn test_override_honored_until_timeout() {
    let mut h = harness(plain_config());
    let submitted = Instant::now();

    let accepted = h
        .shared
        .submit_chat(h.sink.as_ref(), "  brb  ", submitted)
        .unwrap();
    assert_eq!(accepted.as_deref(), Some("brb"));

    let at = |secs: f64| submitted + Duration::from_secs_f64(secs);

    assert_eq!(h.broadcaster.tick(at(0.0)).unwrap(), TickOutcome::Sent("brb".to_string()));
    assert_eq!(h.broadcaster.tick(at(4.99)).unwrap(), TickOutcome::Sent("brb".to_string()));
    assert_eq!(h.broadcaster.tick(at(5.0)).unwrap(), TickOutcome::Sent(STATUS.to_string()));

    // Expired overrides stay cleared
    assert_eq!(h.broadcaster.tick(at(1.0)).unwrap(), TickOutcome::Sent(STATUS.to_string()));
    assert!(!h.shared.chat.lock().override_pending());
}

#[test]
fn test_oversized_chat_timeout_uses_default() {
    let mut config = plain_config();
    config.chat_timeout = "1e30".to_string();
    let mut h = harness(config);
    let submitted = Instant::now();

    h.shared.submit_chat(h.sink.as_ref(), "afk", submitted).unwrap();

    let at = |secs: f64| submitted + Duration::from_secs_f64(secs);
    assert_eq!(h.broadcaster.tick(at(4.99)).unwrap(), TickOutcome::Sent("afk".to_string()));
    assert_eq!(h.broadcaster.tick(at(5.0)).unwrap(), TickOutcome::Sent(STATUS.to_string()));
}

#[test]
fn test_submit_sends_immediately_with_compact_suffix() {
    let h = harness(DisplayConfig::default());

    h.shared
        .submit_chat(h.sink.as_ref(), "hello", Instant::now())
        .unwrap();

    assert_eq!(h.sink.messages(), vec![format!("hello{}", COMPACT_SUFFIX)]);
}

#[test]
fn test_blank_submit_is_ignored() {
    let h = harness(plain_config());

    let accepted = h
        .shared
        .submit_chat(h.sink.as_ref(), "   ", Instant::now())
        .unwrap();

    assert!(accepted.is_none());
    assert!(h.sink.messages().is_empty());
}

#[test]
fn test_live_edit_draft_wins_over_stats() {
    let mut h = harness(plain_config());
    {
        let mut chat = h.shared.chat.lock();
        chat.set_draft("  typing...  ");
        chat.live_edit = true;
    }

    assert_eq!(
        h.broadcaster.tick(Instant::now()).unwrap(),
        TickOutcome::Sent("typing...".to_string())
    );
}

#[test]
fn test_clear_sends_empty_and_drops_override() {
    let mut h = harness(plain_config());
    let now = Instant::now();

    h.shared.submit_chat(h.sink.as_ref(), "afk", now).unwrap();
    h.shared.clear_chat(h.sink.as_ref()).unwrap();

    assert_eq!(h.sink.messages(), vec!["afk".to_string(), String::new()]);
    assert_eq!(h.broadcaster.tick(now).unwrap(), TickOutcome::Sent(STATUS.to_string()));
}

#[test]
fn test_disabled_sections_skip_their_sources() {
    let mut config = plain_config();
    config.system_stats.enable = false;
    config.time.enable = false;
    let mut h = harness(config);

    assert_eq!(
        h.broadcaster.tick(Instant::now()).unwrap(),
        TickOutcome::Sent("⏸️".to_string())
    );
    assert_eq!(*h.collects.lock(), 0);
}

#[test]
fn test_config_changes_apply_next_tick() {
    let mut h = harness(plain_config());
    h.shared.config.write().app.port = "9001".to_string();

    h.broadcaster.tick(Instant::now()).unwrap();

    assert_eq!(h.sink.sent.lock()[0].0.port, 9001);
}
