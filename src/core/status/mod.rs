//! Status line engine.
//!
//! GPU selection, metric collection, composition and the timed broadcast loop
//! that pushes the composed line to the chatbox.

mod broadcaster;
mod chat;
mod collector;
pub mod composer;
pub mod extras;
mod gpu;
mod metrics;
pub mod resolver;
mod runtime;
mod sink;
mod state;

pub use broadcaster::{Broadcaster, TickOutcome, TICK_INTERVAL};
pub use chat::{ChatOverride, ChatState, HISTORY_LIMIT};
pub use collector::{pick_cpu_temperature, GpuMonitor, MetricsCollector, MetricsSource};
pub use composer::{compose, truncate_chars, COMPACT_SUFFIX, MAX_MESSAGE_CHARS};
pub use extras::{StatusExtras, SystemExtras};
pub use gpu::{GpuDescriptor, GpuMetricStrategy, GpuVendor};
pub use metrics::{bytes_to_gib, round1, MetricsSnapshot};
pub use resolver::{resolve_primary, GpuProbes, OffloadPreference, PrimaryGpuCache};
pub use runtime::BroadcastRuntime;
pub use sink::{Endpoint, MessageSink};
pub use state::{SharedState, CLEARED_PREVIEW, PAUSED_PREVIEW};
