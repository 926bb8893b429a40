//! Events emitted while cleaning (log lines and progress ticks)
//!
//! The cleaner never prints. Everything the user sees goes through an [`EventSink`],
//! which is either a channel to the rendering thread or a plain collector in tests.

use serde::Serialize;
use std::sync::mpsc::Sender;
use std::sync::Mutex;

/// Severity of a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Per-attempt details (encoding fallbacks)
    Trace,
    /// Files left alone on purpose
    Skip,
    /// Something was cleaned or removed
    Action,
    /// A file could not be processed
    Warning,
    /// A filesystem operation failed
    Error,
}

/// Real-time updates during a cleaning run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanEvent {
    /// The pre-walk count finished.
    Started { total_files: u64 },

    Log { level: LogLevel, message: String },

    /// `percent` is clamped to 0..=100; the raw counters may drift past each other
    /// when files disappear between the count and the walk.
    Progress {
        percent: u8,
        processed: u64,
        total: u64,
    },
}

/// Receiver of cleaning events. Implementations must not block for long.
pub trait EventSink {
    fn emit(&self, event: CleanEvent);

    fn log(&self, level: LogLevel, message: String) {
        self.emit(CleanEvent::Log { level, message });
    }
}

/// Fire-and-forget sink backed by a channel. A dropped receiver is ignored.
#[derive(Debug)]
pub struct ChannelSink {
    tx: Mutex<Sender<CleanEvent>>,
}

impl ChannelSink {
    pub fn new(tx: Sender<CleanEvent>) -> Self {
        Self { tx: Mutex::new(tx) }
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: CleanEvent) {
        if let Ok(lock) = self.tx.lock() {
            let _ = lock.send(event);
        }
    }
}

/// Collects every event in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<CleanEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<CleanEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                CleanEvent::Log { message, .. } => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn percents(&self) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                CleanEvent::Progress { percent, .. } => Some(percent),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: CleanEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
