//! In-memory activity log.
//!
//! [`ActivityLog`] is a `tracing` layer that keeps the most recent events in a
//! bounded ring buffer so a frontend can show what the dispatch loop has been
//! doing. [`ActivityReader`] is the read side.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

/// Default number of entries kept by the binary.
pub const DEFAULT_CAPACITY: usize = 500;

/// A single captured event.
#[derive(Debug, Clone)]
pub struct ActivityEntry {
    /// Seconds since the log was created.
    pub elapsed_secs: f64,
    pub level: Level,
    /// Module that emitted the event.
    pub target: String,
    pub message: String,
    /// The event's `error` field, if it had one.
    pub error: Option<String>,
}

impl fmt::Display for ActivityEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            Some(err) => write!(f, "{}: {err}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[derive(Debug)]
struct Ring {
    entries: VecDeque<ActivityEntry>,
    capacity: usize,
    start_time: Instant,
}

impl Ring {
    fn push(&mut self, level: Level, target: String, fields: FieldVisitor) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(ActivityEntry {
            elapsed_secs: self.start_time.elapsed().as_secs_f64(),
            level,
            target,
            message: fields.message,
            error: fields.error,
        });
    }
}

/// `tracing` layer capturing events into a shared ring buffer.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    ring: Arc<Mutex<Ring>>,
}

impl ActivityLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            ring: Arc::new(Mutex::new(Ring {
                entries: VecDeque::with_capacity(capacity),
                capacity,
                start_time: Instant::now(),
            })),
        }
    }

    pub fn reader(&self) -> ActivityReader {
        ActivityReader {
            ring: Arc::clone(&self.ring),
        }
    }
}

impl<S: Subscriber> Layer<S> for ActivityLog {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut fields = FieldVisitor::default();
        event.record(&mut fields);

        if let Ok(mut ring) = self.ring.lock() {
            ring.push(*metadata.level(), metadata.target().to_string(), fields);
        }
    }
}

/// Read handle for an [`ActivityLog`].
#[derive(Debug, Clone)]
pub struct ActivityReader {
    ring: Arc<Mutex<Ring>>,
}

impl ActivityReader {
    /// Snapshot of the buffered entries, oldest first.
    pub fn entries(&self) -> Vec<ActivityEntry> {
        self.ring
            .lock()
            .map(|ring| ring.entries.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    error: Option<String>,
}

impl Visit for FieldVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => self.message = format!("{value:?}"),
            "error" => self.error = Some(format!("{value:?}")),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message = value.to_string(),
            "error" => self.error = Some(value.to_string()),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    #[test]
    fn test_captures_levels_and_messages() {
        let log = ActivityLog::new(100);
        let reader = log.reader();
        let _guard = tracing_subscriber::registry().with(log).set_default();

        tracing::info!("daemon endpoint resolved");
        tracing::warn!("unexpected daemon response status");

        let entries = reader.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].level, Level::INFO);
        assert_eq!(entries[0].message, "daemon endpoint resolved");
        assert_eq!(entries[1].level, Level::WARN);
    }

    #[test]
    fn test_error_field_is_kept() {
        let log = ActivityLog::new(10);
        let reader = log.reader();
        let _guard = tracing_subscriber::registry().with(log).set_default();

        let err = "connection refused";
        tracing::error!(error = %err, "Unable to restart Syncthing");

        let entries = reader.entries();
        assert_eq!(entries[0].error.as_deref(), Some("connection refused"));
        assert_eq!(
            entries[0].to_string(),
            "Unable to restart Syncthing: connection refused"
        );
    }

    #[test]
    fn test_oldest_entries_are_evicted() {
        let log = ActivityLog::new(3);
        let reader = log.reader();
        let _guard = tracing_subscriber::registry().with(log).set_default();

        for i in 0..5 {
            tracing::info!("event {i}");
        }

        let messages: Vec<String> = reader.entries().into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["event 2", "event 3", "event 4"]);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let log = ActivityLog::new(0);
        let reader = log.reader();
        let _guard = tracing_subscriber::registry().with(log).set_default();

        tracing::info!("dropped");
        assert!(reader.entries().is_empty());
    }

    #[test]
    fn test_target_is_recorded() {
        let log = ActivityLog::new(10);
        let reader = log.reader();
        let _guard = tracing_subscriber::registry().with(log).set_default();

        tracing::info!(target: "synctray_core::dispatch", "action dispatched");
        assert_eq!(reader.entries()[0].target, "synctray_core::dispatch");
    }
}
