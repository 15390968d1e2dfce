//! Pluggable event sinks.

use std::sync::{Arc, Mutex, PoisonError};

use crate::events::{ColoringEvent, EventKind};

/// Trait for event consumers.
///
/// Implement this to create custom telemetry outputs.
pub trait EventSink: Send {
    /// Process a single event.
    fn handle(&mut self, event: &ColoringEvent);

    /// Called when the run ends. Flush buffers, close files, etc.
    fn finalize(&mut self) {}

    /// Returns a human-readable name for this sink.
    fn name(&self) -> &str;
}

/// Collects events into a shared `Vec`.
///
/// Clones share storage, so a clone kept outside the bus can inspect what
/// the boxed sink received.
#[derive(Clone, Default)]
pub struct VecSink {
    events: Arc<Mutex<Vec<ColoringEvent>>>,
}

impl VecSink {
    /// Creates an empty vec sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the collected events.
    pub fn events(&self) -> Vec<ColoringEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for VecSink {
    fn handle(&mut self, event: &ColoringEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }

    fn name(&self) -> &str {
        "vec_sink"
    }
}

/// A sink that logs events using the `tracing` crate.
///
/// Run begin/complete are logged at `level`; per-round events one level
/// lower so long runs stay readable.
pub struct TracingSink {
    level: tracing::Level,
}

impl TracingSink {
    /// Creates a new tracing sink at the given log level.
    pub fn new(level: tracing::Level) -> Self {
        Self { level }
    }

    fn level_for(&self, event: &ColoringEvent) -> tracing::Level {
        match event.kind {
            EventKind::RunBegin { .. } | EventKind::RunComplete { .. } => self.level,
            _ => demote(self.level),
        }
    }
}

fn demote(level: tracing::Level) -> tracing::Level {
    match level {
        tracing::Level::ERROR => tracing::Level::WARN,
        tracing::Level::WARN => tracing::Level::INFO,
        tracing::Level::INFO => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}

impl EventSink for TracingSink {
    fn handle(&mut self, event: &ColoringEvent) {
        let round = event.round;
        let label = event.label();
        let kind = &event.kind;
        match self.level_for(event) {
            tracing::Level::ERROR => tracing::error!(round, label, event = ?kind, "coloring_event"),
            tracing::Level::WARN => tracing::warn!(round, label, event = ?kind, "coloring_event"),
            tracing::Level::INFO => tracing::info!(round, label, event = ?kind, "coloring_event"),
            tracing::Level::DEBUG => tracing::debug!(round, label, event = ?kind, "coloring_event"),
            _ => tracing::trace!(round, label, event = ?kind, "coloring_event"),
        }
    }

    fn name(&self) -> &str {
        "tracing_sink"
    }
}
