//! Coloring event types.
//!
//! Events are small value types tagged with the round (Luby) or batch
//! (group coloring) they belong to.

use serde::{Deserialize, Serialize};

/// An event emitted by a coloring orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColoringEvent {
    /// Round or batch index (0-indexed).
    pub round: u32,
    /// Event payload.
    pub kind: EventKind,
}

/// Event payload variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// A coloring run started.
    RunBegin {
        algorithm: String,
        backend: String,
        vertices: u32,
        edges: u32,
    },

    /// A Luby round committed its independent set.
    RoundComplete {
        /// Vertices colored this round.
        selected: u32,
        /// Vertices still uncolored.
        remaining: u32,
    },

    /// A group-kernel batch was dispatched and read back.
    BatchDispatched {
        batch_start: u32,
        batch_size: u32,
    },

    /// Conflict resolution finished.
    GroupsResolved {
        /// Groups that received a color.
        accepted: u32,
        /// Groups discarded as duplicates or non-independent.
        rejected: u32,
        /// Vertices left uncolored for the fallback.
        residual: u32,
    },

    /// Greedy fallback finished.
    FallbackColored {
        vertices: u32,
        /// Highest color used by the fallback, if it colored anything.
        max_color: Option<u32>,
    },

    /// A coloring run completed.
    RunComplete {
        colors: u32,
        rounds: u32,
        dispatches: u32,
        /// Wall-clock time for the run (seconds).
        wall_time: f64,
    },

    /// Custom event for extensibility.
    Custom {
        /// Arbitrary label.
        label: String,
        /// JSON-encoded payload.
        payload: String,
    },
}

impl ColoringEvent {
    /// Creates a new event for the given round.
    pub fn new(round: u32, kind: EventKind) -> Self {
        Self { round, kind }
    }

    /// Short name of the event kind, used as a log field.
    pub fn label(&self) -> &str {
        match &self.kind {
            EventKind::RunBegin { .. } => "run_begin",
            EventKind::RoundComplete { .. } => "round_complete",
            EventKind::BatchDispatched { .. } => "batch_dispatched",
            EventKind::GroupsResolved { .. } => "groups_resolved",
            EventKind::FallbackColored { .. } => "fallback_colored",
            EventKind::RunComplete { .. } => "run_complete",
            EventKind::Custom { label, .. } => label,
        }
    }
}
