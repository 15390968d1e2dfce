//! # grafcolor-telemetry
//!
//! Event bus for coloring telemetry. Orchestrators emit structured events
//! (run start, per-round progress, batch dispatch, group resolution,
//! fallback, completion) that are consumed by pluggable sinks.

pub mod bus;
pub mod events;
pub mod sinks;

pub use bus::EventBus;
pub use events::{ColoringEvent, EventKind};
pub use sinks::{EventSink, TracingSink, VecSink};
