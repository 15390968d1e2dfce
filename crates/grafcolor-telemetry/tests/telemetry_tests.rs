//! Integration tests for grafcolor-telemetry.

use grafcolor_telemetry::bus::EventBus;
use grafcolor_telemetry::events::{ColoringEvent, EventKind};
use grafcolor_telemetry::sinks::{TracingSink, VecSink};

fn round_complete(round: u32, selected: u32, remaining: u32) -> ColoringEvent {
    ColoringEvent::new(round, EventKind::RoundComplete { selected, remaining })
}

// ─── Bus Tests ───────────────────────────────────────────────

#[test]
fn emit_and_flush() {
    let mut bus = EventBus::new();
    let sink = VecSink::new();
    bus.add_sink(Box::new(sink.clone()));

    bus.emit(round_complete(0, 3, 5));
    bus.emit(round_complete(1, 5, 0));
    assert!(sink.is_empty());

    assert_eq!(bus.flush(), 2);
    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].round, 0);
    assert_eq!(events[1], round_complete(1, 5, 0));
}

#[test]
fn disabled_bus_drops_events() {
    let mut bus = EventBus::new();
    let sink = VecSink::new();
    bus.add_sink(Box::new(sink.clone()));
    bus.set_enabled(false);
    assert!(!bus.is_enabled());
    bus.emit(round_complete(0, 1, 1));
    assert_eq!(bus.flush(), 0);
    assert!(sink.is_empty());
}

#[test]
fn multiple_sinks_receive_every_event() {
    let mut bus = EventBus::new();
    let a = VecSink::new();
    let b = VecSink::new();
    bus.add_sink(Box::new(a.clone()));
    bus.add_sink(Box::new(b.clone()));
    bus.add_sink(Box::new(TracingSink::new(tracing::Level::INFO)));
    assert_eq!(bus.sink_count(), 3);
    assert_eq!(bus.sink_names(), vec!["vec_sink", "vec_sink", "tracing_sink"]);

    bus.emit(round_complete(0, 2, 2));
    bus.finalize();
    assert_eq!(a.len(), 1);
    assert_eq!(b.len(), 1);
}

// ─── Event Tests ─────────────────────────────────────────────

#[test]
fn event_serialization() {
    let event = ColoringEvent::new(
        4,
        EventKind::RunComplete {
            colors: 3,
            rounds: 4,
            dispatches: 4,
            wall_time: 0.25,
        },
    );
    let json = serde_json::to_string(&event).unwrap();
    let recovered: ColoringEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(recovered, event);
}

#[test]
fn fallback_event_without_colors() {
    let event = ColoringEvent::new(
        0,
        EventKind::FallbackColored {
            vertices: 0,
            max_color: None,
        },
    );
    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("FallbackColored"));
    assert!(json.contains("null"));
}

#[test]
fn labels() {
    assert_eq!(round_complete(0, 0, 0).label(), "round_complete");
    let custom = ColoringEvent::new(
        0,
        EventKind::Custom {
            label: "probe".into(),
            payload: "{}".into(),
        },
    );
    assert_eq!(custom.label(), "probe");
}
