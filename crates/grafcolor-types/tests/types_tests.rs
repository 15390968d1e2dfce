//! Integration tests for grafcolor-types.

use grafcolor_types::{GrafcolorError, VertexId};

// ─── ID Tests ──────────────────────────────────────────────────

#[test]
fn vertex_id_index() {
    let id = VertexId(42);
    assert_eq!(id.index(), 42);
}

#[test]
fn vertex_id_ordering_follows_raw_index() {
    let mut ids = vec![VertexId(3), VertexId(0), VertexId(2)];
    ids.sort();
    assert_eq!(ids, vec![VertexId(0), VertexId(2), VertexId(3)]);
}

#[test]
fn vertex_id_conversions() {
    let id: VertexId = 7u32.into();
    let raw: u32 = id.into();
    assert_eq!(raw, 7);
    assert_eq!(id.to_string(), "7");
}

#[test]
fn ids_are_serializable() {
    let id = VertexId(100);
    let json = serde_json::to_string(&id).unwrap();
    let deserialized: VertexId = serde_json::from_str(&json).unwrap();
    assert_eq!(id, deserialized);
}

// ─── Error Tests ──────────────────────────────────────────────

#[test]
fn error_display() {
    let err = GrafcolorError::GraphLoad("data/missing.txt: not found".into());
    assert!(err.to_string().contains("missing.txt"));
}

#[test]
fn invalid_vertex_display() {
    let err = GrafcolorError::InvalidVertexId { id: 9, size: 4 };
    let msg = err.to_string();
    assert!(msg.contains('9'));
    assert!(msg.contains('4'));
}

#[test]
fn compile_error_carries_build_log() {
    let err = GrafcolorError::Compile {
        entry_point: "kernelColor".into(),
        log: "error: use of undeclared identifier 'n'".into(),
    };
    let msg = err.to_string();
    assert!(msg.contains("kernelColor"));
    assert!(msg.contains("undeclared identifier"));
}

#[test]
fn backend_errors_are_classified() {
    assert!(GrafcolorError::Dispatch("enqueue".into()).is_backend());
    assert!(GrafcolorError::Sync("finish".into()).is_backend());
    assert!(GrafcolorError::BackendUnavailable("no device".into()).is_backend());
    assert!(!GrafcolorError::EmptyGraph.is_backend());
    assert!(!GrafcolorError::GraphLoad("x".into()).is_backend());
}
