//! Cross-generation codec contracts: exhaustive mapping for the strict
//! generations, documented passthrough for the untyped one.

use serde_json::json;

use watchwire::{EventKind, Generation, WatchError};

#[test]
fn legacy_taxonomy_is_fully_mapped() {
    let codec = Generation::Legacy.codec();
    let mut seen = Vec::new();
    for code in 0..=8u64 {
        let event = codec.decode_event(json!({ "event": code })).unwrap();
        assert!(!seen.contains(&event.kind), "code {code} duplicates a mapping");
        seen.push(event.kind);
    }
    assert_eq!(seen.len(), 9);
    assert!(seen.contains(&EventKind::WatcherClosed));
}

#[test]
fn legacy_rejects_codes_outside_the_set() {
    let codec = Generation::Legacy.codec();
    for code in [9u64, 100, u64::MAX] {
        let err = codec.decode_event(json!({ "event": code })).unwrap_err();
        assert!(
            matches!(err, WatchError::UnknownEventCode { generation: Generation::Legacy, .. }),
            "code {code} must be fatal, got {err}"
        );
    }
}

#[test]
fn detailed_taxonomy_is_fully_mapped() {
    let codec = Generation::Detailed.codec();
    let kinds = [
        "unknown",
        "accessed",
        "created",
        "metadataChanged",
        "modified",
        "removed",
        "renamed",
        "watcherClosed",
    ];
    let mut seen = Vec::new();
    for kind in kinds {
        let event = codec.decode_event(json!({ "kind": kind })).unwrap();
        assert!(!seen.contains(&event.kind));
        seen.push(event.kind);
    }
    assert_eq!(seen.len(), kinds.len());
}

#[test]
fn detailed_rejects_unknown_kinds_and_details() {
    let codec = Generation::Detailed.codec();
    assert!(matches!(
        codec.decode_event(json!({ "kind": "teleported" })).unwrap_err(),
        WatchError::UnknownEventCode { .. }
    ));
    assert!(matches!(
        codec
            .decode_event(json!({ "kind": "modified", "detail": "holographic" }))
            .unwrap_err(),
        WatchError::UnknownEventCode { .. }
    ));
}

// The untyped generation has no exhaustiveness guarantee. That weakness is
// part of its contract: arbitrary strings pass through as Other instead of
// failing, and these tests pin that behavior down rather than upgrading it.
#[test]
fn untyped_generation_passes_arbitrary_kinds_through() {
    let codec = Generation::Json.codec();
    let event = codec
        .decode_event(json!({ "event": "quantumFluctuation", "source": "/f" }))
        .unwrap();
    assert_eq!(event.kind, EventKind::Other("quantumFluctuation".to_string()));
    assert!(!event.is_terminal());
}

#[test]
fn untyped_generation_still_recognizes_the_terminal_marker() {
    let codec = Generation::Json.codec();
    let event = codec.decode_event(json!({ "event": "watcherClosed" })).unwrap();
    assert!(event.is_terminal());
}

#[test]
fn generations_disagree_on_the_default_debounce() {
    assert_eq!(Generation::Legacy.default_debounce_ms(), 500);
    assert_eq!(Generation::Json.default_debounce_ms(), 500);
    assert_eq!(Generation::Detailed.default_debounce_ms(), 2000);
}

#[test]
fn handle_payloads_share_one_shape() {
    for generation in [Generation::Legacy, Generation::Detailed, Generation::Json] {
        let codec = generation.codec();
        assert_eq!(codec.encode_poll(7), json!({ "rid": 7 }));
        assert_eq!(codec.encode_close(7), json!({ "rid": 7 }));
    }
}
