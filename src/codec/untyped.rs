//! Codec for the untyped JSON-message generation.
//!
//! The raw event kind is an open string, so decode is essentially the
//! identity function: known canonical names map onto their typed variants
//! (which keeps terminal detection working), everything else passes through
//! as `EventKind::Other`. This is a deliberately weaker contract than the
//! other generations — there is no exhaustiveness guarantee to enforce, and
//! this codec must not silently invent one.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

use super::{CanonicalEvent, EventCodec, EventDetail, EventKind, Generation, WatchConfig};
use crate::error::{WatchError, WatchResult};

/// Raw poll response shape for the untyped generation.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawJsonEvent {
    event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    destination: Option<PathBuf>,
}

pub struct UntypedCodec;

impl EventCodec for UntypedCodec {
    fn generation(&self) -> Generation {
        Generation::Json
    }

    fn encode_open(&self, config: &WatchConfig) -> Value {
        serde_json::json!({
            "paths": config.paths,
            "recursive": config.recursive,
            "debounceMs": config.debounce_ms,
        })
    }

    fn encode_poll(&self, rid: u32) -> Value {
        super::handle_payload(rid)
    }

    fn encode_close(&self, rid: u32) -> Value {
        super::handle_payload(rid)
    }

    fn decode_event(&self, raw: Value) -> WatchResult<CanonicalEvent> {
        let raw: RawJsonEvent =
            serde_json::from_value(raw).map_err(|e| WatchError::UnexpectedResponseType {
                opcode: "pollWatcher",
                reason: e.to_string(),
            })?;

        Ok(CanonicalEvent {
            kind: EventKind::from_wire(&raw.event),
            detail: EventDetail::Unspecified,
            source: raw.source,
            destination: raw.destination,
        })
    }

    fn encode_event(&self, event: &CanonicalEvent) -> WatchResult<Value> {
        let raw = RawJsonEvent {
            event: event.kind.wire_name().to_string(),
            source: event.source.clone(),
            destination: event.destination.clone(),
        };
        Ok(serde_json::to_value(raw).unwrap_or(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn known_names_map_onto_typed_variants() {
        let event = UntypedCodec
            .decode_event(json!({ "event": "write", "source": "/f" }))
            .unwrap();
        assert_eq!(event.kind, EventKind::Write);
    }

    #[test]
    fn arbitrary_strings_pass_through_instead_of_failing() {
        // Reduced-safety behavior by contract: no UnknownEventCode here.
        let event = UntypedCodec
            .decode_event(json!({ "event": "cosmicRayFlip" }))
            .unwrap();
        assert_eq!(event.kind, EventKind::Other("cosmicRayFlip".to_string()));
    }

    #[test]
    fn terminal_detection_survives_the_weak_contract() {
        let event = UntypedCodec
            .decode_event(json!({ "event": "watcherClosed" }))
            .unwrap();
        assert!(event.is_terminal());
    }

    #[test]
    fn encode_never_fails_even_for_other_kinds() {
        let event = CanonicalEvent {
            kind: EventKind::Other("vendorSpecific".to_string()),
            detail: EventDetail::Unspecified,
            source: None,
            destination: None,
        };
        let raw = UntypedCodec.encode_event(&event).unwrap();
        assert_eq!(raw["event"], "vendorSpecific");
    }
}
