//! Codec for the legacy binary-framed generation.
//!
//! Events travel as numeric codes 0..=8 over the 9-value taxonomy. The
//! mapping is total: any code outside the range is a fatal
//! `UnknownEventCode`, never a default.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

use super::{CanonicalEvent, EventCodec, EventDetail, EventKind, Generation, WatchConfig};
use crate::error::{WatchError, WatchResult};

/// Raw poll response shape for the legacy generation.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLegacyEvent {
    event: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    destination: Option<PathBuf>,
}

pub struct LegacyCodec;

fn kind_from_code(code: u64) -> Option<EventKind> {
    let kind = match code {
        0 => EventKind::NoticeWrite,
        1 => EventKind::NoticeRemove,
        2 => EventKind::Create,
        3 => EventKind::Write,
        4 => EventKind::Chmod,
        5 => EventKind::Remove,
        6 => EventKind::Rename,
        7 => EventKind::Rescan,
        8 => EventKind::WatcherClosed,
        _ => return None,
    };
    Some(kind)
}

fn code_from_kind(kind: &EventKind) -> Option<u64> {
    let code = match kind {
        EventKind::NoticeWrite => 0,
        EventKind::NoticeRemove => 1,
        EventKind::Create => 2,
        EventKind::Write => 3,
        EventKind::Chmod => 4,
        EventKind::Remove => 5,
        EventKind::Rename => 6,
        EventKind::Rescan => 7,
        EventKind::WatcherClosed => 8,
        _ => return None,
    };
    Some(code)
}

impl EventCodec for LegacyCodec {
    fn generation(&self) -> Generation {
        Generation::Legacy
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
        let raw: RawLegacyEvent =
            serde_json::from_value(raw).map_err(|e| WatchError::UnexpectedResponseType {
                opcode: "pollWatcher",
                reason: e.to_string(),
            })?;

        let kind = kind_from_code(raw.event).ok_or_else(|| WatchError::UnknownEventCode {
            generation: Generation::Legacy,
            code: raw.event.to_string(),
        })?;

        Ok(CanonicalEvent {
            kind,
            detail: EventDetail::Unspecified,
            source: raw.source,
            destination: raw.destination,
        })
    }

    fn encode_event(&self, event: &CanonicalEvent) -> WatchResult<Value> {
        let code = code_from_kind(&event.kind).ok_or_else(|| WatchError::UnknownEventCode {
            generation: Generation::Legacy,
            code: event.kind.wire_name().to_string(),
        })?;

        let raw = RawLegacyEvent {
            event: code,
            source: event.source.clone(),
            destination: event.destination.clone(),
        };
        // Serialization of a plain struct into a Value cannot fail.
        Ok(serde_json::to_value(raw).unwrap_or(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn every_known_code_decodes() {
        let expected = [
            EventKind::NoticeWrite,
            EventKind::NoticeRemove,
            EventKind::Create,
            EventKind::Write,
            EventKind::Chmod,
            EventKind::Remove,
            EventKind::Rename,
            EventKind::Rescan,
            EventKind::WatcherClosed,
        ];
        for (code, kind) in expected.into_iter().enumerate() {
            let event = LegacyCodec
                .decode_event(json!({ "event": code, "source": "/tmp/f" }))
                .unwrap();
            assert_eq!(event.kind, kind);
            assert_eq!(event.detail, EventDetail::Unspecified);
        }
    }

    #[test]
    fn out_of_range_code_is_fatal() {
        let err = LegacyCodec.decode_event(json!({ "event": 9 })).unwrap_err();
        match err {
            WatchError::UnknownEventCode { generation, code } => {
                assert_eq!(generation, Generation::Legacy);
                assert_eq!(code, "9");
            }
            other => panic!("expected UnknownEventCode, got {other}"),
        }
    }

    #[test]
    fn malformed_shape_is_a_response_type_error() {
        let err = LegacyCodec.decode_event(json!("not an object")).unwrap_err();
        assert!(matches!(err, WatchError::UnexpectedResponseType { .. }));
    }

    #[test]
    fn rename_carries_both_paths() {
        let event = LegacyCodec
            .decode_event(json!({ "event": 6, "source": "/a", "destination": "/b" }))
            .unwrap();
        assert_eq!(event.kind, EventKind::Rename);
        assert_eq!(event.source.unwrap(), PathBuf::from("/a"));
        assert_eq!(event.destination.unwrap(), PathBuf::from("/b"));
    }

    #[test]
    fn encode_rejects_kinds_outside_the_taxonomy() {
        let event = CanonicalEvent::single(EventKind::Modified, "/x");
        assert!(matches!(
            LegacyCodec.encode_event(&event),
            Err(WatchError::UnknownEventCode { .. })
        ));
    }

    #[test]
    fn encode_decode_agree_on_the_terminal_event() {
        let raw = LegacyCodec.encode_event(&CanonicalEvent::closed()).unwrap();
        assert_eq!(raw["event"], 8);
        let event = LegacyCodec.decode_event(raw).unwrap();
        assert!(event.is_terminal());
    }
}
