//! Codec for the richer type+detail generation.
//!
//! Events carry a string kind from an 8-value taxonomy plus an independent
//! 19-value detail sub-taxonomy. Both mappings are exhaustive; an unknown
//! kind or detail string is a fatal `UnknownEventCode`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;

use super::{CanonicalEvent, EventCodec, EventDetail, EventKind, Generation, WatchConfig};
use crate::error::{WatchError, WatchResult};

/// Raw poll response shape for the detailed generation.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDetailedEvent {
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    destination: Option<PathBuf>,
}

pub struct DetailedCodec;

fn kind_from_code(code: &str) -> Option<EventKind> {
    let kind = match code {
        "unknown" => EventKind::Unknown,
        "accessed" => EventKind::Accessed,
        "created" => EventKind::Created,
        "metadataChanged" => EventKind::MetadataChanged,
        "modified" => EventKind::Modified,
        "removed" => EventKind::Removed,
        "renamed" => EventKind::Renamed,
        "watcherClosed" => EventKind::WatcherClosed,
        _ => return None,
    };
    Some(kind)
}

fn code_from_kind(kind: &EventKind) -> Option<&'static str> {
    let code = match kind {
        EventKind::Unknown => "unknown",
        EventKind::Accessed => "accessed",
        EventKind::Created => "created",
        EventKind::MetadataChanged => "metadataChanged",
        EventKind::Modified => "modified",
        EventKind::Removed => "removed",
        EventKind::Renamed => "renamed",
        EventKind::WatcherClosed => "watcherClosed",
        _ => return None,
    };
    Some(code)
}

fn detail_from_code(code: &str) -> Option<EventDetail> {
    let detail = match code {
        "unspecified" => EventDetail::Unspecified,
        "file" => EventDetail::File,
        "folder" => EventDetail::Folder,
        "dataAny" => EventDetail::DataAny,
        "dataContent" => EventDetail::DataContent,
        "dataSize" => EventDetail::DataSize,
        "metadataAny" => EventDetail::MetadataAny,
        "metadataAccessTime" => EventDetail::MetadataAccessTime,
        "metadataWriteTime" => EventDetail::MetadataWriteTime,
        "metadataPermissions" => EventDetail::MetadataPermissions,
        "metadataOwnership" => EventDetail::MetadataOwnership,
        "metadataExtended" => EventDetail::MetadataExtended,
        "renameAny" => EventDetail::RenameAny,
        "renameFrom" => EventDetail::RenameFrom,
        "renameTo" => EventDetail::RenameTo,
        "renameBoth" => EventDetail::RenameBoth,
        "accessOpen" => EventDetail::AccessOpen,
        "accessClose" => EventDetail::AccessClose,
        "accessRead" => EventDetail::AccessRead,
        "accessExecute" => EventDetail::AccessExecute,
        _ => return None,
    };
    Some(detail)
}

fn code_from_detail(detail: EventDetail) -> &'static str {
    match detail {
        EventDetail::Unspecified => "unspecified",
        EventDetail::File => "file",
        EventDetail::Folder => "folder",
        EventDetail::DataAny => "dataAny",
        EventDetail::DataContent => "dataContent",
        EventDetail::DataSize => "dataSize",
        EventDetail::MetadataAny => "metadataAny",
        EventDetail::MetadataAccessTime => "metadataAccessTime",
        EventDetail::MetadataWriteTime => "metadataWriteTime",
        EventDetail::MetadataPermissions => "metadataPermissions",
        EventDetail::MetadataOwnership => "metadataOwnership",
        EventDetail::MetadataExtended => "metadataExtended",
        EventDetail::RenameAny => "renameAny",
        EventDetail::RenameFrom => "renameFrom",
        EventDetail::RenameTo => "renameTo",
        EventDetail::RenameBoth => "renameBoth",
        EventDetail::AccessOpen => "accessOpen",
        EventDetail::AccessClose => "accessClose",
        EventDetail::AccessRead => "accessRead",
        EventDetail::AccessExecute => "accessExecute",
    }
}

impl EventCodec for DetailedCodec {
    fn generation(&self) -> Generation {
        Generation::Detailed
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
        let raw: RawDetailedEvent =
            serde_json::from_value(raw).map_err(|e| WatchError::UnexpectedResponseType {
                opcode: "pollWatcher",
                reason: e.to_string(),
            })?;

        let kind = kind_from_code(&raw.kind).ok_or_else(|| WatchError::UnknownEventCode {
            generation: Generation::Detailed,
            code: raw.kind.clone(),
        })?;

        let detail = match raw.detail {
            None => EventDetail::Unspecified,
            Some(code) => {
                detail_from_code(&code).ok_or_else(|| WatchError::UnknownEventCode {
                    generation: Generation::Detailed,
                    code,
                })?
            }
        };

        Ok(CanonicalEvent {
            kind,
            detail,
            source: raw.source,
            destination: raw.destination,
        })
    }

    fn encode_event(&self, event: &CanonicalEvent) -> WatchResult<Value> {
        let kind = code_from_kind(&event.kind).ok_or_else(|| WatchError::UnknownEventCode {
            generation: Generation::Detailed,
            code: event.kind.wire_name().to_string(),
        })?;

        let raw = RawDetailedEvent {
            kind: kind.to_string(),
            detail: Some(code_from_detail(event.detail).to_string()),
            source: event.source.clone(),
            destination: event.destination.clone(),
        };
        Ok(serde_json::to_value(raw).unwrap_or(Value::Null))
    }
}
