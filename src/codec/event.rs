//! Canonical, generation-independent event model.
//!
//! Every schema generation's codec maps into this one superset. Raw
//! generation enums never leak past the codec boundary: consumers only ever
//! see `CanonicalEvent`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Superset of every generation's event taxonomy.
///
/// The first nine variants are the legacy 9-value taxonomy; the next seven
/// come from the detailed generation (which shares `WatcherClosed`); `Other`
/// is the passthrough bucket for the untyped JSON generation's arbitrary
/// strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    // Legacy taxonomy.
    NoticeWrite,
    NoticeRemove,
    Create,
    Write,
    Chmod,
    Remove,
    Rename,
    Rescan,
    // Detailed taxonomy.
    Unknown,
    Accessed,
    Created,
    MetadataChanged,
    Modified,
    Removed,
    Renamed,
    // Shared terminal marker.
    WatcherClosed,
    /// Arbitrary kind from the untyped generation, carried verbatim.
    #[serde(untagged)]
    Other(String),
}

impl EventKind {
    /// The terminal marker: once observed, the session is over.
    pub fn is_terminal(&self) -> bool {
        matches!(self, EventKind::WatcherClosed)
    }

    /// Wire name of this kind (camelCase across all generations).
    pub fn wire_name(&self) -> &str {
        match self {
            EventKind::NoticeWrite => "noticeWrite",
            EventKind::NoticeRemove => "noticeRemove",
            EventKind::Create => "create",
            EventKind::Write => "write",
            EventKind::Chmod => "chmod",
            EventKind::Remove => "remove",
            EventKind::Rename => "rename",
            EventKind::Rescan => "rescan",
            EventKind::Unknown => "unknown",
            EventKind::Accessed => "accessed",
            EventKind::Created => "created",
            EventKind::MetadataChanged => "metadataChanged",
            EventKind::Modified => "modified",
            EventKind::Removed => "removed",
            EventKind::Renamed => "renamed",
            EventKind::WatcherClosed => "watcherClosed",
            EventKind::Other(s) => s,
        }
    }

    /// Total mapping from a wire string to a kind.
    ///
    /// Strings outside the known set land in `Other`. Only the untyped
    /// generation is allowed to lean on that fallback; the stricter codecs
    /// validate before calling this.
    pub fn from_wire(code: &str) -> Self {
        match code {
            "noticeWrite" => EventKind::NoticeWrite,
            "noticeRemove" => EventKind::NoticeRemove,
            "create" => EventKind::Create,
            "write" => EventKind::Write,
            "chmod" => EventKind::Chmod,
            "remove" => EventKind::Remove,
            "rename" => EventKind::Rename,
            "rescan" => EventKind::Rescan,
            "unknown" => EventKind::Unknown,
            "accessed" => EventKind::Accessed,
            "created" => EventKind::Created,
            "metadataChanged" => EventKind::MetadataChanged,
            "modified" => EventKind::Modified,
            "removed" => EventKind::Removed,
            "renamed" => EventKind::Renamed,
            "watcherClosed" => EventKind::WatcherClosed,
            other => EventKind::Other(other.to_string()),
        }
    }
}

/// Sub-taxonomy carried only by the detailed generation.
///
/// The other generations always report `Unspecified` (present, never
/// omitted). The 19 real values cover file/folder kind, data and metadata
/// sub-kinds, rename modes, and access open/close/read/execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventDetail {
    #[default]
    Unspecified,
    File,
    Folder,
    DataAny,
    DataContent,
    DataSize,
    MetadataAny,
    MetadataAccessTime,
    MetadataWriteTime,
    MetadataPermissions,
    MetadataOwnership,
    MetadataExtended,
    RenameAny,
    RenameFrom,
    RenameTo,
    RenameBoth,
    AccessOpen,
    AccessClose,
    AccessRead,
    AccessExecute,
}

/// One normalized filesystem change.
///
/// `destination` is populated only for rename-like events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalEvent {
    pub kind: EventKind,
    #[serde(default)]
    pub detail: EventDetail,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<PathBuf>,
}

impl CanonicalEvent {
    /// Event with a kind and source path, no detail or destination.
    pub fn single(kind: EventKind, source: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            detail: EventDetail::Unspecified,
            source: Some(source.into()),
            destination: None,
        }
    }

    /// The terminal event emitted when a watcher goes away.
    pub fn closed() -> Self {
        Self {
            kind: EventKind::WatcherClosed,
            detail: EventDetail::Unspecified,
            source: None,
            destination: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.kind.is_terminal()
    }
}
