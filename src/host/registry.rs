//! Arena of open watch resources keyed by opaque integer ids.

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use dashmap::DashMap;
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;

use crate::codec::CanonicalEvent;
use crate::error::{WatchError, WatchResult};

use super::backend::WatchStream;

/// One open watcher owned by the host.
struct WatcherEntry {
    /// Already-debounced events from the backend. Locked per poll so polls
    /// against the same handle serialize even host-side.
    events: Arc<Mutex<mpsc::Receiver<CanonicalEvent>>>,
    /// Set on close; a pending poll observes it and yields the terminal
    /// event.
    cancel: CancellationToken,
    /// Keeps the native watcher alive for the lifetime of the entry.
    _guard: Option<Box<dyn Any + Send + Sync>>,
}

/// Table of open watchers with explicit open/close lifecycle.
///
/// Ids are assigned monotonically and never reused; an operation against an
/// id that is absent (never opened, or already closed) fails with
/// `InvalidHandle` rather than hanging.
pub struct HandleTable {
    next_rid: AtomicU32,
    entries: DashMap<u32, WatcherEntry>,
}

impl Default for HandleTable {
    fn default() -> Self {
        Self::new()
    }
}

impl HandleTable {
    pub fn new() -> Self {
        Self {
            // 0 is reserved so a zeroed id is never valid.
            next_rid: AtomicU32::new(1),
            entries: DashMap::new(),
        }
    }

    /// Register a backend stream and return its new handle id.
    pub fn insert(&self, stream: WatchStream) -> u32 {
        let rid = self.next_rid.fetch_add(1, Ordering::Relaxed);
        self.entries.insert(
            rid,
            WatcherEntry {
                events: Arc::new(Mutex::new(stream.events)),
                cancel: CancellationToken::new(),
                _guard: stream.guard,
            },
        );
        tracing::debug!("[registry] opened watcher {rid}");
        rid
    }

    /// Clone out what a poll needs, without holding the table lock across an
    /// await point.
    pub(super) fn poll_parts(
        &self,
        rid: u32,
    ) -> WatchResult<(Arc<Mutex<mpsc::Receiver<CanonicalEvent>>>, CancellationToken)> {
        let entry = self.entries.get(&rid).ok_or(WatchError::InvalidHandle {
            rid,
            reason: "not open",
        })?;
        Ok((entry.events.clone(), entry.cancel.clone()))
    }

    /// Release a watcher: cancel its pending poll and drop its resources.
    pub fn close(&self, rid: u32) -> WatchResult<()> {
        let (_, entry) = self.entries.remove(&rid).ok_or(WatchError::InvalidHandle {
            rid,
            reason: "not open",
        })?;
        entry.cancel.cancel();
        tracing::debug!("[registry] closed watcher {rid}");
        Ok(())
    }

    pub fn contains(&self, rid: u32) -> bool {
        self.entries.contains_key(&rid)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
