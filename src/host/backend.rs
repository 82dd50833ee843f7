//! Boundary to the native watch backends.
//!
//! The OS-specific mechanisms (inotify, FSEvents, ReadDirectoryChangesW)
//! live behind [`WatchBackend`]: they detect changes, apply the debounce
//! window, and deliver already-debounced canonical events. This crate ships
//! only in-memory backends; real backends are external implementations of
//! the trait.

use std::any::Any;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::codec::{CanonicalEvent, WatchConfig};
use crate::error::WatchResult;

/// An open stream of events from a backend.
pub struct WatchStream {
    /// Already-debounced events, in backend emission order.
    pub events: mpsc::Receiver<CanonicalEvent>,
    /// Opaque guard keeping the native watcher alive; dropped on close.
    pub guard: Option<Box<dyn Any + Send + Sync>>,
}

/// Source of debounced filesystem events for the host.
pub trait WatchBackend: Send + Sync {
    /// Start watching the configured paths.
    fn open(&self, config: &WatchConfig) -> WatchResult<WatchStream>;
}

/// Backend that replays a fixed script of events, then ends the stream.
///
/// Every open gets its own copy of the script. Once the script is drained
/// the stream ends and the host reports the terminal event.
pub struct ScriptedBackend {
    script: Vec<CanonicalEvent>,
}

impl ScriptedBackend {
    pub fn new(script: Vec<CanonicalEvent>) -> Self {
        Self { script }
    }

    /// Backend whose streams end immediately.
    pub fn empty() -> Self {
        Self { script: Vec::new() }
    }
}

impl WatchBackend for ScriptedBackend {
    fn open(&self, _config: &WatchConfig) -> WatchResult<WatchStream> {
        let (tx, rx) = mpsc::channel(self.script.len().max(1));
        for event in &self.script {
            // Capacity covers the whole script; try_send cannot fail here.
            let _ = tx.try_send(event.clone());
        }
        // Sender dropped: the stream ends after the script.
        Ok(WatchStream {
            events: rx,
            guard: None,
        })
    }
}

/// Backend that hands the event sender back to the embedder.
///
/// Each open creates a fresh channel and records its sender; tests and
/// embedders feed events through [`sender`](ChannelBackend::sender) while the
/// host polls the receiving end.
pub struct ChannelBackend {
    capacity: usize,
    senders: Mutex<Vec<mpsc::Sender<CanonicalEvent>>>,
}

impl ChannelBackend {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            senders: Mutex::new(Vec::new()),
        }
    }

    /// Sender for the n-th opened stream.
    pub fn sender(&self, index: usize) -> Option<mpsc::Sender<CanonicalEvent>> {
        self.senders.lock().get(index).cloned()
    }

    /// Sender for the most recently opened stream.
    pub fn last_sender(&self) -> Option<mpsc::Sender<CanonicalEvent>> {
        self.senders.lock().last().cloned()
    }
}

impl WatchBackend for ChannelBackend {
    fn open(&self, _config: &WatchConfig) -> WatchResult<WatchStream> {
        let (tx, rx) = mpsc::channel(self.capacity);
        self.senders.lock().push(tx);
        Ok(WatchStream {
            events: rx,
            guard: None,
        })
    }
}
