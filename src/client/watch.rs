//! Public façade: the watch handle a caller iterates and closes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::codec::{EventCodec, Generation, WatchConfig};
use crate::dispatch::{DispatchChannel, Opcode};
use crate::error::WatchResult;

use super::poller::{EventPoller, PollOutcome};
use super::session::WatchSession;

/// Paths to watch: a single path or an ordered sequence. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchPaths(Vec<String>);

impl WatchPaths {
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<&str> for WatchPaths {
    fn from(path: &str) -> Self {
        Self(vec![path.to_string()])
    }
}

impl From<String> for WatchPaths {
    fn from(path: String) -> Self {
        Self(vec![path])
    }
}

impl From<Vec<String>> for WatchPaths {
    fn from(paths: Vec<String>) -> Self {
        Self(paths)
    }
}

impl From<Vec<&str>> for WatchPaths {
    fn from(paths: Vec<&str>) -> Self {
        Self(paths.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for WatchPaths {
    fn from(paths: &[&str]) -> Self {
        Self(paths.iter().map(|p| p.to_string()).collect())
    }
}

/// Caller-facing options; unset fields take the wire-contract defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchOptions {
    pub recursive: Option<bool>,
    pub debounce_ms: Option<u64>,
}

impl WatchOptions {
    /// Fill in defaults: recursive=false, debounce = the generation's
    /// documented default (500 ms legacy/json, 2000 ms detailed).
    pub(crate) fn resolve(&self, paths: Vec<String>, generation: Generation) -> WatchConfig {
        WatchConfig {
            paths,
            recursive: self.recursive.unwrap_or(false),
            debounce_ms: self
                .debounce_ms
                .unwrap_or_else(|| generation.default_debounce_ms()),
        }
    }
}

/// An open watch session: iterate with [`next`](WatchClient::next), end with
/// [`close`](WatchClient::close).
///
/// The handle id is owned exclusively by this client; it must not be shared
/// across consumers or reused after close.
pub struct WatchClient {
    channel: Arc<dyn DispatchChannel>,
    codec: &'static dyn EventCodec,
    rid: u32,
    poller: EventPoller,
    /// Guards the close request: exactly one ever reaches the channel.
    close_sent: AtomicBool,
}

impl WatchClient {
    /// Open a watch over the given channel, speaking the given generation.
    pub fn open(
        channel: Arc<dyn DispatchChannel>,
        generation: Generation,
        paths: impl Into<WatchPaths>,
        options: WatchOptions,
    ) -> WatchResult<Self> {
        let session = WatchSession::new(channel.clone(), generation);
        let rid = session.open(paths.into(), &options)?;
        let codec = generation.codec();

        Ok(Self {
            poller: EventPoller::new(channel.clone(), codec, rid),
            channel,
            codec,
            rid,
            close_sent: AtomicBool::new(false),
        })
    }

    /// The opaque handle id of this session.
    pub fn rid(&self) -> u32 {
        self.rid
    }

    /// Resolve the next event. Suspends until the channel answers.
    ///
    /// Returns `done = true` (with a terminal event) after close or after the
    /// watcher's own terminal event, without further channel traffic.
    pub async fn next(&self) -> WatchResult<PollOutcome> {
        self.poller.next().await
    }

    /// Close the watch. Synchronous and idempotent.
    ///
    /// The first call marks the session terminal and sends the close request
    /// over the blocking call path; subsequent calls are no-ops. The session
    /// stays terminal even if the close request itself fails.
    pub fn close(&self) -> WatchResult<()> {
        if self.close_sent.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        // Terminal before the wire call: a concurrent poll must not fire at a
        // resource that is about to be released.
        self.poller.shutdown();
        tracing::debug!("[client] closing handle {}", self.rid);
        self.channel
            .send_sync(Opcode::CloseWatcher, self.codec.encode_close(self.rid))?;
        Ok(())
    }

    /// Whether the session has reached its absorbing terminal state.
    pub fn is_terminal(&self) -> bool {
        self.poller.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_accept_single_and_sequence_forms() {
        assert_eq!(WatchPaths::from("/tmp/a").into_vec(), vec!["/tmp/a"]);
        assert_eq!(
            WatchPaths::from(vec!["/a", "/b"]).into_vec(),
            vec!["/a", "/b"]
        );
        assert!(WatchPaths::default().into_vec().is_empty());
    }

    #[test]
    fn options_resolve_generation_defaults() {
        let options = WatchOptions::default();
        let config = options.resolve(vec![], Generation::Legacy);
        assert!(!config.recursive);
        assert_eq!(config.debounce_ms, 500);

        let config = options.resolve(vec![], Generation::Detailed);
        assert_eq!(config.debounce_ms, 2000);
    }

    #[test]
    fn explicit_options_win_over_defaults() {
        let options = WatchOptions {
            recursive: Some(true),
            debounce_ms: Some(125),
        };
        let config = options.resolve(vec!["/x".to_string()], Generation::Detailed);
        assert!(config.recursive);
        assert_eq!(config.debounce_ms, 125);
        assert_eq!(config.paths, vec!["/x"]);
    }
}
