//! Script-side watch protocol client.
//!
//! ```text
//! watch() -> WatchSession (open, blocking)
//!               |  handle id
//!               v
//!          WatchClient --> EventPoller (next, suspending) --> EventCodec
//!               \-- close (blocking, idempotent)
//! ```

mod poller;
mod session;
mod watch;

pub use poller::{EventPoller, PollOutcome};
pub use session::WatchSession;
pub use watch::{WatchClient, WatchOptions, WatchPaths};

use std::sync::Arc;

use crate::codec::Generation;
use crate::config::Settings;
use crate::dispatch::DispatchChannel;
use crate::error::WatchResult;

/// Open a watch session for a set of paths.
///
/// Convenience wrapper over [`WatchClient::open`].
pub fn watch(
    channel: Arc<dyn DispatchChannel>,
    generation: Generation,
    paths: impl Into<WatchPaths>,
    options: WatchOptions,
) -> WatchResult<WatchClient> {
    WatchClient::open(channel, generation, paths, options)
}

/// Open a watch session using the generation and overrides from settings.
pub fn watch_with_settings(
    channel: Arc<dyn DispatchChannel>,
    settings: &Settings,
    paths: impl Into<WatchPaths>,
) -> WatchResult<WatchClient> {
    WatchClient::open(
        channel,
        settings.protocol.generation,
        paths,
        settings.protocol.options(),
    )
}
