//! Suspending poll loop for one watch handle.
//!
//! `next()` is the single suspension point of this layer. Polls against a
//! handle are strictly serialized: a second caller queues behind the async
//! gate instead of racing two requests at the native layer. Closure is a
//! side flag (cancellation token) observed at the suspension point, never a
//! forceful interruption.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::codec::{CanonicalEvent, EventCodec};
use crate::dispatch::{DispatchChannel, Opcode};
use crate::error::WatchResult;

/// One resolved step of the iteration protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOutcome {
    pub event: CanonicalEvent,
    pub done: bool,
}

impl PollOutcome {
    /// Outcome synthesized once the session is terminal: no channel traffic,
    /// a `watcherClosed` event, `done` set.
    pub(crate) fn terminal() -> Self {
        Self {
            event: CanonicalEvent::closed(),
            done: true,
        }
    }
}

/// Iteration state machine per handle: `Idle → Polling → (Idle | Closed)`,
/// with `Closed` absorbing.
pub struct EventPoller {
    channel: Arc<dyn DispatchChannel>,
    codec: &'static dyn EventCodec,
    rid: u32,
    /// Serializes polls: at most one in flight per handle.
    gate: Mutex<()>,
    /// Set by explicit close or by observing the terminal event.
    cancel: CancellationToken,
}

impl EventPoller {
    pub fn new(
        channel: Arc<dyn DispatchChannel>,
        codec: &'static dyn EventCodec,
        rid: u32,
    ) -> Self {
        Self {
            channel,
            codec,
            rid,
            gate: Mutex::new(()),
            cancel: CancellationToken::new(),
        }
    }

    /// Ask the channel for the next event and decode it.
    ///
    /// Once terminal (closed or a `watcherClosed` event was observed), every
    /// call returns `done = true` immediately without contacting the channel
    /// — the native resource may already be released.
    pub async fn next(&self) -> WatchResult<PollOutcome> {
        if self.cancel.is_cancelled() {
            return Ok(PollOutcome::terminal());
        }

        let _in_flight = self.gate.lock().await;
        // Close may have won the race while we queued for the gate.
        if self.cancel.is_cancelled() {
            return Ok(PollOutcome::terminal());
        }

        let payload = self.codec.encode_poll(self.rid);
        tokio::select! {
            _ = self.cancel.cancelled() => {
                tracing::debug!("[poller] handle {} closed while polling", self.rid);
                Ok(PollOutcome::terminal())
            }
            response = self.channel.send_async(Opcode::PollWatcher, payload) => {
                let event = self.codec.decode_event(response?)?;
                let done = event.is_terminal();
                if done {
                    tracing::debug!("[poller] handle {} reached terminal event", self.rid);
                    self.cancel.cancel();
                } else {
                    tracing::trace!("[poller] handle {}: {:?}", self.rid, event.kind);
                }
                Ok(PollOutcome { event, done })
            }
        }
    }

    /// Force the absorbing terminal state. Idempotent.
    ///
    /// A poll suspended on the channel resolves with a terminal outcome; its
    /// in-flight transport call is simply abandoned.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_terminal(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
