//! Host-side op handlers for the watch protocol.
//!
//! The host owns the handle arena and serves the three opcodes: open
//! registers a backend stream and answers with a fresh handle id, poll
//! suspends on the stream and answers with the raw event in the active
//! generation's form, close releases the entry. [`InProcessChannel`] adapts a
//! host directly to the [`DispatchChannel`] trait so client and host can run
//! in one process without a real transport.

mod backend;
mod registry;

pub use backend::{ChannelBackend, ScriptedBackend, WatchBackend, WatchStream};
pub use registry::HandleTable;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::codec::{CanonicalEvent, EventCodec, Generation, WatchConfig};
use crate::codec::HandleArgs;
use crate::dispatch::{DispatchChannel, Opcode, TransportError};
use crate::error::{WatchError, WatchResult};

/// Serves watch protocol requests against a handle arena.
pub struct WatchHost {
    codec: &'static dyn EventCodec,
    backend: Arc<dyn WatchBackend>,
    table: HandleTable,
}

impl WatchHost {
    pub fn new(generation: Generation, backend: Arc<dyn WatchBackend>) -> Self {
        Self {
            codec: generation.codec(),
            backend,
            table: HandleTable::new(),
        }
    }

    pub fn table(&self) -> &HandleTable {
        &self.table
    }

    /// Handle an operation arriving on the blocking call path.
    pub fn handle_sync(&self, opcode: Opcode, payload: Value) -> WatchResult<Value> {
        match opcode {
            Opcode::OpenWatcher => self.op_open(payload),
            Opcode::CloseWatcher => self.op_close(payload),
            Opcode::PollWatcher => Err(WatchError::UnexpectedResponseType {
                opcode: "pollWatcher",
                reason: "poll requires the suspending call path".to_string(),
            }),
        }
    }

    /// Handle an operation arriving on the suspending call path.
    pub async fn handle_async(&self, opcode: Opcode, payload: Value) -> WatchResult<Value> {
        match opcode {
            Opcode::PollWatcher => self.op_poll(payload).await,
            other => self.handle_sync(other, payload),
        }
    }

    fn op_open(&self, payload: Value) -> WatchResult<Value> {
        let config: WatchConfig = parse_args(Opcode::OpenWatcher, payload)?;
        tracing::debug!(
            "[host] open: {} paths, debounceMs={}",
            config.paths.len(),
            config.debounce_ms
        );
        let stream = self.backend.open(&config)?;
        let rid = self.table.insert(stream);
        Ok(serde_json::json!({ "rid": rid }))
    }

    async fn op_poll(&self, payload: Value) -> WatchResult<Value> {
        let args: HandleArgs = parse_args(Opcode::PollWatcher, payload)?;
        let (events, cancel) = self.table.poll_parts(args.rid)?;

        let mut events = events.lock().await;
        let event = tokio::select! {
            _ = cancel.cancelled() => CanonicalEvent::closed(),
            received = events.recv() => match received {
                Some(event) => event,
                // Stream ended: the backend went away.
                None => CanonicalEvent::closed(),
            },
        };
        tracing::trace!("[host] poll {}: {:?}", args.rid, event.kind);
        self.codec.encode_event(&event)
    }

    fn op_close(&self, payload: Value) -> WatchResult<Value> {
        let args: HandleArgs = parse_args(Opcode::CloseWatcher, payload)?;
        self.table.close(args.rid)?;
        Ok(Value::Null)
    }
}

fn parse_args<T: serde::de::DeserializeOwned>(opcode: Opcode, payload: Value) -> WatchResult<T> {
    serde_json::from_value(payload).map_err(|e| {
        WatchError::Transport(TransportError::MalformedFrame {
            opcode: opcode.name(),
            reason: e.to_string(),
        })
    })
}

/// Dispatch channel that routes straight into an in-process host.
///
/// Host op failures that are not transport failures surface as
/// `TransportError::Remote`, mirroring how a real dispatch layer carries op
/// errors back to the requesting side.
pub struct InProcessChannel {
    host: Arc<WatchHost>,
}

impl InProcessChannel {
    pub fn new(host: Arc<WatchHost>) -> Self {
        Self { host }
    }
}

fn to_transport(err: WatchError) -> TransportError {
    match err {
        WatchError::Transport(transport) => transport,
        other => TransportError::Remote {
            message: other.to_string(),
        },
    }
}

#[async_trait]
impl DispatchChannel for InProcessChannel {
    fn send_sync(&self, opcode: Opcode, payload: Value) -> Result<Value, TransportError> {
        self.host.handle_sync(opcode, payload).map_err(to_transport)
    }

    async fn send_async(&self, opcode: Opcode, payload: Value) -> Result<Value, TransportError> {
        self.host
            .handle_async(opcode, payload)
            .await
            .map_err(to_transport)
    }
}
