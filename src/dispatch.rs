//! Transport boundary for the watch protocol.
//!
//! The dispatch channel is an external collaborator: it owns message framing,
//! serialization, and the synchronous vs. suspending call semantics. This
//! layer only hands it an opcode plus a logical payload and reads back a
//! logical response. Payloads are `serde_json::Value` documents; whether the
//! transport frames them as binary or structured text is its own business.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Operation identifiers multiplexed over the shared transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    OpenWatcher,
    PollWatcher,
    CloseWatcher,
}

impl Opcode {
    /// Stable wire name, used in logs and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Opcode::OpenWatcher => "openWatcher",
            Opcode::PollWatcher => "pollWatcher",
            Opcode::CloseWatcher => "closeWatcher",
        }
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Failures of the dispatch channel itself.
///
/// Not recoverable by the watch layer; always propagated to the caller.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("dispatch connection lost: {reason}")]
    ConnectionLost { reason: String },

    #[error("malformed frame for {opcode}: {reason}")]
    MalformedFrame { opcode: &'static str, reason: String },

    #[error("dispatch channel closed")]
    ChannelClosed,

    #[error("remote operation failed: {message}")]
    Remote { message: String },
}

/// Generic request/response dispatch consumed by the watch protocol.
///
/// `send_sync` blocks the caller's step without yielding; `send_async` is the
/// single suspension point of this layer. Implementations are shared
/// process-wide; the watch layer never mutates the channel beyond issuing
/// requests.
#[async_trait]
pub trait DispatchChannel: Send + Sync {
    /// Blocking call: returns the response payload or a transport failure.
    fn send_sync(&self, opcode: Opcode, payload: Value) -> Result<Value, TransportError>;

    /// Suspending call: resolves with the response payload exactly once.
    async fn send_async(&self, opcode: Opcode, payload: Value) -> Result<Value, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_names_are_stable() {
        assert_eq!(Opcode::OpenWatcher.name(), "openWatcher");
        assert_eq!(Opcode::PollWatcher.name(), "pollWatcher");
        assert_eq!(Opcode::CloseWatcher.name(), "closeWatcher");
    }

    #[test]
    fn transport_errors_render_reason() {
        let err = TransportError::MalformedFrame {
            opcode: Opcode::PollWatcher.name(),
            reason: "truncated".to_string(),
        };
        assert_eq!(err.to_string(), "malformed frame for pollWatcher: truncated");
    }
}
