//! Error types for the watch protocol.

use thiserror::Error;

use crate::codec::Generation;
use crate::dispatch::TransportError;

/// Errors surfaced by watch protocol operations.
///
/// This layer performs no retries: open, poll, and close are each attempted
/// exactly once per caller invocation, and every failure propagates. The only
/// locally-absorbed conditions are the idempotent no-op on repeated `close()`
/// and the terminal short-circuit on `next()` after close, both of which are
/// contract guarantees rather than suppressed errors.
#[derive(Error, Debug)]
pub enum WatchError {
    /// The dispatch channel itself failed.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// A response arrived but its shape does not match the requesting
    /// operation. Protocol desynchronization is fatal for that call.
    #[error("unexpected response for {opcode}: {reason}")]
    UnexpectedResponseType { opcode: &'static str, reason: String },

    /// A raw event code outside the active generation's known set.
    ///
    /// Treated as a version-mismatch programming error, never mapped to a
    /// best-guess default.
    #[error("unknown event code {code:?} in {generation} schema")]
    UnknownEventCode { generation: Generation, code: String },

    /// Operation against a handle that is already terminal or was never
    /// successfully opened.
    #[error("invalid watch handle {rid}: {reason}")]
    InvalidHandle { rid: u32, reason: &'static str },
}

pub type WatchResult<T> = Result<T, WatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_convert() {
        let err: WatchError = TransportError::ChannelClosed.into();
        assert!(matches!(err, WatchError::Transport(_)));
    }

    #[test]
    fn unknown_code_names_the_generation() {
        let err = WatchError::UnknownEventCode {
            generation: Generation::Legacy,
            code: "11".to_string(),
        };
        assert_eq!(err.to_string(), "unknown event code \"11\" in legacy schema");
    }
}
