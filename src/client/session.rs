//! Open protocol: configuration defaults and handle acquisition.

use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::codec::{EventCodec, Generation};
use crate::dispatch::{DispatchChannel, Opcode};
use crate::error::{WatchError, WatchResult};

use super::watch::{WatchOptions, WatchPaths};

/// Response to a successful open request.
#[derive(Debug, Deserialize)]
struct OpenResponse {
    rid: u32,
}

/// Owns the open handshake for one watch handle.
///
/// Holds no long-lived state beyond the channel and codec needed to issue
/// the request; the returned handle id belongs to the caller.
pub struct WatchSession {
    channel: Arc<dyn DispatchChannel>,
    codec: &'static dyn EventCodec,
}

impl WatchSession {
    pub fn new(channel: Arc<dyn DispatchChannel>, generation: Generation) -> Self {
        Self {
            channel,
            codec: generation.codec(),
        }
    }

    /// Send the open request over the blocking call path and return the
    /// handle id.
    ///
    /// Applies defaults the caller omitted: recursive=false, debounce = the
    /// active generation's documented default.
    pub fn open(&self, paths: WatchPaths, options: &WatchOptions) -> WatchResult<u32> {
        let config = options.resolve(paths.into_vec(), self.codec.generation());
        tracing::debug!(
            "[session] open: {} paths, recursive={}, debounceMs={}",
            config.paths.len(),
            config.recursive,
            config.debounce_ms
        );

        let response = self
            .channel
            .send_sync(Opcode::OpenWatcher, self.codec.encode_open(&config))?;
        let rid = Self::parse_open_response(response)?;

        tracing::debug!("[session] opened handle {rid}");
        Ok(rid)
    }

    fn parse_open_response(response: Value) -> WatchResult<u32> {
        let parsed: OpenResponse =
            serde_json::from_value(response).map_err(|e| WatchError::UnexpectedResponseType {
                opcode: "openWatcher",
                reason: e.to_string(),
            })?;
        Ok(parsed.rid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_the_handle_id() {
        assert_eq!(WatchSession::parse_open_response(json!({ "rid": 7 })).unwrap(), 7);
    }

    #[test]
    fn wrong_shape_is_an_unexpected_response() {
        for bad in [json!(7), json!({ "handle": 7 }), json!({ "rid": "seven" }), json!(null)] {
            let err = WatchSession::parse_open_response(bad).unwrap_err();
            assert!(matches!(
                err,
                WatchError::UnexpectedResponseType {
                    opcode: "openWatcher",
                    ..
                }
            ));
        }
    }
}
