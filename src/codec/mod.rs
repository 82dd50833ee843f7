//! Per-generation event codecs over one canonical model.
//!
//! Three incompatible wire-schema generations describe the same concept. Each
//! gets its own codec behind the `EventCodec` trait; the rest of the crate
//! only ever consumes `CanonicalEvent`. The codec is selected once, at
//! session-open time, and raw generation codes never cross this boundary.

mod detailed;
mod event;
mod legacy;
mod untyped;

pub use detailed::DetailedCodec;
pub use event::{CanonicalEvent, EventDetail, EventKind};
pub use legacy::LegacyCodec;
pub use untyped::UntypedCodec;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::WatchResult;

/// A wire-schema generation this protocol interoperates with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Generation {
    /// Binary-framed schema with the 9-value numeric event taxonomy.
    Legacy,
    /// Later binary schema with the richer type+detail taxonomy.
    Detailed,
    /// JSON-message schema with an open string kind (weaker contract).
    Json,
}

impl Generation {
    /// Default debounce window sent when the caller omits one.
    ///
    /// Part of the wire contract: the detailed generation changed the
    /// default, the others kept 500 ms.
    pub fn default_debounce_ms(self) -> u64 {
        match self {
            Generation::Legacy | Generation::Json => 500,
            Generation::Detailed => 2000,
        }
    }

    /// The codec implementing this generation's raw representation.
    pub fn codec(self) -> &'static dyn EventCodec {
        match self {
            Generation::Legacy => &LegacyCodec,
            Generation::Detailed => &DetailedCodec,
            Generation::Json => &UntypedCodec,
        }
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Generation::Legacy => "legacy",
            Generation::Detailed => "detailed",
            Generation::Json => "json",
        };
        f.write_str(name)
    }
}

/// Fully resolved watch configuration as sent in the open request.
///
/// Field names are the wire contract shared by every generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchConfig {
    pub paths: Vec<String>,
    pub recursive: bool,
    pub debounce_ms: u64,
}

/// Pure mapping between a generation's raw wire forms and the canonical
/// model.
///
/// Decode must be exhaustive for the strict generations: every known raw
/// code maps to exactly one canonical value, and anything outside the set is
/// `WatchError::UnknownEventCode`. Encoding an event the generation cannot
/// express fails the same way, keeping the mapping total in both directions.
pub trait EventCodec: Send + Sync {
    /// The generation this codec speaks.
    fn generation(&self) -> Generation;

    /// Encode the open request payload.
    fn encode_open(&self, config: &WatchConfig) -> Value;

    /// Encode the poll request payload for a handle.
    fn encode_poll(&self, rid: u32) -> Value;

    /// Encode the close request payload for a handle.
    fn encode_close(&self, rid: u32) -> Value;

    /// Decode a raw poll response into the canonical model.
    fn decode_event(&self, raw: Value) -> WatchResult<CanonicalEvent>;

    /// Encode a canonical event into this generation's raw form.
    fn encode_event(&self, event: &CanonicalEvent) -> WatchResult<Value>;
}

/// Handle-bearing request body shared by poll and close.
#[derive(Debug, Deserialize)]
pub(crate) struct HandleArgs {
    pub rid: u32,
}

pub(crate) fn handle_payload(rid: u32) -> Value {
    serde_json::json!({ "rid": rid })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debounce_defaults_follow_the_generation() {
        assert_eq!(Generation::Legacy.default_debounce_ms(), 500);
        assert_eq!(Generation::Detailed.default_debounce_ms(), 2000);
        assert_eq!(Generation::Json.default_debounce_ms(), 500);
    }

    #[test]
    fn codec_lookup_matches_generation() {
        for generation in [Generation::Legacy, Generation::Detailed, Generation::Json] {
            assert_eq!(generation.codec().generation(), generation);
        }
    }

    #[test]
    fn generation_parses_from_config_strings() {
        let generation: Generation = serde_json::from_value(serde_json::json!("detailed")).unwrap();
        assert_eq!(generation, Generation::Detailed);
    }

    #[test]
    fn watch_config_uses_camel_case_on_the_wire() {
        let config = WatchConfig {
            paths: vec!["/tmp/a".to_string()],
            recursive: true,
            debounce_ms: 750,
        };
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["debounceMs"], 750);
        assert_eq!(value["recursive"], true);
        assert_eq!(value["paths"][0], "/tmp/a");
    }
}
