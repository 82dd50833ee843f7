//! Filesystem change notifications for sandboxed runtimes, exposed as
//! resource handles polled over a generic dispatch channel.
//!
//! One canonical event model absorbs three incompatible wire-schema
//! generations; per-generation codecs keep raw enums from leaking past the
//! codec boundary.

pub mod client;
pub mod codec;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod host;
pub mod logging;

pub use client::{
    EventPoller, PollOutcome, WatchClient, WatchOptions, WatchPaths, WatchSession, watch,
    watch_with_settings,
};
pub use codec::{CanonicalEvent, EventCodec, EventDetail, EventKind, Generation, WatchConfig};
pub use config::Settings;
pub use dispatch::{DispatchChannel, Opcode, TransportError};
pub use error::{WatchError, WatchResult};
pub use host::{
    ChannelBackend, HandleTable, InProcessChannel, ScriptedBackend, WatchBackend, WatchHost,
    WatchStream,
};
