//! # slirc-state
//!
//! Client-side IRC state derivation. Feed it the events a connection
//! layer produces (joins, parts, topic and mode changes, RPL_ISUPPORT
//! replies) and it maintains a consistent snapshot of every channel the
//! client knows about.
//!
//! ## Features
//!
//! - ISUPPORT (RPL_ISUPPORT / 005) parsing with typed `PREFIX` and `CHANMODES`
//! - Pure per-channel transition function
//! - Client-wide aggregation with broadcast of channel-less events
//! - Immutable snapshots behind a small observer-aware store
//!
//! No I/O happens here.
//!
//! ## Quick Start
//!
//! ```rust
//! use slirc_state::{ClientState, Event, Origin};
//!
//! let state = ClientState::new()
//!     .apply(&Event::Join {
//!         chan: "#rust".to_string(),
//!         nick: "me".to_string(),
//!         origin: Origin::Local,
//!     })
//!     .unwrap()
//!     .apply(&Event::AddMode {
//!         chan: "#rust".to_string(),
//!         letter: 'o',
//!         param: Some("me".to_string()),
//!     })
//!     .unwrap();
//!
//! assert!(state.is_in_channel("#rust"));
//! assert_eq!(state.member_status("#rust", "me"), Some(Some('@')));
//! ```

#![deny(clippy::all)]

pub mod channel;
pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod isupport;
pub mod query;
pub mod store;

pub use self::channel::{transition, ChannelRecord};
pub use self::client::ClientState;
pub use self::config::ReplayConfig;
pub use self::error::{ConfigError, Result, StateError};
pub use self::event::{Event, Origin, Status};
pub use self::isupport::{
    parse_tokens, CapabilitySet, CapabilityValue, ChanModes, IsupportUpdate, ModeClass, PrefixMap,
};
pub use self::store::{StateObserver, StateStore};
