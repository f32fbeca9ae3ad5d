//! Error types for client state derivation.
//!
//! Only contract violations against this crate's own invariants are
//! errors. Malformed data coming from the server (a broken `PREFIX`
//! value, a `CHANMODES` token with the wrong number of groups, a mode
//! letter nobody classified) is logged and tolerated instead.

use thiserror::Error;

/// Convenience type alias for Results using [`StateError`].
pub type Result<T, E = StateError> = std::result::Result<T, E>;

/// Contract violations raised by the state machine.
///
/// These are caller errors: retrying the same input without fixing the
/// precondition fails the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum StateError {
    /// A channel record would have been created by something other than
    /// the local user joining it.
    #[error("cannot create state for {channel} from a {event} event")]
    ImplicitChannel {
        /// Channel the event referenced.
        channel: String,
        /// Kind of the offending event.
        event: &'static str,
    },

    /// `remove_channel` was called while the local user is still joined.
    #[error("cannot remove {0}: channel is still joined")]
    ChannelStillJoined(String),
}

impl StateError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ImplicitChannel { .. } => "implicit_channel",
            Self::ChannelStillJoined(_) => "channel_still_joined",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
