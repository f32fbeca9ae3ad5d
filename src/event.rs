//! Events consumed by the state machine.
//!
//! One variant per logical action reported by the connection layer. The
//! set is closed so every transition table is checked by `match`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status symbol of a channel member. `None` is an ordinary member.
pub type Status = Option<char>;

/// Whose action an event describes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// The local client.
    Local,
    /// Some other user.
    #[default]
    Remote,
}

/// A protocol-level event, already ordered as it arrived on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    /// JOIN.
    Join {
        chan: String,
        nick: String,
        #[serde(default)]
        origin: Origin,
    },
    /// PART or KICK.
    Leave {
        chan: String,
        nick: String,
        #[serde(default)]
        origin: Origin,
    },
    /// QUIT. Carries no channel, so it is broadcast.
    Quit { nick: String },
    /// RPL_TOPIC or TOPIC.
    Topic { chan: String, text: String },
    /// RPL_TOPICWHOTIME.
    TopicWho {
        chan: String,
        hostmask: String,
        time: DateTime<Utc>,
    },
    /// A complete RPL_NAMREPLY listing.
    Names {
        chan: String,
        #[serde(with = "status_map")]
        names: BTreeMap<String, Status>,
    },
    /// NICK. Carries no channel, so it is broadcast.
    NickChange { old: String, new: String },
    /// `+letter [param]` on a channel.
    AddMode {
        chan: String,
        letter: char,
        #[serde(default)]
        param: Option<String>,
    },
    /// `-letter [param]` on a channel.
    RemoveMode {
        chan: String,
        letter: char,
        #[serde(default)]
        param: Option<String>,
    },
    /// Connection attempt started.
    Connecting,
    /// Registration completed.
    Connect,
    /// Connection lost or closed.
    Disconnect,
    /// Parameters of an RPL_ISUPPORT (005) reply, echoed nickname first.
    Isupport { tokens: Vec<String> },
}

impl Event {
    /// Short name used in logs and errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Join { .. } => "join",
            Self::Leave { .. } => "leave",
            Self::Quit { .. } => "quit",
            Self::Topic { .. } => "topic",
            Self::TopicWho { .. } => "topic_who",
            Self::Names { .. } => "names",
            Self::NickChange { .. } => "nick_change",
            Self::AddMode { .. } => "add_mode",
            Self::RemoveMode { .. } => "remove_mode",
            Self::Connecting => "connecting",
            Self::Connect => "connect",
            Self::Disconnect => "disconnect",
            Self::Isupport { .. } => "isupport",
        }
    }

    /// The channel this event targets, if any.
    ///
    /// Events without one are broadcast to every channel record.
    pub fn channel(&self) -> Option<&str> {
        match self {
            Self::Join { chan, .. }
            | Self::Leave { chan, .. }
            | Self::Topic { chan, .. }
            | Self::TopicWho { chan, .. }
            | Self::Names { chan, .. }
            | Self::AddMode { chan, .. }
            | Self::RemoveMode { chan, .. } => Some(chan),
            Self::Quit { .. }
            | Self::NickChange { .. }
            | Self::Connecting
            | Self::Connect
            | Self::Disconnect
            | Self::Isupport { .. } => None,
        }
    }

    /// True for the local client joining a channel, the only event that
    /// may create a channel record.
    pub fn is_self_join(&self) -> bool {
        matches!(
            self,
            Self::Join {
                origin: Origin::Local,
                ..
            }
        )
    }
}

/// Serializes member maps as nick -> symbol string, `""` for ordinary.
///
/// A string with several symbols (multi-prefix NAMES) keeps the first,
/// which servers send highest rank first.
mod status_map {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::Status;

    pub fn serialize<S: Serializer>(
        names: &BTreeMap<String, Status>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let raw: BTreeMap<&str, String> = names
            .iter()
            .map(|(nick, status)| (nick.as_str(), status.map(String::from).unwrap_or_default()))
            .collect();
        raw.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<String, Status>, D::Error> {
        let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .map(|(nick, symbols)| (nick, symbols.chars().next()))
            .collect())
    }
}
