//! Per-channel state and its transition function.
//!
//! A channel is either absent (no record) or present. Only the local
//! client joining a channel creates a record; leaving, being kicked or
//! disconnecting resets it in place with `joined = false`, and the record
//! stays until it is explicitly removed.
//!
//! Transitions are pure: [`ChannelRecord::apply`] borrows the current
//! record and returns the next one. The capability set is passed in by
//! the caller so status-mode letters can be resolved to symbols.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{debug, trace, warn};

use crate::error::{Result, StateError};
use crate::event::{Event, Origin, Status};
use crate::isupport::CapabilitySet;

/// What the client knows about one channel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChannelRecord {
    /// Whether the local client is currently in the channel.
    pub joined: bool,
    /// Topic text, empty if unset.
    pub topic: String,
    /// Hostmask of whoever set the topic, empty if unknown.
    pub topic_setter: String,
    /// When the topic was set.
    pub topic_time: Option<DateTime<Utc>>,
    /// Channel mode letters in the order they were set. Not deduplicated.
    pub modes: Vec<char>,
    /// Members and their status symbols.
    pub members: BTreeMap<String, Status>,
}

impl ChannelRecord {
    /// A freshly joined channel whose only known member is `nick`.
    pub fn joined_by(nick: &str) -> Self {
        let mut members = BTreeMap::new();
        members.insert(nick.to_string(), None);
        Self {
            joined: true,
            members,
            ..Self::default()
        }
    }

    /// Construct a record from the event that creates it.
    ///
    /// Only a local join may do this; anything else is a caller bug.
    pub fn create(chan: &str, event: &Event) -> Result<Self> {
        match event {
            Event::Join {
                nick,
                origin: Origin::Local,
                ..
            } => {
                debug!(channel = %chan, nick = %nick, "Creating channel record on self join");
                Ok(Self::joined_by(nick))
            }
            other => Err(StateError::ImplicitChannel {
                channel: chan.to_string(),
                event: other.kind(),
            }),
        }
    }

    /// Parted state: every field cleared, `joined = false`.
    pub fn parted() -> Self {
        Self::default()
    }

    /// Apply one event to this record and return the next record.
    ///
    /// Events that do not concern channel state return an identical copy.
    pub fn apply(&self, chan: &str, event: &Event, caps: &CapabilitySet) -> Self {
        match event {
            Event::Join {
                nick,
                origin: Origin::Local,
                ..
            } => {
                debug!(channel = %chan, nick = %nick, "Self join, resetting channel record");
                Self::joined_by(nick)
            }
            Event::Join { nick, .. } => {
                trace!(channel = %chan, nick = %nick, "Member joined");
                let mut next = self.clone();
                next.members.insert(nick.clone(), None);
                next
            }
            Event::Leave {
                origin: Origin::Local,
                ..
            } => {
                debug!(channel = %chan, "Self leave, resetting channel record");
                Self::parted()
            }
            Event::Leave { nick, .. } | Event::Quit { nick } => self.without_member(chan, nick),
            Event::Disconnect => {
                debug!(channel = %chan, "Disconnected, resetting channel record");
                Self::parted()
            }
            Event::Topic { text, .. } => Self {
                topic: text.clone(),
                ..self.clone()
            },
            Event::TopicWho { hostmask, time, .. } => Self {
                topic_setter: hostmask.clone(),
                topic_time: Some(*time),
                ..self.clone()
            },
            Event::Names { names, .. } => Self {
                members: names.clone(),
                ..self.clone()
            },
            Event::NickChange { old, new } => {
                let Some(&status) = self.members.get(old) else {
                    return self.clone();
                };
                trace!(channel = %chan, old = %old, new = %new, "Member changed nick");
                let mut next = self.clone();
                next.members.remove(old);
                next.members.insert(new.clone(), status);
                next
            }
            Event::AddMode { letter, param, .. } => {
                self.with_mode(chan, *letter, param.as_deref(), true, caps)
            }
            Event::RemoveMode { letter, param, .. } => {
                self.with_mode(chan, *letter, param.as_deref(), false, caps)
            }
            Event::Connecting | Event::Connect | Event::Isupport { .. } => self.clone(),
        }
    }

    fn without_member(&self, chan: &str, nick: &str) -> Self {
        if !self.members.contains_key(nick) {
            return self.clone();
        }
        trace!(channel = %chan, nick = %nick, "Member left");
        let mut next = self.clone();
        next.members.remove(nick);
        next
    }

    fn with_mode(
        &self,
        chan: &str,
        letter: char,
        param: Option<&str>,
        set: bool,
        caps: &CapabilitySet,
    ) -> Self {
        let mut next = self.clone();

        if let Some(symbol) = caps.prefix_for_mode(letter) {
            let Some(nick) = param else {
                warn!(channel = %chan, mode = %letter, "Status mode without a target nick");
                return next;
            };
            let status = if set { Some(symbol) } else { None };
            trace!(channel = %chan, nick = %nick, status = ?status, "Member status changed");
            next.members.insert(nick.to_string(), status);
            return next;
        }

        if caps.chanmodes.classify(letter).is_none() {
            debug!(channel = %chan, mode = %letter, "Mode not classified by CHANMODES");
        }
        if set {
            next.modes.push(letter);
        } else {
            next.modes.retain(|&m| m != letter);
        }
        next
    }

    /// Member nicknames in sorted order.
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    /// Status of `nick`: `None` if not a member, `Some(None)` for an
    /// ordinary member, `Some(Some(symbol))` otherwise.
    pub fn member_status(&self, nick: &str) -> Option<Status> {
        self.members.get(nick).copied()
    }
}

/// Run one transition for the channel named `chan`.
///
/// `current` is `None` when no record exists; in that case only a local
/// join is accepted and any other event is a [`StateError::ImplicitChannel`].
pub fn transition(
    chan: &str,
    current: Option<&ChannelRecord>,
    event: &Event,
    caps: &CapabilitySet,
) -> Result<ChannelRecord> {
    match current {
        Some(record) => Ok(record.apply(chan, event, caps)),
        None => ChannelRecord::create(chan, event),
    }
}
