//! Read-only lookups over a [`ClientState`] snapshot.
//!
//! Lookups on a channel the client has no record of return `None`, which
//! is distinct from a known channel with an empty field (`Some("")`).

use crate::channel::ChannelRecord;
use crate::client::ClientState;
use crate::event::Status;

impl ClientState {
    /// The record for `chan`, if one exists.
    pub fn channel(&self, chan: &str) -> Option<&ChannelRecord> {
        self.channels.get(chan)
    }

    /// Every channel record, joined or not, by name.
    pub fn channels(&self) -> impl Iterator<Item = (&str, &ChannelRecord)> {
        self.channels.iter().map(|(name, record)| (name.as_str(), record))
    }

    /// Only the channels the client is currently in.
    pub fn joined_channels(&self) -> impl Iterator<Item = (&str, &ChannelRecord)> {
        self.channels().filter(|(_, record)| record.joined)
    }

    /// True if the client is currently in `chan`.
    pub fn is_in_channel(&self, chan: &str) -> bool {
        self.channel(chan).is_some_and(|record| record.joined)
    }

    /// Topic of `chan`.
    pub fn topic(&self, chan: &str) -> Option<&str> {
        self.channel(chan).map(|record| record.topic.as_str())
    }

    /// Mode letters set on `chan`.
    pub fn modes(&self, chan: &str) -> Option<&[char]> {
        self.channel(chan).map(|record| record.modes.as_slice())
    }

    /// Nicknames in `chan`, sorted.
    pub fn members(&self, chan: &str) -> Option<Vec<&str>> {
        self.channel(chan)
            .map(|record| record.member_names().collect())
    }

    /// Status of `nick` in `chan`.
    ///
    /// Returns `None` if the channel is unknown or `nick` is not in it,
    /// `Some(None)` for an ordinary member and `Some(Some(symbol))` for a
    /// ranked one.
    pub fn member_status(&self, chan: &str, nick: &str) -> Option<Status> {
        self.channel(chan)?.member_status(nick)
    }

    /// Names of the channels whose member list contains `nick`.
    pub fn channels_with_member(&self, nick: &str) -> Vec<&str> {
        self.channels()
            .filter(|(_, record)| record.members.contains_key(nick))
            .map(|(name, _)| name)
            .collect()
    }
}
