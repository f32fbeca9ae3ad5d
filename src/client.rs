//! Client-wide state: connection flags, capabilities and every channel.
//!
//! [`ClientState::apply`] folds one event into a new snapshot. Events
//! naming a channel are routed to that channel's record; events without
//! one (quit, nick change, connection and capability events) are applied
//! to every record in the same step.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::channel::{transition, ChannelRecord};
use crate::error::{Result, StateError};
use crate::event::Event;
use crate::isupport::{parse_tokens, CapabilitySet};

/// Snapshot of everything the client tracks for one connection session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientState {
    /// Registration with the server completed.
    pub connected: bool,
    /// A connection attempt is in progress.
    pub connecting: bool,
    /// Capabilities announced through RPL_ISUPPORT.
    pub capabilities: CapabilitySet,
    pub(crate) channels: BTreeMap<String, ChannelRecord>,
}

impl ClientState {
    /// Fresh state for a new session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event and return the next snapshot.
    ///
    /// Fails only if a channel record would be created by something
    /// other than a self join, which routing here never does.
    pub fn apply(&self, event: &Event) -> Result<Self> {
        match event {
            Event::Isupport { tokens } => Ok(self.set_isupport(tokens)),
            Event::Connecting => Ok(self.set_connecting(true).broadcast(event)),
            Event::Connect => Ok(self
                .set_connecting(false)
                .set_connected(true)
                .broadcast(event)),
            Event::Disconnect => Ok(self.disconnect()),
            _ => match event.channel() {
                Some(chan) => self.route(chan, event),
                None => Ok(self.broadcast(event)),
            },
        }
    }

    /// Merge an RPL_ISUPPORT reply into the capability set.
    pub fn set_isupport<S: AsRef<str>>(&self, tokens: &[S]) -> Self {
        let update = parse_tokens(tokens);
        debug!(
            keys = update.other.len(),
            prefix = update.prefix.is_some(),
            chanmodes = update.chanmodes.is_some(),
            "Merging ISUPPORT"
        );
        Self {
            capabilities: self.capabilities.merged(update),
            ..self.clone()
        }
    }

    /// Set the connected flag. No ordering against `connecting` is enforced.
    pub fn set_connected(&self, connected: bool) -> Self {
        Self {
            connected,
            ..self.clone()
        }
    }

    /// Set the connecting flag.
    pub fn set_connecting(&self, connecting: bool) -> Self {
        Self {
            connecting,
            ..self.clone()
        }
    }

    /// Clear both connection flags and reset every channel record.
    pub fn disconnect(&self) -> Self {
        info!(channels = self.channels.len(), "Disconnected, resetting channel state");
        Self {
            connected: false,
            connecting: false,
            ..self.broadcast(&Event::Disconnect)
        }
    }

    /// Drop the record for `chan`.
    ///
    /// Fails while the channel is still joined. Removing an unknown
    /// channel is a no-op.
    pub fn remove_channel(&self, chan: &str) -> Result<Self> {
        match self.channels.get(chan) {
            Some(record) if record.joined => {
                Err(StateError::ChannelStillJoined(chan.to_string()))
            }
            Some(_) => {
                debug!(channel = %chan, "Removing channel record");
                let mut next = self.clone();
                next.channels.remove(chan);
                Ok(next)
            }
            None => Ok(self.clone()),
        }
    }

    fn route(&self, chan: &str, event: &Event) -> Result<Self> {
        let current = self.channels.get(chan);
        if current.is_none() && !event.is_self_join() {
            debug!(channel = %chan, event = event.kind(), "Ignoring event for unknown channel");
            return Ok(self.clone());
        }

        let record = transition(chan, current, event, &self.capabilities)?;
        let mut next = self.clone();
        next.channels.insert(chan.to_string(), record);
        Ok(next)
    }

    fn broadcast(&self, event: &Event) -> Self {
        let channels = self
            .channels
            .iter()
            .map(|(name, record)| {
                (
                    name.clone(),
                    record.apply(name, event, &self.capabilities),
                )
            })
            .collect();
        Self {
            channels,
            ..self.clone()
        }
    }
}
