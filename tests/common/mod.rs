//! Integration test common infrastructure.
//!
//! Provides event constructors and a small session wrapper that folds
//! events into a [`ClientState`] and fails the test on contract errors.

#![allow(dead_code)]

use std::collections::BTreeMap;

use slirc_state::{ClientState, Event, Origin, Status};

/// Folds events into a snapshot, keeping the history of snapshots.
pub struct TestSession {
    pub nick: String,
    pub history: Vec<ClientState>,
}

impl TestSession {
    pub fn new(nick: &str) -> Self {
        Self {
            nick: nick.to_string(),
            history: vec![ClientState::new()],
        }
    }

    pub fn state(&self) -> &ClientState {
        self.history.last().expect("history is never empty")
    }

    pub fn apply(&mut self, event: Event) -> &ClientState {
        let next = self
            .state()
            .apply(&event)
            .unwrap_or_else(|e| panic!("{} event failed: {}", event.kind(), e));
        self.history.push(next);
        self.state()
    }

    pub fn apply_all(&mut self, events: impl IntoIterator<Item = Event>) -> &ClientState {
        for event in events {
            self.apply(event);
        }
        self.state()
    }

    pub fn self_join(&mut self, chan: &str) -> &ClientState {
        let nick = self.nick.clone();
        self.apply(join(chan, &nick, Origin::Local))
    }

    pub fn self_leave(&mut self, chan: &str) -> &ClientState {
        let nick = self.nick.clone();
        self.apply(leave(chan, &nick, Origin::Local))
    }
}

pub fn join(chan: &str, nick: &str, origin: Origin) -> Event {
    Event::Join {
        chan: chan.to_string(),
        nick: nick.to_string(),
        origin,
    }
}

pub fn leave(chan: &str, nick: &str, origin: Origin) -> Event {
    Event::Leave {
        chan: chan.to_string(),
        nick: nick.to_string(),
        origin,
    }
}

pub fn quit(nick: &str) -> Event {
    Event::Quit {
        nick: nick.to_string(),
    }
}

pub fn topic(chan: &str, text: &str) -> Event {
    Event::Topic {
        chan: chan.to_string(),
        text: text.to_string(),
    }
}

pub fn names(chan: &str, entries: &[(&str, Status)]) -> Event {
    Event::Names {
        chan: chan.to_string(),
        names: name_map(entries),
    }
}

pub fn name_map(entries: &[(&str, Status)]) -> BTreeMap<String, Status> {
    entries
        .iter()
        .map(|(nick, status)| (nick.to_string(), *status))
        .collect()
}

pub fn add_mode(chan: &str, letter: char, param: Option<&str>) -> Event {
    Event::AddMode {
        chan: chan.to_string(),
        letter,
        param: param.map(String::from),
    }
}

pub fn remove_mode(chan: &str, letter: char, param: Option<&str>) -> Event {
    Event::RemoveMode {
        chan: chan.to_string(),
        letter,
        param: param.map(String::from),
    }
}

pub fn isupport(tokens: &[&str]) -> Event {
    Event::Isupport {
        tokens: tokens.iter().map(|t| t.to_string()).collect(),
    }
}
