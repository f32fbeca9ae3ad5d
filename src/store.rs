//! Snapshot store and observer hooks.
//!
//! [`StateStore`] owns the current [`ClientState`] behind an `Arc` and
//! replaces it on every dispatched event. Snapshots handed out earlier
//! stay valid and unchanged.

use std::sync::Arc;

use tracing::debug;

use crate::client::ClientState;
use crate::error::Result;
use crate::event::Event;

/// Trait for observing state changes.
///
/// Methods are called by [`StateStore`] after each successful dispatch.
pub trait StateObserver: Send + Sync {
    /// Called after `event` produced the snapshot `state`.
    fn on_event(&self, event: &Event, state: &ClientState) {
        let _ = (event, state);
    }

    /// Called before a quit is applied, with the channels the quitting
    /// nick was a member of.
    fn on_quit(&self, nick: &str, channels: &[String]) {
        let _ = (nick, channels);
    }
}

/// Holder of the current snapshot for one connection session.
#[derive(Default)]
pub struct StateStore {
    current: Arc<ClientState>,
    observers: Vec<Arc<dyn StateObserver>>,
}

impl StateStore {
    /// Store with a fresh default state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with an existing snapshot.
    pub fn with_state(state: ClientState) -> Self {
        Self {
            current: Arc::new(state),
            observers: Vec::new(),
        }
    }

    /// The current snapshot.
    pub fn state(&self) -> Arc<ClientState> {
        Arc::clone(&self.current)
    }

    /// Register an observer.
    pub fn subscribe(&mut self, observer: Arc<dyn StateObserver>) {
        self.observers.push(observer);
    }

    /// Apply `event` and make the result the current snapshot.
    ///
    /// On error the current snapshot is kept and no observer is called.
    pub fn dispatch(&mut self, event: &Event) -> Result<Arc<ClientState>> {
        if let Event::Quit { nick } = event {
            let channels: Vec<String> = self
                .current
                .channels_with_member(nick)
                .into_iter()
                .map(String::from)
                .collect();
            debug!(nick = %nick, channels = ?channels, "User quit");
            for observer in &self.observers {
                observer.on_quit(nick, &channels);
            }
        }

        let next = Arc::new(self.current.apply(event)?);
        self.current = Arc::clone(&next);
        for observer in &self.observers {
            observer.on_event(event, &next);
        }
        Ok(next)
    }

    /// Remove a parted channel's record.
    pub fn remove_channel(&mut self, chan: &str) -> Result<Arc<ClientState>> {
        let next = Arc::new(self.current.remove_channel(chan)?);
        self.current = Arc::clone(&next);
        Ok(next)
    }

    /// Replace the state with a fresh default, as on re-initialization.
    pub fn reset(&mut self) -> Arc<ClientState> {
        debug!("Resetting client state");
        self.current = Arc::new(ClientState::new());
        Arc::clone(&self.current)
    }
}

impl std::fmt::Debug for StateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStore")
            .field("current", &self.current)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StateError;
    use crate::event::Origin;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<&'static str>>,
        quits: Mutex<Vec<(String, Vec<String>)>>,
    }

    impl StateObserver for Recorder {
        fn on_event(&self, event: &Event, _state: &ClientState) {
            self.events.lock().unwrap().push(event.kind());
        }

        fn on_quit(&self, nick: &str, channels: &[String]) {
            self.quits
                .lock()
                .unwrap()
                .push((nick.to_string(), channels.to_vec()));
        }
    }

    fn join(chan: &str, nick: &str, origin: Origin) -> Event {
        Event::Join {
            chan: chan.to_string(),
            nick: nick.to_string(),
            origin,
        }
    }

    #[test]
    fn dispatch_swaps_snapshot() {
        let mut store = StateStore::new();
        let before = store.state();
        let after = store.dispatch(&join("#a", "me", Origin::Local)).unwrap();
        assert!(before.channel("#a").is_none());
        assert!(after.is_in_channel("#a"));
        assert!(Arc::ptr_eq(&after, &store.state()));
    }

    #[test]
    fn observers_see_events_and_quit_channels() {
        let recorder = Arc::new(Recorder::default());
        let mut store = StateStore::new();
        store.subscribe(recorder.clone());

        for event in [
            join("#a", "me", Origin::Local),
            join("#b", "me", Origin::Local),
            join("#c", "me", Origin::Local),
            join("#a", "bob", Origin::Remote),
            join("#c", "bob", Origin::Remote),
            Event::Quit {
                nick: "bob".to_string(),
            },
        ] {
            store.dispatch(&event).unwrap();
        }

        assert_eq!(recorder.events.lock().unwrap().len(), 6);
        let quits = recorder.quits.lock().unwrap();
        assert_eq!(
            *quits,
            vec![(
                "bob".to_string(),
                vec!["#a".to_string(), "#c".to_string()]
            )]
        );
        assert!(store.state().channels_with_member("bob").is_empty());
    }

    #[test]
    fn failed_remove_keeps_snapshot() {
        let mut store = StateStore::new();
        store.dispatch(&join("#a", "me", Origin::Local)).unwrap();
        let before = store.state();
        assert_eq!(
            store.remove_channel("#a").unwrap_err(),
            StateError::ChannelStillJoined("#a".to_string())
        );
        assert!(Arc::ptr_eq(&before, &store.state()));
    }

    #[test]
    fn reset_restores_default() {
        let mut store = StateStore::new();
        store.dispatch(&Event::Connect).unwrap();
        store.dispatch(&join("#a", "me", Origin::Local)).unwrap();
        let state = store.reset();
        assert_eq!(*state, ClientState::new());
    }
}
