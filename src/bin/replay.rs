//! slirc-replay - replay an IRC event script through the state engine.
//!
//! Usage: `slirc-replay [config.toml]`

use anyhow::Context;
use slirc_state::{Event, ReplayConfig, StateStore};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "replay.toml".to_string());

    let config = ReplayConfig::load(&config_path)
        .with_context(|| format!("failed to load {}", config_path))?;

    let default_filter = config.log_level.as_deref().unwrap_or("info");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(true)
        .init();

    let events = config.all_events().map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load event script");
        e
    })?;

    info!(
        nickname = %config.nickname,
        events = events.len(),
        "Replaying event script"
    );

    let mut store = StateStore::new();
    if !config.isupport.is_empty() {
        store.dispatch(&Event::Isupport {
            tokens: config.isupport.clone(),
        })?;
    }

    for (index, event) in events.iter().enumerate() {
        store.dispatch(event).map_err(|e| {
            error!(index, kind = event.kind(), code = e.error_code(), "Replay aborted");
            e
        })?;
    }

    let state = store.state();
    info!(
        connected = state.connected,
        connecting = state.connecting,
        network = state.capabilities.network().unwrap_or("-"),
        "Replay finished"
    );

    for (name, record) in state.channels() {
        let members: Vec<String> = record
            .members
            .iter()
            .map(|(nick, status)| match status {
                Some(symbol) => format!("{}{}", symbol, nick),
                None => nick.clone(),
            })
            .collect();
        let modes: String = record.modes.iter().collect();
        let own_status = match record.member_status(&config.nickname) {
            Some(Some(symbol)) => symbol.to_string(),
            Some(None) => "member".to_string(),
            None => "absent".to_string(),
        };
        info!(
            channel = %name,
            joined = record.joined,
            own_status = %own_status,
            topic = %record.topic,
            modes = %modes,
            members = %members.join(" "),
            "Channel"
        );
    }

    Ok(())
}
