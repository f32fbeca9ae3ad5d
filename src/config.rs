//! Configuration for the replay tool.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::event::Event;

/// Replay configuration, loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayConfig {
    /// Nickname of the local client.
    pub nickname: String,
    /// Log filter used when `RUST_LOG` is unset (e.g., "debug").
    #[serde(default)]
    pub log_level: Option<String>,
    /// RPL_ISUPPORT parameters applied before any event, nickname first.
    #[serde(default)]
    pub isupport: Vec<String>,
    /// Optional file holding further `[[event]]` entries.
    #[serde(default)]
    pub script: Option<PathBuf>,
    /// Inline events, applied before the script file.
    #[serde(default, rename = "event")]
    pub events: Vec<Event>,
}

/// Contents of a standalone event script.
#[derive(Debug, Clone, Default, Deserialize)]
struct Script {
    #[serde(default)]
    event: Vec<Event>,
}

impl ReplayConfig {
    /// Load configuration from a TOML file.
    ///
    /// A relative `script` path is resolved against the config file's
    /// directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config: ReplayConfig = toml::from_str(&content)?;
        if let Some(script) = config.script.as_mut() {
            if script.is_relative() {
                if let Some(dir) = path.parent() {
                    *script = dir.join(&*script);
                }
            }
        }
        Ok(config)
    }

    /// Every event to replay: inline events, then the script file's.
    pub fn all_events(&self) -> Result<Vec<Event>, ConfigError> {
        let mut events = self.events.clone();
        if let Some(path) = &self.script {
            let content = std::fs::read_to_string(path)?;
            let script: Script = toml::from_str(&content)?;
            events.extend(script.event);
        }
        Ok(events)
    }
}
