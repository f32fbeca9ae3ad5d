//! The client's accumulated view of server capabilities.

use std::collections::BTreeMap;

use super::parser::{CapabilityValue, ChanModes, IsupportUpdate, ModeClass, PrefixMap};

/// Capabilities the client currently believes the server supports.
///
/// `PREFIX` and `CHANMODES` have typed fields because the channel state
/// machine depends on them. Everything else lives in an open map so that
/// unknown tokens survive untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapabilitySet {
    /// Status mode letters and their symbols.
    pub prefix: PrefixMap,
    /// Channel mode classification.
    pub chanmodes: ChanModes,
    other: BTreeMap<String, CapabilityValue>,
}

impl Default for CapabilitySet {
    /// RFC 1459 era assumptions, used until the server says otherwise.
    fn default() -> Self {
        let mut other = BTreeMap::new();
        other.insert(
            "CHANTYPES".to_string(),
            CapabilityValue::Value("&#".to_string()),
        );
        Self {
            prefix: PrefixMap::from_pairs([('o', '@'), ('v', '+')]),
            chanmodes: ChanModes {
                a: "beI".to_string(),
                b: "k".to_string(),
                c: "l".to_string(),
                d: "aimnpqsrt".to_string(),
            },
            other,
        }
    }
}

impl CapabilitySet {
    /// Merge a parsed reply into this set.
    ///
    /// Shallow, key-by-key overwrite: announced keys replace what was
    /// there, nothing is accumulated.
    pub fn merge(&mut self, update: IsupportUpdate) {
        if let Some(prefix) = update.prefix {
            self.prefix = prefix;
        }
        if let Some(chanmodes) = update.chanmodes {
            self.chanmodes = chanmodes;
        }
        self.other.extend(update.other);
    }

    /// Return a copy of this set with `update` merged in.
    pub fn merged(&self, update: IsupportUpdate) -> Self {
        let mut next = self.clone();
        next.merge(update);
        next
    }

    /// Get an untyped capability.
    ///
    /// `PREFIX` and `CHANMODES` are not stored here; use the typed fields.
    pub fn get(&self, key: &str) -> Option<&CapabilityValue> {
        self.other.get(key)
    }

    /// True if the server announced `key` in any form.
    pub fn supports(&self, key: &str) -> bool {
        match key {
            "PREFIX" | "CHANMODES" => true,
            _ => self.other.contains_key(key),
        }
    }

    /// Iterate over untyped capabilities in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CapabilityValue)> {
        self.other.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Get the `CHANTYPES` value (e.g., `#&`).
    pub fn chantypes(&self) -> Option<&str> {
        self.get("CHANTYPES").and_then(CapabilityValue::as_str)
    }

    /// Get the `NETWORK` name.
    pub fn network(&self) -> Option<&str> {
        self.get("NETWORK").and_then(CapabilityValue::as_str)
    }

    /// True if `name` starts with one of the announced channel type characters.
    pub fn is_channel_name(&self, name: &str) -> bool {
        match (self.chantypes(), name.chars().next()) {
            (Some(types), Some(first)) => types.contains(first),
            _ => false,
        }
    }

    /// Status symbol for a membership mode letter.
    #[inline]
    pub fn prefix_for_mode(&self, mode: char) -> Option<char> {
        self.prefix.prefix_for_mode(mode)
    }

    /// Membership mode letter for a status symbol.
    #[inline]
    pub fn mode_for_prefix(&self, symbol: char) -> Option<char> {
        self.prefix.mode_for_prefix(symbol)
    }

    /// Classify a channel mode letter. Status modes win over `CHANMODES`.
    pub fn classify_mode(&self, mode: char) -> Option<ModeClass> {
        if self.prefix.is_prefix_mode(mode) {
            return Some(ModeClass::Prefix);
        }
        self.chanmodes.classify(mode)
    }
}
