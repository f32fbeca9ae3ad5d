//! ISUPPORT token grammar.

use std::collections::BTreeMap;

use tracing::warn;

/// Value of an ISUPPORT token that has no dedicated structure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CapabilityValue {
    /// Bare token (e.g., `EXCEPTS`): the feature is supported.
    Enabled,
    /// `KEY=VALUE` token, value kept verbatim.
    Value(String),
}

impl CapabilityValue {
    /// The raw value, if the token carried one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Enabled => None,
            Self::Value(v) => Some(v),
        }
    }
}

/// Parsed `PREFIX` token.
///
/// Ordered mapping from channel membership mode letters (`o`, `v`) to
/// their status symbols (`@`, `+`), highest rank first.
///
/// # Example
///
/// ```
/// use slirc_state::isupport::PrefixMap;
///
/// let map = PrefixMap::parse("(ov)@+").unwrap();
/// assert_eq!(map.prefix_for_mode('o'), Some('@'));
/// assert_eq!(map.mode_for_prefix('+'), Some('v'));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrefixMap {
    pairs: Vec<(char, char)>,
}

impl PrefixMap {
    /// Parse a `PREFIX` value like `(qaohv)~&@%+`.
    ///
    /// An empty value (`PREFIX=`) means the server has no status modes.
    /// Returns `None` if the parentheses are missing or the letter and
    /// symbol counts differ.
    pub fn parse(s: &str) -> Option<Self> {
        if s.is_empty() {
            return Some(Self::default());
        }
        let rest = s.strip_prefix('(')?;
        let (modes, symbols) = rest.split_once(')')?;
        if modes.chars().count() != symbols.chars().count() {
            return None;
        }
        Some(Self {
            pairs: modes.chars().zip(symbols.chars()).collect(),
        })
    }

    /// Build a map from `(letter, symbol)` pairs, highest rank first.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (char, char)>) -> Self {
        Self {
            pairs: pairs.into_iter().collect(),
        }
    }

    /// Returns true if the given letter is a membership (status) mode.
    ///
    /// Disambiguates letters like `q`, which is a list mode on some
    /// networks and founder status on others.
    #[inline]
    pub fn is_prefix_mode(&self, mode: char) -> bool {
        self.pairs.iter().any(|&(m, _)| m == mode)
    }

    /// Returns the status symbol for a mode letter.
    #[inline]
    pub fn prefix_for_mode(&self, mode: char) -> Option<char> {
        self.pairs.iter().find(|&&(m, _)| m == mode).map(|&(_, p)| p)
    }

    /// Returns the mode letter for a status symbol.
    #[inline]
    pub fn mode_for_prefix(&self, prefix: char) -> Option<char> {
        self.pairs.iter().find(|&&(_, p)| p == prefix).map(|&(m, _)| m)
    }

    /// Iterate over `(letter, symbol)` pairs in announcement order.
    pub fn iter(&self) -> impl Iterator<Item = (char, char)> + '_ {
        self.pairs.iter().copied()
    }

    /// Number of status modes.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True when the server announced no status modes.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// How a channel mode letter takes parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModeClass {
    /// Type A: list modes, parameter on both set and unset (e.g., `b`).
    List,
    /// Type B: parameter on both set and unset (e.g., `k`).
    AlwaysParam,
    /// Type C: parameter only when set (e.g., `l`).
    ParamOnSet,
    /// Type D: never a parameter (e.g., `n`).
    NoParam,
    /// Membership status mode from `PREFIX` (e.g., `o`).
    Prefix,
}

/// Parsed `CHANMODES` token.
///
/// Channel modes are divided into four categories (A, B, C, D), kept in
/// the order the server sent them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChanModes {
    /// Type A: List modes (always have a parameter).
    pub a: String,
    /// Type B: Modes that always require a parameter.
    pub b: String,
    /// Type C: Modes that require a parameter when set.
    pub c: String,
    /// Type D: Modes that never have a parameter.
    pub d: String,
}

impl ChanModes {
    /// Parse a `CHANMODES` value like `beI,k,l,imnpst`.
    ///
    /// Returns `None` unless there are exactly four groups.
    pub fn parse(s: &str) -> Option<Self> {
        let groups: Vec<&str> = s.split(',').collect();
        match groups.as_slice() {
            [a, b, c, d] => Some(Self {
                a: (*a).to_string(),
                b: (*b).to_string(),
                c: (*c).to_string(),
                d: (*d).to_string(),
            }),
            _ => None,
        }
    }

    /// The four groups in positional order.
    pub fn groups(&self) -> [&str; 4] {
        [&self.a, &self.b, &self.c, &self.d]
    }

    /// Classify a mode letter, or `None` if no group lists it.
    pub fn classify(&self, mode: char) -> Option<ModeClass> {
        if self.a.contains(mode) {
            Some(ModeClass::List)
        } else if self.b.contains(mode) {
            Some(ModeClass::AlwaysParam)
        } else if self.c.contains(mode) {
            Some(ModeClass::ParamOnSet)
        } else if self.d.contains(mode) {
            Some(ModeClass::NoParam)
        } else {
            None
        }
    }
}

/// Capabilities announced by a single `RPL_ISUPPORT` reply.
///
/// Fields left `None` were not announced (or were malformed) and must not
/// touch the existing value when merged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IsupportUpdate {
    /// `PREFIX`, if announced and well-formed.
    pub prefix: Option<PrefixMap>,
    /// `CHANMODES`, if announced and well-formed.
    pub chanmodes: Option<ChanModes>,
    /// Every other token, in key order.
    pub other: BTreeMap<String, CapabilityValue>,
}

impl IsupportUpdate {
    /// True if nothing was announced.
    pub fn is_empty(&self) -> bool {
        self.prefix.is_none() && self.chanmodes.is_none() && self.other.is_empty()
    }
}

/// Parse the parameters of an `RPL_ISUPPORT` reply.
///
/// The first parameter is the echoed nickname and is skipped. Parsing
/// stops at the first parameter containing a space (the trailing
/// "are supported by this server" text); neither it nor anything after
/// it is parsed.
///
/// # Example
///
/// ```
/// use slirc_state::isupport::parse_tokens;
///
/// let update = parse_tokens(&["me", "PREFIX=(ov)@+", "EXCEPTS", "are supported by this server"]);
/// assert_eq!(update.prefix.unwrap().prefix_for_mode('v'), Some('+'));
/// assert!(update.other.contains_key("EXCEPTS"));
/// ```
pub fn parse_tokens<S: AsRef<str>>(params: &[S]) -> IsupportUpdate {
    let mut update = IsupportUpdate::default();

    for param in params.iter().skip(1) {
        let token = param.as_ref();
        if token.contains(' ') {
            break;
        }
        if token.is_empty() {
            continue;
        }

        let Some((key, value)) = token.split_once('=') else {
            update.other.insert(token.to_string(), CapabilityValue::Enabled);
            continue;
        };

        match key {
            "PREFIX" => match PrefixMap::parse(value) {
                Some(map) => update.prefix = Some(map),
                None => warn!(value = %value, "Ignoring malformed PREFIX token"),
            },
            "CHANMODES" => match ChanModes::parse(value) {
                Some(modes) => update.chanmodes = Some(modes),
                None => warn!(value = %value, "Ignoring CHANMODES token without four groups"),
            },
            _ => {
                update
                    .other
                    .insert(key.to_string(), CapabilityValue::Value(value.to_string()));
            }
        }
    }

    update
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_map_prefix_for_mode() {
        let map = PrefixMap::parse("(qaohv)~&@%+").unwrap();

        assert_eq!(map.prefix_for_mode('q'), Some('~'));
        assert_eq!(map.prefix_for_mode('a'), Some('&'));
        assert_eq!(map.prefix_for_mode('o'), Some('@'));
        assert_eq!(map.prefix_for_mode('h'), Some('%'));
        assert_eq!(map.prefix_for_mode('v'), Some('+'));
        assert_eq!(map.prefix_for_mode('x'), None);
    }

    #[test]
    fn prefix_map_mode_for_prefix() {
        let map = PrefixMap::parse("(qaohv)~&@%+").unwrap();

        assert_eq!(map.mode_for_prefix('~'), Some('q'));
        assert_eq!(map.mode_for_prefix('@'), Some('o'));
        assert_eq!(map.mode_for_prefix('!'), None);
    }

    #[test]
    fn prefix_map_keeps_order() {
        let map = PrefixMap::parse("(ov)@+").unwrap();
        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![('o', '@'), ('v', '+')]);
        assert!(map.is_prefix_mode('o'));
        assert!(!map.is_prefix_mode('q')); // q would be quiet, not founder
    }

    #[test]
    fn prefix_map_rejects_malformed() {
        assert_eq!(PrefixMap::parse("(ov)@"), None);
        assert_eq!(PrefixMap::parse("(o)@+"), None);
        assert_eq!(PrefixMap::parse("ov@+"), None);
        assert_eq!(PrefixMap::parse("(ov@+"), None);
    }

    #[test]
    fn prefix_map_empty_value() {
        let map = PrefixMap::parse("").unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn chanmodes_parse_four_groups() {
        let modes = ChanModes::parse("eIbq,k,flj,CFPcgimnpstz").unwrap();
        assert_eq!(modes.groups(), ["eIbq", "k", "flj", "CFPcgimnpstz"]);
    }

    #[test]
    fn chanmodes_rejects_wrong_group_count() {
        assert_eq!(ChanModes::parse("b,k,l"), None);
        assert_eq!(ChanModes::parse("b,k,l,imnst,X"), None);
    }

    #[test]
    fn chanmodes_allows_empty_groups() {
        let modes = ChanModes::parse(",,,nt").unwrap();
        assert_eq!(modes.groups(), ["", "", "", "nt"]);
    }

    #[test]
    fn chanmodes_classify() {
        let modes = ChanModes::parse("beI,k,l,imnst").unwrap();
        assert_eq!(modes.classify('b'), Some(ModeClass::List));
        assert_eq!(modes.classify('k'), Some(ModeClass::AlwaysParam));
        assert_eq!(modes.classify('l'), Some(ModeClass::ParamOnSet));
        assert_eq!(modes.classify('t'), Some(ModeClass::NoParam));
        assert_eq!(modes.classify('o'), None);
    }

    #[test]
    fn parse_skips_nickname() {
        let update = parse_tokens(&["EXCEPTS", "INVEX"]);
        assert!(!update.other.contains_key("EXCEPTS"));
        assert_eq!(update.other.get("INVEX"), Some(&CapabilityValue::Enabled));
    }

    #[test]
    fn parse_stops_at_spaced_token() {
        let update = parse_tokens(&[
            "nick",
            "NETWORK=Libera.Chat",
            "are supported by this server",
            "SAFELIST",
        ]);
        assert_eq!(
            update.other.get("NETWORK"),
            Some(&CapabilityValue::Value("Libera.Chat".to_string()))
        );
        assert!(!update.other.contains_key("SAFELIST"));
        assert_eq!(update.other.len(), 1);
    }

    #[test]
    fn parse_prefix_and_chanmodes() {
        let update = parse_tokens(&[
            "nick",
            "PREFIX=(ov)@+",
            "CHANMODES=eIbq,k,flj,CFPcgimnpstz",
        ]);
        let prefix = update.prefix.unwrap();
        assert_eq!(prefix.prefix_for_mode('o'), Some('@'));
        assert_eq!(prefix.prefix_for_mode('v'), Some('+'));
        assert_eq!(
            update.chanmodes.unwrap().groups(),
            ["eIbq", "k", "flj", "CFPcgimnpstz"]
        );
        assert!(update.other.is_empty());
    }

    #[test]
    fn parse_malformed_leaves_field_unset() {
        let update = parse_tokens(&["nick", "PREFIX=(ov)@", "CHANMODES=b,k", "MODES=4"]);
        assert_eq!(update.prefix, None);
        assert_eq!(update.chanmodes, None);
        assert_eq!(
            update.other.get("MODES"),
            Some(&CapabilityValue::Value("4".to_string()))
        );
    }

    #[test]
    fn parse_later_token_wins_within_reply() {
        let update = parse_tokens(&["nick", "CHANTYPES=#", "CHANTYPES=&#"]);
        assert_eq!(
            update.other.get("CHANTYPES").and_then(CapabilityValue::as_str),
            Some("&#")
        );
    }

    #[test]
    fn parse_empty_params() {
        let empty: [&str; 0] = [];
        assert!(parse_tokens(&empty).is_empty());
        assert!(parse_tokens(&["nick"]).is_empty());
    }
}
