//! ISUPPORT (RPL_ISUPPORT / 005) parsing and the client's capability set.
//!
//! [`parse_tokens`] turns the parameters of one 005 reply into an
//! [`IsupportUpdate`], which the caller merges into its [`CapabilitySet`]
//! key by key. Later announcements overwrite earlier ones.
//!
//! # Reference
//! - Modern IRC documentation: <https://modern.ircdocs.horse/isupport.html>

mod parser;
mod set;

pub use parser::{parse_tokens, CapabilityValue, ChanModes, IsupportUpdate, ModeClass, PrefixMap};
pub use set::CapabilitySet;
