//! Chat message types and parsing.

mod parse;
mod serialize;
/// Tag map, permission levels and tag value unescaping.
pub mod tags;
mod types;

pub use self::tags::{Permission, Tags};
pub use self::types::{CommandPart, ParsedMessage, Source};
