//! Typed config entries
//!
//! Every field of a node config file is an entry: it knows how to parse its
//! value from the text on the right-hand side of `key = value` and how to
//! write it back. Two layers make this work:
//!
//! - [`ItemType`]: a stateless parse/serialize pair for one value
//!   (`Str`, `QuotedStr`, `Integer`, `Boolean`, or a nested [`List`])
//! - [`ConfigEntry`]: the object-safe text-level contract the config loader
//!   drives, with [`TypedEntry`] on top for typed get/set
//!
//! Lists hand out borrowed views ([`ListView`], [`ListViewMut`]) over their
//! storage instead of exposing the entry itself.

pub mod list;
pub mod scalar;

pub use list::{List, ListFormat, ListView, ListViewMut};
pub use scalar::{Boolean, Entry, Integer, QuotedStr, Str};

use crate::error::{ConfigError, Result};
use std::any::Any;
use std::fmt::Debug;

/// Textual form of an entry's value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Serialized {
    /// Scalars and single-line lists
    Line(String),
    /// Multi-line lists, one unframed string per item
    Lines(Vec<String>),
}

impl Serialized {
    /// Flatten into the physical lines written after `key = `
    pub fn into_lines(self) -> Vec<String> {
        match self {
            Serialized::Line(line) => vec![line],
            Serialized::Lines(lines) => lines,
        }
    }
}

impl std::fmt::Display for Serialized {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Serialized::Line(line) => write!(f, "{line}"),
            Serialized::Lines(lines) => write!(f, "{}", lines.join("\n")),
        }
    }
}

/// Parse/serialize pair for a single value
///
/// Item types are plain values (usually unit structs) so a list can reuse
/// them for every element without building throwaway entries.
pub trait ItemType: Debug + Clone + 'static {
    type Value: Clone + PartialEq + Debug + 'static;

    fn parse_item(&self, text: &str) -> Result<Self::Value>;

    fn serialize_item(&self, value: &Self::Value) -> String;

    /// Human readable name, e.g. `QuotedStr`
    fn name(&self) -> String;
}

/// Text-level contract shared by all config entries
pub trait ConfigEntry: Any + Debug {
    /// True once a value was set or parsed and not cleared since
    fn is_set(&self) -> bool;

    /// Reset to the unset state
    fn clear(&mut self);

    /// Populate the value from its textual form
    fn parse_from_text(&mut self, text: &str) -> Result<()>;

    /// Textual form of the value, `None` if there is nothing to write
    fn serialize_to_text(&self) -> Option<Serialized>;

    fn type_name(&self) -> String;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Typed access on top of [`ConfigEntry`]
pub trait TypedEntry: ConfigEntry {
    type Value;

    /// Current value, `None` while unset
    fn get_value(&self) -> Option<&Self::Value>;

    /// Replace the current value
    fn set_value(&mut self, value: Self::Value);
}

/// Downcast a type-erased entry to its concrete entry type
pub fn downcast_entry<'a, E: ConfigEntry>(key: &str, entry: &'a dyn ConfigEntry) -> Result<&'a E> {
    entry
        .as_any()
        .downcast_ref::<E>()
        .ok_or_else(|| ConfigError::TypeMismatch {
            key: key.to_string(),
            expected: std::any::type_name::<E>().to_string(),
        })
}

/// Mutable variant of [`downcast_entry`]
pub fn downcast_entry_mut<'a, E: ConfigEntry>(
    key: &str,
    entry: &'a mut dyn ConfigEntry,
) -> Result<&'a mut E> {
    entry
        .as_any_mut()
        .downcast_mut::<E>()
        .ok_or_else(|| ConfigError::TypeMismatch {
            key: key.to_string(),
            expected: std::any::type_name::<E>().to_string(),
        })
}
