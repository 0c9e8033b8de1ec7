//! # node-testkit
//!
//! Tooling for functional tests of a blockchain node. The centre of it is a
//! typed model of the node's `config.ini`: every field is a config entry that
//! parses from and serializes to the file's text, so test code can generate
//! node configs, edit them through typed values and diff them.
//!
//! ## Layout
//! - `entries/`: the entry framework (`ConfigEntry`, item types, `List`)
//! - `config/`: the `NodeConfig` schema and the toolkit's own settings
//! - `testnet/`: node directories and configs for test networks
//! - `cli/`: the `node-testkit` command line
//! - `error/`: the shared error type
//!
//! ## Example
//! ```
//! use node_testkit::entries::{ConfigEntry, Integer, List, ListFormat, Serialized};
//!
//! let mut list = List::new(Integer, ListFormat::bracketed("[", ",", "]"));
//! list.parse_from_text("[1,2,3]").unwrap();
//! assert_eq!(list.items(), &[1, 2, 3]);
//! assert_eq!(list.serialize_to_text(), Some(Serialized::Line("[1,2,3]".to_string())));
//! ```

pub mod cli;
pub mod config;
pub mod entries;
pub mod error;
pub mod testnet;

// Re-export commonly used types for convenience
pub use cli::{Command, Opt};
pub use config::{ConfigDifference, NodeConfig, Settings, CONFIG_FILE_NAME, GLOBAL_SETTINGS};
pub use entries::{
    Boolean, ConfigEntry, Entry, Integer, ItemType, List, ListFormat, ListView, ListViewMut,
    QuotedStr, Serialized, Str, TypedEntry,
};
pub use error::{ConfigError, Result};
pub use testnet::{NodeKind, TestNode, TestWorld};
