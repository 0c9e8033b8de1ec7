//! Configuration management
//!
//! Two kinds of configuration live here:
//! - `node_config`: the node's own `config.ini`, modelled as a schema of
//!   typed entries that can be loaded, written back and diffed
//! - `settings`: the toolkit's runtime settings (where the node, wallet and
//!   key tool executables are, where generated node directories go)

pub mod node_config;
pub mod settings;

pub use node_config::{ConfigDifference, NodeConfig, CONFIG_FILE_NAME};
pub use settings::{
    Settings, DEV_KEY_EXECUTABLE, GLOBAL_SETTINGS, NODE_EXECUTABLE, WALLET_EXECUTABLE,
};
