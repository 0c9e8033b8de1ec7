//! The node's `config.ini`
//!
//! The file is a flat list of `key = value` lines. Lines starting with `#`
//! are comments. Multi-line entries repeat their key once per item:
//!
//! ```text
//! plugin = witness p2p database_api
//! witness = "initminer"
//! witness = "alice"
//! ```

use crate::entries::{
    downcast_entry, downcast_entry_mut, Boolean, ConfigEntry, Entry, Integer, List, ListFormat,
    QuotedStr, Serialized, Str,
};
use crate::error::{ConfigError, Result};
use log::{debug, info, warn};
use serde::Serialize;
use std::fs;
use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "config.ini";

pub const ENTRY_COUNT: usize = 17;

/// One key whose serialized value differs between two configs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigDifference {
    pub key: String,
    pub left: Option<String>,
    pub right: Option<String>,
}

impl std::fmt::Display for ConfigDifference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let show = |value: &Option<String>| {
            value
                .as_ref()
                .map(|v| v.replace('\n', " | "))
                .unwrap_or_else(|| "<unset>".to_string())
        };
        write!(f, "{}: {} -> {}", self.key, show(&self.left), show(&self.right))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeConfig {
    pub log_appender: List<Str>,
    pub log_logger: List<Str>,
    pub backtrace: Entry<Str>,
    pub plugin: List<Str>,
    pub account_history_track_account_range: List<List<QuotedStr>>,
    pub shared_file_dir: Entry<QuotedStr>,
    pub shared_file_size: Entry<Str>,
    pub p2p_endpoint: Entry<Str>,
    pub p2p_seed_node: List<Str>,
    pub webserver_http_endpoint: Entry<Str>,
    pub webserver_ws_endpoint: Entry<Str>,
    pub enable_stale_production: Entry<Boolean>,
    pub required_participation: Entry<Integer>,
    pub witness: List<QuotedStr>,
    pub private_key: List<Str>,
    pub snapshot_root_dir: Entry<QuotedStr>,
    pub exit_before_sync: Entry<Boolean>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeConfig {
    /// Config with every entry unset
    pub fn new() -> NodeConfig {
        NodeConfig {
            log_appender: List::new(Str, ListFormat::multi_line()),
            log_logger: List::new(Str, ListFormat::multi_line()),
            backtrace: Entry::new(Str),
            plugin: List::new(Str, ListFormat::separated(" ")),
            account_history_track_account_range: List::new(
                List::new(QuotedStr, ListFormat::bracketed("[", ",", "]")),
                ListFormat::multi_line(),
            ),
            shared_file_dir: Entry::new(QuotedStr),
            shared_file_size: Entry::new(Str),
            p2p_endpoint: Entry::new(Str),
            p2p_seed_node: List::new(Str, ListFormat::separated(" ")),
            webserver_http_endpoint: Entry::new(Str),
            webserver_ws_endpoint: Entry::new(Str),
            enable_stale_production: Entry::new(Boolean),
            required_participation: Entry::new(Integer),
            witness: List::new(QuotedStr, ListFormat::multi_line()),
            private_key: List::new(Str, ListFormat::multi_line()),
            snapshot_root_dir: Entry::new(QuotedStr),
            exit_before_sync: Entry::new(Boolean),
        }
    }

    /// All entries in file order, keyed as they appear in `config.ini`
    pub fn entries(&self) -> [(&'static str, &dyn ConfigEntry); ENTRY_COUNT] {
        let entries: [(&'static str, &dyn ConfigEntry); ENTRY_COUNT] = [
            ("log-appender", &self.log_appender),
            ("log-logger", &self.log_logger),
            ("backtrace", &self.backtrace),
            ("plugin", &self.plugin),
            (
                "account-history-track-account-range",
                &self.account_history_track_account_range,
            ),
            ("shared-file-dir", &self.shared_file_dir),
            ("shared-file-size", &self.shared_file_size),
            ("p2p-endpoint", &self.p2p_endpoint),
            ("p2p-seed-node", &self.p2p_seed_node),
            ("webserver-http-endpoint", &self.webserver_http_endpoint),
            ("webserver-ws-endpoint", &self.webserver_ws_endpoint),
            ("enable-stale-production", &self.enable_stale_production),
            ("required-participation", &self.required_participation),
            ("witness", &self.witness),
            ("private-key", &self.private_key),
            ("snapshot-root-dir", &self.snapshot_root_dir),
            ("exit-before-sync", &self.exit_before_sync),
        ];
        entries
    }

    pub fn entries_mut(&mut self) -> [(&'static str, &mut dyn ConfigEntry); ENTRY_COUNT] {
        let entries: [(&'static str, &mut dyn ConfigEntry); ENTRY_COUNT] = [
            ("log-appender", &mut self.log_appender),
            ("log-logger", &mut self.log_logger),
            ("backtrace", &mut self.backtrace),
            ("plugin", &mut self.plugin),
            (
                "account-history-track-account-range",
                &mut self.account_history_track_account_range,
            ),
            ("shared-file-dir", &mut self.shared_file_dir),
            ("shared-file-size", &mut self.shared_file_size),
            ("p2p-endpoint", &mut self.p2p_endpoint),
            ("p2p-seed-node", &mut self.p2p_seed_node),
            ("webserver-http-endpoint", &mut self.webserver_http_endpoint),
            ("webserver-ws-endpoint", &mut self.webserver_ws_endpoint),
            ("enable-stale-production", &mut self.enable_stale_production),
            ("required-participation", &mut self.required_participation),
            ("witness", &mut self.witness),
            ("private-key", &mut self.private_key),
            ("snapshot-root-dir", &mut self.snapshot_root_dir),
            ("exit-before-sync", &mut self.exit_before_sync),
        ];
        entries
    }

    pub fn entry(&self, key: &str) -> Result<&dyn ConfigEntry> {
        self.entries()
            .into_iter()
            .find(|(name, _)| *name == key)
            .map(|(_, entry)| entry)
            .ok_or_else(|| ConfigError::UnknownEntry(key.to_string()))
    }

    pub fn entry_mut(&mut self, key: &str) -> Result<&mut dyn ConfigEntry> {
        self.entries_mut()
            .into_iter()
            .find(|(name, _)| *name == key)
            .map(|(_, entry)| entry)
            .ok_or_else(|| ConfigError::UnknownEntry(key.to_string()))
    }

    /// Entry `key` as its concrete type, e.g. `typed::<Entry<Integer>>`
    pub fn typed<E: ConfigEntry>(&self, key: &str) -> Result<&E> {
        downcast_entry(key, self.entry(key)?)
    }

    pub fn typed_mut<E: ConfigEntry>(&mut self, key: &str) -> Result<&mut E> {
        downcast_entry_mut(key, self.entry_mut(key)?)
    }

    /// Parse `config.ini` text
    ///
    /// Unknown keys are skipped with a warning, so files written by newer
    /// node versions still load.
    pub fn parse(text: &str) -> Result<NodeConfig> {
        let mut config = NodeConfig::new();

        for (idx, raw_line) in text.lines().enumerate() {
            let line_number = idx + 1;
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = line.split_once('=').ok_or_else(|| {
                ConfigError::Format(format!("expected 'key = value', got '{line}'"))
                    .at_line(line_number)
            })?;
            let key = key.trim();

            match config.entry_mut(key) {
                Ok(entry) => entry
                    .parse_from_text(value)
                    .map_err(|e| e.at_line(line_number))?,
                Err(ConfigError::UnknownEntry(_)) => {
                    warn!("Skipping unknown config entry '{key}' at line {line_number}");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(config)
    }

    pub fn load(path: &Path) -> Result<NodeConfig> {
        let text = fs::read_to_string(path)?;
        let config = Self::parse(&text)?;
        debug!("Loaded node config from {}", path.display());
        Ok(config)
    }

    /// Render as `config.ini` text; unset entries are left out
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for (key, entry) in self.entries() {
            if !entry.is_set() {
                continue;
            }
            if let Some(serialized) = entry.serialize_to_text() {
                for line in serialized.into_lines() {
                    text.push_str(&format!("{key} = {line}\n"));
                }
            }
        }
        text
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_text())?;
        info!("Wrote node config to {}", path.display());
        Ok(())
    }

    /// Keys whose written form differs, in file order
    pub fn diff(&self, other: &NodeConfig) -> Vec<ConfigDifference> {
        self.entries()
            .into_iter()
            .zip(other.entries())
            .filter_map(|((key, left), (_, right))| {
                let left = written_form(left);
                let right = written_form(right);
                if left == right {
                    None
                } else {
                    Some(ConfigDifference {
                        key: key.to_string(),
                        left: left.map(|s| s.to_string()),
                        right: right.map(|s| s.to_string()),
                    })
                }
            })
            .collect()
    }

    /// Set entries as a JSON object; multi-line entries become arrays
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (key, entry) in self.entries() {
            let value = match written_form(entry) {
                Some(Serialized::Line(line)) => serde_json::Value::String(line),
                Some(Serialized::Lines(lines)) => serde_json::Value::Array(
                    lines.into_iter().map(serde_json::Value::String).collect(),
                ),
                None => continue,
            };
            map.insert(key.to_string(), value);
        }
        serde_json::Value::Object(map)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_json())?)
    }

    /// `diff` as a pretty JSON array; unset sides are `null`
    pub fn diff_json_string(&self, other: &NodeConfig) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.diff(other))?)
    }
}

fn written_form(entry: &dyn ConfigEntry) -> Option<Serialized> {
    if entry.is_set() {
        entry.serialize_to_text()
    } else {
        None
    }
}
