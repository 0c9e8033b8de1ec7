//! Error handling for the toolkit
//!
//! This module provides the error type shared by config entries, the node
//! config file loader, the settings layer and the testnet helpers.

use std::fmt;

/// Result type alias for toolkit operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Error types for config entry and config file operations
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Text does not have the shape an entry expects
    Format(String),
    /// A disallowed mutation idiom was used on a list view
    NotSupported(String),
    /// An entry was accessed as a type it does not have
    TypeMismatch { key: String, expected: String },
    /// No entry with this key exists in the config schema
    UnknownEntry(String),
    /// `remove` was asked for an item the list does not hold
    ItemNotFound(String),
    /// File I/O errors
    Io(String),
    /// Toolkit settings errors
    Settings(String),
    /// JSON/TOML serialization errors
    Serialization(String),
}

impl ConfigError {
    /// Attach a config file line number to a format error
    pub fn at_line(self, line: usize) -> Self {
        match self {
            ConfigError::Format(msg) => ConfigError::Format(format!("line {line}: {msg}")),
            other => other,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Format(msg) => write!(f, "Format error: {msg}"),
            ConfigError::NotSupported(msg) => write!(f, "Not supported: {msg}"),
            ConfigError::TypeMismatch { key, expected } => {
                write!(f, "Type mismatch: entry '{key}' is not of type {expected}")
            }
            ConfigError::UnknownEntry(key) => write!(f, "Unknown config entry: {key}"),
            ConfigError::ItemNotFound(item) => write!(f, "Item not found in list: {item}"),
            ConfigError::Io(msg) => write!(f, "I/O error: {msg}"),
            ConfigError::Settings(msg) => write!(f, "Settings error: {msg}"),
            ConfigError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Settings(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_line_only_touches_format_errors() {
        let err = ConfigError::Format("missing '='".to_string()).at_line(7);
        assert_eq!(err, ConfigError::Format("line 7: missing '='".to_string()));

        let err = ConfigError::UnknownEntry("foo".to_string()).at_line(7);
        assert_eq!(err, ConfigError::UnknownEntry("foo".to_string()));
    }

    #[test]
    fn test_display() {
        let err = ConfigError::TypeMismatch {
            key: "witness".to_string(),
            expected: "Entry<Integer>".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Type mismatch: entry 'witness' is not of type Entry<Integer>"
        );
    }
}
