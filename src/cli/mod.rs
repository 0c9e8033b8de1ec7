//! Command-line interface
//!
//! This module contains the CLI commands and argument parsing
//! for the node-testkit binary.

pub mod commands;

pub use commands::{Command, Opt};
