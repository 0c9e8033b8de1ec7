//! Testnet helpers
//!
//! Prepares node directories for functional tests: each node gets its own
//! directory inside a temporary world and a `config.ini` generated from its
//! role (init, witness or api). Starting the node binary is left to the
//! caller.

pub mod test_utils;

pub use test_utils::*;
