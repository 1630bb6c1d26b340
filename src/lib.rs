// ABOUTME: Library root for edgeship - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod output;
pub mod provider;
pub mod prune;
pub mod release;
pub mod stack;
pub mod types;
