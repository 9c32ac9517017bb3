//! CLI commands for histdb-import.
//!
//! Each submodule implements a single CLI command with its argument
//! parsing and execution logic.

/// Generate shell completion scripts.
pub mod completions;

/// Import a zsh history file.
pub mod import;

/// Show table counts and recent history rows.
pub mod stats;
