//! Command-line interface for histdb-import.
//!
//! Provides the `import`, `stats`, and `completions` commands.

/// Individual CLI command implementations.
pub mod commands;
