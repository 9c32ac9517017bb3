//! Parser for zsh extended-history entries.
//!
//! An entry looks like `: <start>:<duration>;<command>`. Only the first
//! semicolon ends the header, so the command keeps any semicolons and
//! newlines of its own.

use crate::error::ImportError;

/// A history entry split into its fields.
///
/// `started` and `duration` are kept as text; SQLite's column affinity turns
/// them into integers on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntry {
    /// Start time in seconds since the epoch
    pub started: String,

    /// Elapsed seconds
    pub duration: String,

    /// Command text, verbatim
    pub cmd: String,
}

/// Splits a logical entry into a [`ParsedEntry`].
///
/// Fails with [`ImportError::Format`] when there is no semicolon, or when
/// the header before it does not have exactly three colon-separated fields.
pub fn parse_entry(entry: &str) -> Result<ParsedEntry, ImportError> {
    let (header, cmd) = entry
        .split_once(';')
        .ok_or_else(|| ImportError::format("entry", entry))?;

    let fields: Vec<&str> = header.split(':').collect();
    let [_marker, started, duration] = fields.as_slice() else {
        return Err(ImportError::format("timestamp", header));
    };

    Ok(ParsedEntry {
        started: started.trim().to_string(),
        duration: duration.trim().to_string(),
        cmd: cmd.to_string(),
    })
}
