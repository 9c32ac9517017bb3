//! Ignore list for trivial commands.

use super::parser::ParsedEntry;

/// Commands skipped when no ignore list is configured.
pub const DEFAULT_IGNORED: &[&str] = &["cd", "ls", "top", "htop"];

/// Skips entries whose whole command matches an ignored command.
///
/// Matching is exact: `ls -la` is kept even when `ls` is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreFilter {
    commands: Vec<String>,
}

impl IgnoreFilter {
    pub fn new<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            commands: commands.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds a filter from a comma-joined list such as `cd,ls,top`.
    ///
    /// The list is split verbatim, so an empty string ignores empty commands.
    pub fn from_list(list: &str) -> Self {
        Self::new(list.split(','))
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn is_ignored(&self, entry: &ParsedEntry) -> bool {
        self.commands.iter().any(|c| *c == entry.cmd)
    }
}

impl Default for IgnoreFilter {
    fn default() -> Self {
        Self::new(DEFAULT_IGNORED.iter().copied())
    }
}
