//! Error type shared by the reader, parser, and storage layers.

/// Errors that abort a history import.
///
/// Every variant is fatal to the run: the import transaction is rolled back
/// and the error is reported to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// Reading the history stream failed.
    #[error("Failed to read history: {0}")]
    Stream(#[from] std::io::Error),

    /// A logical entry does not have the `: <start>:<duration>;<command>` shape.
    #[error("Unable to parse {reason}: {fragment:?}")]
    Format {
        /// The part of the entry that could not be split.
        fragment: String,
        /// Which part of the entry was malformed.
        reason: &'static str,
    },

    /// Preparing, executing, or committing a statement failed.
    #[error("Database error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// A table lacks the unique key that deduplication relies on.
    #[error("Table '{table}' has no unique key on ({columns})")]
    MissingUniqueKey {
        /// Table missing the constraint.
        table: &'static str,
        /// Comma-joined columns the unique key must cover.
        columns: &'static str,
    },
}

impl ImportError {
    pub(crate) fn format(reason: &'static str, fragment: &str) -> Self {
        Self::Format {
            fragment: fragment.to_string(),
            reason,
        }
    }
}
