//! Row models for the histdb tables.

/// Where a command ran: one row of `places`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Place {
    pub host: String,
    pub dir: String,
}

/// Row ids touched by one imported entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertedIds {
    /// `commands.rowid` of the entry's command text
    pub command_id: i64,

    /// `places.rowid` of the run's host and directory
    pub place_id: i64,

    /// `history.rowid` of the new fact row
    pub history_id: i64,
}

/// A history row joined with its command and place.
///
/// Numeric columns are read back as text, so values that SQLite could not
/// coerce to integers still round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub id: i64,
    pub session: String,
    pub argv: String,
    pub host: String,
    pub dir: String,
    pub exit_status: String,
    pub start_time: String,
    pub duration: String,
}

impl HistoryRow {
    /// Start time as a UTC timestamp, if it is a valid epoch value.
    pub fn started_at(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.start_time
            .parse::<i64>()
            .ok()
            .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
    }
}
