//! Importing a history stream into the database.
//!
//! Entries are read, parsed, filtered, and inserted strictly in file order
//! inside one transaction. The first error of any kind rolls the whole run
//! back; nothing is committed unless the stream was consumed completely.

use std::io::BufRead;

use crate::config::ImportConfig;
use crate::error::ImportError;
use crate::history::{parse_entry, EntryReader, IgnoreFilter};
use crate::storage::{Database, ImportTransaction};

/// Counts from one import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Non-blank logical entries read
    pub entries: usize,

    /// Entries written to the history table
    pub inserted: usize,

    /// Entries dropped by the ignore list
    pub skipped: usize,

    /// Blank lines passed over
    pub blank: usize,
}

/// Imports every entry of `source` and commits.
///
/// With `dry_run` the entries are still inserted inside the transaction, so
/// storage errors surface, but the transaction is rolled back at the end.
pub fn import_history<R: BufRead>(
    db: &mut Database,
    source: R,
    config: &ImportConfig,
    dry_run: bool,
) -> Result<ImportSummary, ImportError> {
    let mut tx = db.begin_import(config)?;

    let summary = match import_entries(&mut tx, EntryReader::new(source), &config.ignore) {
        Ok(summary) => summary,
        Err(e) => {
            tracing::warn!("Import failed, rolling back: {}", e);
            if let Err(rollback_err) = tx.rollback() {
                tracing::warn!("Rollback failed: {}", rollback_err);
            }
            return Err(e);
        }
    };

    if dry_run {
        tx.rollback()?;
        tracing::info!("Dry run: rolled back {} entries", summary.inserted);
    } else {
        tx.commit()?;
        tracing::info!(
            "Imported {} entries ({} skipped)",
            summary.inserted,
            summary.skipped
        );
    }

    Ok(summary)
}

/// Feeds every entry from `reader` into `tx` without finishing it.
pub fn import_entries<R: BufRead>(
    tx: &mut ImportTransaction<'_>,
    reader: EntryReader<R>,
    ignore: &IgnoreFilter,
) -> Result<ImportSummary, ImportError> {
    let mut summary = ImportSummary::default();

    for entry in reader {
        let entry = entry?;
        if entry.is_empty() {
            summary.blank += 1;
            continue;
        }
        summary.entries += 1;

        let parsed = parse_entry(&entry)?;

        if ignore.is_ignored(&parsed) {
            tracing::info!("Skipping {:?}", parsed);
            summary.skipped += 1;
            continue;
        }

        tracing::debug!("Inserting {:?}", parsed);
        tx.insert_entry(&parsed)?;
        summary.inserted += 1;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_config() -> ImportConfig {
        ImportConfig {
            db_path: PathBuf::from(":memory:"),
            history_path: PathBuf::from(".zsh_history"),
            ignore: IgnoreFilter::default(),
            host: "laptop".to_string(),
            dir: "/home/alice".to_string(),
            session: "5".to_string(),
            exit_status: "0".to_string(),
        }
    }

    const HISTORY: &str = ": 1471766782:0;git status\n\
                           : 1471766790:0;ls\n\
                           \n\
                           : 1471766797:0;ls -la\n\
                           : 1471766804:3;git commit -am \"Foo\";git push origin master\n\
                           : 1472100284:0;echo \"hello\\\nworld\"\n\
                           : 1472100290:0;git status\n";

    #[test]
    fn test_import_counts_and_rows() {
        let mut db = Database::open_in_memory().expect("Failed to open database");

        let summary = import_history(&mut db, HISTORY.as_bytes(), &test_config(), false)
            .expect("import should succeed");

        assert_eq!(
            summary,
            ImportSummary {
                entries: 6,
                inserted: 5,
                skipped: 1,
                blank: 1,
            }
        );
        assert_eq!(db.command_count().expect("count"), 4);
        assert_eq!(db.place_count().expect("count"), 1);
        assert_eq!(db.history_count().expect("count"), 5);

        let rows = db.list_history(10).expect("list");
        assert_eq!(rows[0].argv, "git status");
        assert_eq!(rows[0].start_time, "1472100290");
        assert_eq!(rows[1].argv, "echo \"hello\nworld\"");
        assert_eq!(rows[2].argv, "git commit -am \"Foo\";git push origin master");
        assert_eq!(rows[2].duration, "3");
        assert!(rows.iter().all(|r| r.session == "5" && r.exit_status == "0"));
        assert!(rows.iter().all(|r| r.argv != "ls"));
    }

    #[test]
    fn test_parse_failure_rolls_back_everything() {
        let mut db = Database::open_in_memory().expect("Failed to open database");
        let input = ": 1471766782:0;git status\n\
                     : 1471766790:0;make\n\
                     not an extended history line\n\
                     : 1471766800:0;make test\n";

        let err = import_history(&mut db, input.as_bytes(), &test_config(), false)
            .expect_err("import should fail");

        assert!(matches!(err, ImportError::Format { .. }));
        assert_eq!(db.history_count().expect("count"), 0);
        assert_eq!(db.command_count().expect("count"), 0);
        assert_eq!(db.place_count().expect("count"), 0);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let mut db = Database::open_in_memory().expect("Failed to open database");

        let summary = import_history(&mut db, HISTORY.as_bytes(), &test_config(), true)
            .expect("dry run should succeed");

        assert_eq!(summary.inserted, 5);
        assert_eq!(db.history_count().expect("count"), 0);
        assert_eq!(db.command_count().expect("count"), 0);
    }

    #[test]
    fn test_reimport_appends_history_only() {
        let mut db = Database::open_in_memory().expect("Failed to open database");
        let config = test_config();

        import_history(&mut db, HISTORY.as_bytes(), &config, false).expect("first import");
        import_history(&mut db, HISTORY.as_bytes(), &config, false).expect("second import");

        assert_eq!(db.command_count().expect("count"), 4);
        assert_eq!(db.place_count().expect("count"), 1);
        assert_eq!(db.history_count().expect("count"), 10);
    }

    #[test]
    fn test_custom_ignore_list() {
        let mut db = Database::open_in_memory().expect("Failed to open database");
        let config = ImportConfig {
            ignore: IgnoreFilter::from_list("git status"),
            ..test_config()
        };

        let summary =
            import_history(&mut db, HISTORY.as_bytes(), &config, false).expect("import");

        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.inserted, 4);
        let rows = db.list_history(10).expect("list");
        assert!(rows.iter().any(|r| r.argv == "ls"));
        assert!(rows.iter().all(|r| r.argv != "git status"));
    }

    #[test]
    fn test_empty_input_commits_nothing() {
        let mut db = Database::open_in_memory().expect("Failed to open database");

        let summary =
            import_history(&mut db, &b""[..], &test_config(), false).expect("import");

        assert_eq!(summary, ImportSummary::default());
        assert_eq!(db.history_count().expect("count"), 0);
    }
}
