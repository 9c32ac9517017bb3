//! Import command - load a zsh history file into the database.
//!
//! Reads the whole history file inside one transaction. Either every entry
//! is stored or, on the first unreadable or unparsable entry, none are.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use histdb_import::config::{ConfigOverrides, ImportConfig};
use histdb_import::import::import_history;
use histdb_import::storage::Database;

/// Arguments for the import command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    histdb-import import                          Import ~/.zsh_history\n    \
    histdb-import import --dry-run                Check the file without writing\n    \
    histdb-import import --history old_history    Import another history file\n    \
    histdb-import import --ignore cd,ls,pwd       Replace the ignore list")]
pub struct Args {
    /// Location of the database file
    #[arg(long, value_name = "PATH")]
    #[arg(long_help = "Location of the zsh-histdb database file.\n\
        Defaults to ~/.histdb/zsh-history.db. Missing tables are created.")]
    pub database: Option<PathBuf>,

    /// Location of the history file
    #[arg(long, value_name = "PATH")]
    #[arg(long_help = "Location of the zsh history file, written with\n\
        EXTENDED_HISTORY enabled. Defaults to ~/.zsh_history.")]
    pub history: Option<PathBuf>,

    /// Commands to ignore during import
    #[arg(long, value_name = "LIST")]
    #[arg(long_help = "Comma-separated commands to skip. A command is only\n\
        skipped when it matches an entry exactly, so 'ls' skips 'ls' but\n\
        not 'ls -la'. Replaces the default list (cd,ls,top,htop).")]
    pub ignore: Option<String>,

    /// Value for the host column
    #[arg(long)]
    #[arg(long_help = "Value for the host column. Defaults to $HISTDB_HOST,\n\
        then the system host name.")]
    pub host: Option<String>,

    /// Value for the session column
    #[arg(long)]
    pub session: Option<String>,

    /// Value for the exit_status column
    #[arg(long)]
    pub exit_status: Option<String>,

    /// Parse and insert, then roll back instead of committing
    #[arg(long)]
    pub dry_run: bool,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            database: self.database.clone(),
            history: self.history.clone(),
            ignore: self.ignore.clone(),
            host: self.host.clone(),
            session: self.session.clone(),
            exit_status: self.exit_status.clone(),
        }
    }
}

/// Executes the import command.
pub fn run(args: Args) -> Result<()> {
    let config = ImportConfig::load(args.overrides())?;
    tracing::debug!("Resolved configuration: {:?}", config);

    let file = File::open(&config.history_path)
        .with_context(|| format!("Failed to open {}", config.history_path.display()))?;

    if let Some(parent) = config.db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    let mut db = Database::open(&config.db_path)
        .with_context(|| format!("Failed to open {}", config.db_path.display()))?;

    println!(
        "{}",
        format!("Importing {}...", config.history_path.display()).dimmed()
    );

    let summary = import_history(&mut db, BufReader::new(file), &config, args.dry_run)
        .with_context(|| format!("Failed to import {}", config.history_path.display()))?;

    let verb = if args.dry_run { "Would import" } else { "Imported" };
    println!(
        "{} {} entries into {}",
        verb.green(),
        summary.inserted.to_string().cyan(),
        config.db_path.display()
    );
    if summary.skipped > 0 {
        println!(
            "  {}",
            format!("Skipped {} ignored commands", summary.skipped).dimmed()
        );
    }
    if args.dry_run {
        println!("{}", "Dry run: no changes were written.".yellow());
    }

    Ok(())
}
