//! Stats command - show what the database holds.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use histdb_import::config::{ConfigOverrides, ImportConfig};
use histdb_import::storage::Database;

/// Arguments for the stats command.
#[derive(clap::Args)]
pub struct Args {
    /// Location of the database file
    #[arg(long, value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Number of recent history rows to show
    #[arg(short = 'n', long, default_value_t = 5)]
    pub limit: usize,
}

/// Executes the stats command.
pub fn run(args: Args) -> Result<()> {
    let config = ImportConfig::load(ConfigOverrides {
        database: args.database,
        ..Default::default()
    })?;

    if !config.db_path.exists() {
        println!(
            "{}",
            format!("No database at {}", config.db_path.display()).yellow()
        );
        println!("Run {} to create one.", "histdb-import import".cyan());
        return Ok(());
    }

    let db = Database::open(&config.db_path)
        .with_context(|| format!("Failed to open {}", config.db_path.display()))?;

    println!("{}", "Database:".bold());
    println!("  {}  {}", "Path:".dimmed(), config.db_path.display());
    println!("  Commands: {}", db.command_count()?);
    println!("  Places:   {}", db.place_count()?);
    println!("  History:  {}", db.history_count()?);

    let recent = db.list_history(args.limit)?;
    if !recent.is_empty() {
        println!();
        println!("{}", "Recent history:".bold());
        for row in recent {
            let when = row
                .started_at()
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| row.start_time.clone());
            let argv = row.argv.lines().next().unwrap_or_default();

            println!(
                "  {}  {:>4}s  {}  {}",
                when.dimmed(),
                row.duration,
                row.host.yellow(),
                argv
            );
        }
    }

    Ok(())
}
