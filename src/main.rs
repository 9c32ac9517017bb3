use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

use cli::commands;

/// The main CLI command line interface.
#[derive(Parser)]
#[command(name = "histdb-import")]
#[command(version)]
#[command(about = "Import zsh history into a zsh-histdb database")]
#[command(long_about = "Reads a zsh history file written with EXTENDED_HISTORY and stores\n\
    every entry in a zsh-histdb SQLite database. Commands and places are\n\
    deduplicated; each entry becomes one history row. The import runs in a\n\
    single transaction and is rolled back on the first error.")]
#[command(after_help = "EXAMPLES:\n    \
    histdb-import import              Import ~/.zsh_history\n    \
    histdb-import import --dry-run    Check the history file without writing\n    \
    histdb-import stats               Show what the database holds\n\n\
    For more information about a command, run 'histdb-import <command> --help'.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Import a zsh history file
    #[command(long_about = "Imports every entry of a zsh history file into the database.\n\
        Trivial commands on the ignore list are skipped. Re-importing the same\n\
        file appends its history rows again.")]
    Import(commands::import::Args),

    /// Show table counts and recent history
    Stats(commands::stats::Args),

    /// Generate shell completion scripts
    Completions(commands::completions::Args),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "histdb_import=debug"
    } else {
        "histdb_import=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Import(args) => commands::import::run(args),
        Commands::Stats(args) => commands::stats::run(args),
        Commands::Completions(args) => {
            commands::completions::generate_completions(&mut Cli::command(), args.shell);
            Ok(())
        }
    }
}
