//! Completions command - generate shell completion scripts.

use clap::Command;
use clap_complete::{generate, Shell};
use std::io;

/// Arguments for the completions command.
#[derive(clap::Args)]
#[command(after_help = "EXAMPLES:\n    \
    histdb-import completions bash > ~/.local/share/bash-completion/completions/histdb-import\n    \
    histdb-import completions zsh > ~/.zfunc/_histdb-import\n    \
    histdb-import completions fish > ~/.config/fish/completions/histdb-import.fish")]
pub struct Args {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Writes completions for `cmd` to stdout.
pub fn generate_completions(cmd: &mut Command, shell: Shell) {
    generate(shell, cmd, "histdb-import", &mut io::stdout());
}
