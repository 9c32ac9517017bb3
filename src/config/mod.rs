//! Configuration management
//!
//! Settings are resolved once at startup, in order of precedence:
//! command-line flags, `HISTDB_*` environment variables, the optional
//! `~/.histdb/import.yaml` file, then built-in defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

use crate::history::IgnoreFilter;

/// Host name used when the system host name cannot be read.
pub const UNKNOWN_HOST: &str = "UNKNOWN";

/// Settings for one import run.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// SQLite database to import into
    pub db_path: PathBuf,

    /// zsh history file to read
    pub history_path: PathBuf,

    /// Commands that are skipped instead of stored
    pub ignore: IgnoreFilter,

    /// Value for `places.host`
    pub host: String,

    /// Value for `places.dir`; the history file carries no directory, so
    /// every entry is filed under the home directory
    pub dir: String,

    /// Value for `history.session`
    pub session: String,

    /// Value for `history.exit_status`
    pub exit_status: String,
}

/// Values given on the command line. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub database: Option<PathBuf>,
    pub history: Option<PathBuf>,
    pub ignore: Option<String>,
    pub host: Option<String>,
    pub session: Option<String>,
    pub exit_status: Option<String>,
}

/// Contents of `~/.histdb/import.yaml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConfigFile {
    /// Database location
    pub database: Option<PathBuf>,

    /// History file location
    pub history: Option<PathBuf>,

    /// Comma-joined ignore list
    pub ignore: Option<String>,

    /// Host name override
    pub host: Option<String>,
}

impl ConfigFile {
    /// Loads the config file, or defaults if it does not exist.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_saphyr::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".histdb").join("import.yaml"))
    }
}

impl ImportConfig {
    /// Resolves the configuration from flags, environment, and config file.
    pub fn load(overrides: ConfigOverrides) -> Result<Self> {
        let file = ConfigFile::load()?;
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(Self::resolve(overrides, file, &home, |key| env::var(key).ok()))
    }

    /// Merges the configuration sources.
    ///
    /// `env` looks up an environment variable; it is a parameter so the
    /// precedence rules can be exercised without touching the process
    /// environment.
    pub fn resolve<F>(overrides: ConfigOverrides, file: ConfigFile, home: &Path, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = overrides
            .database
            .or(file.database)
            .unwrap_or_else(|| home.join(".histdb").join("zsh-history.db"));

        let history_path = overrides
            .history
            .or(file.history)
            .unwrap_or_else(|| home.join(".zsh_history"));

        let ignore = overrides
            .ignore
            .or(file.ignore)
            .map(|list| IgnoreFilter::from_list(&list))
            .unwrap_or_default();

        let host = overrides
            .host
            .or_else(|| env("HISTDB_HOST"))
            .or(file.host)
            .unwrap_or_else(detect_hostname);

        let session = overrides
            .session
            .or_else(|| env("HISTDB_SESSION"))
            .unwrap_or_else(|| "0".to_string());

        Self {
            db_path,
            history_path,
            ignore,
            host,
            dir: home.to_string_lossy().to_string(),
            session,
            exit_status: overrides.exit_status.unwrap_or_else(|| "0".to_string()),
        }
    }
}

/// Returns the system host name, or [`UNKNOWN_HOST`].
pub fn detect_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| UNKNOWN_HOST.to_string())
}
