//! histdb-import - load a zsh history file into a zsh-histdb database
//!
//! The history file is read as logical entries, each entry is parsed into
//! its start time, duration, and command, trivial commands are dropped, and
//! the rest are written to the `commands`, `places`, and `history` tables in
//! a single transaction.

pub mod config;
pub mod error;
pub mod history;
pub mod import;
pub mod storage;

pub use error::ImportError;
