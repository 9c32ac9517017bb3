//! Reading and parsing zsh extended-history files.
//!
//! - `reader` - reassembles backslash-continued lines into logical entries
//! - `parser` - splits an entry into start time, duration, and command
//! - `filter` - drops trivial commands before they are stored

pub mod filter;
pub mod parser;
pub mod reader;

pub use filter::{IgnoreFilter, DEFAULT_IGNORED};
pub use parser::{parse_entry, ParsedEntry};
pub use reader::EntryReader;
