//! Storage layer for histdb

pub mod db;
pub mod models;
pub mod transaction;

pub use db::Database;
pub use models::*;
pub use transaction::ImportTransaction;
