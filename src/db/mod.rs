//! Database layer: SQLite engine and table modules

pub mod engine;
pub mod tables;

pub use engine::{setup_sqlite, setup_sqlite_at, DbEngine};
