//! Data access and storage
//!
//! CSV import, SQLite database management and in-memory table views.

pub mod database;
pub mod import;
pub mod tables;

pub use database::Database;
pub use tables::{GameLog, RankingLog};
