//! SQLite persistence: leads, chat language preferences, dynamic catalog rows.

pub mod catalog;
pub mod db;
pub mod languages;
pub mod leads;

pub use db::{create_pool, get_connection, DbConnection, DbPool};
