//! Induktr bot - Telegram bot for the Induktr portfolio and template marketplace
//!
//! This library provides the full bot: command and callback dispatching, the
//! localized catalog (embedded bundles merged with database rows), lead
//! storage with access codes, and the agent control API.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging
//! - `catalog`: embedded catalog bundles and the static/dynamic merge
//! - `storage`: SQLite persistence (leads, languages, dynamic catalog)
//! - `telegram`: dispatcher, views, runner schema, notifications, agent API
//! - `i18n`: Fluent-based localization

pub mod catalog;
pub mod cli;
pub mod core;
pub mod i18n;
pub mod storage;
pub mod telegram;

// Re-export commonly used types for convenience
pub use core::{config, AppError, AppResult};
pub use storage::{create_pool, get_connection, DbConnection, DbPool};
pub use telegram::{schema, Action, Dispatcher, HandlerDeps, IncomingCallback, IncomingMessage};
