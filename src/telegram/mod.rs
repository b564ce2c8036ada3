//! Telegram bot: dispatcher, views, runner schema, and control surfaces.

pub mod agent;
pub mod bot;
pub mod callbacks;
pub mod dispatch;
pub mod markdown;
pub mod notifications;
pub mod schema;
pub mod views;

pub use bot::{create_bot, setup_bot_commands, Command};
pub use dispatch::{Action, Dispatcher, IncomingCallback, IncomingMessage};
pub use schema::{schema, HandlerDeps, HandlerError};
