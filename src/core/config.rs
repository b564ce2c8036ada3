//! Configuration for the bot, read once from the environment.

use once_cell::sync::Lazy;
use std::env;

/// Path to the SQLite database file.
/// Read from the DATABASE_PATH environment variable.
pub static DATABASE_PATH: Lazy<String> =
    Lazy::new(|| env::var("DATABASE_PATH").unwrap_or_else(|_| "induktr.sqlite".to_string()));

/// Path to the log file.
/// Read from the LOG_FILE_PATH environment variable.
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "induktr-bot.log".to_string()));

/// Telegram bot token.
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable.
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_default()
});

/// Chat id of the single admin chat that receives lead notifications and may
/// run privileged commands. Read from ADMIN_CHAT_ID, falling back to the
/// legacy TELEGRAM_CHAT_ID variable. When unset, admin commands are disabled.
pub static ADMIN_CHAT_ID: Lazy<Option<i64>> = Lazy::new(|| {
    env::var("ADMIN_CHAT_ID")
        .or_else(|_| env::var("TELEGRAM_CHAT_ID"))
        .ok()
        .and_then(|v| v.trim().parse().ok())
});

/// Shared secret for the agent control API (`x-agent-secret` header).
/// When unset the agent server is not started.
pub static AGENT_SECRET: Lazy<Option<String>> = Lazy::new(|| {
    env::var("AGENT_SECRET_KEY").ok().filter(|s| !s.is_empty())
});

/// Port for the agent control API.
pub static AGENT_PORT: Lazy<u16> = Lazy::new(|| {
    env::var("AGENT_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8081)
});

/// Public URL Telegram should deliver webhook updates to (webhook mode only).
pub static WEBHOOK_URL: Lazy<Option<String>> = Lazy::new(|| env::var("WEBHOOK_URL").ok());

/// Local port the webhook listener binds to.
pub static WEBHOOK_PORT: Lazy<u16> = Lazy::new(|| {
    env::var("WEBHOOK_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8443)
});

/// Fallback download link shown to a client when an order is approved before
/// the admin attached a materials URL.
pub const MATERIALS_FALLBACK_URL: &str = "https://induktr.com/download/example.zip";

/// Access code configuration.
pub mod access_code {
    /// Code length in characters (uppercase alphanumeric, 36^8 space).
    pub const LENGTH: usize = 8;

    /// How many times lead creation re-rolls the code on a UNIQUE collision.
    pub const MAX_ATTEMPTS: u32 = 5;
}
