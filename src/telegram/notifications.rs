//! Outbound notification helpers.
//!
//! Notifications are best-effort: a blocked bot or a deleted chat must never
//! take down the flow that triggered the message, so failures are logged and
//! reported as a boolean.

use teloxide::prelude::*;
use teloxide::types::{ChatId, ParseMode};

use crate::core::config;
use crate::storage::leads::Lead;

use super::views;

/// Send an HTML notification to a chat. Returns whether delivery succeeded.
pub async fn send_notification(bot: &Bot, chat_id: i64, text: &str) -> bool {
    match bot
        .send_message(ChatId(chat_id), text)
        .parse_mode(ParseMode::Html)
        .await
    {
        Ok(_) => true,
        Err(e) => {
            log::warn!("Failed to send notification to {}: {}", chat_id, e);
            false
        }
    }
}

/// Alert the admin chat about a freshly created lead, with the status action
/// buttons attached. Returns whether delivery succeeded.
pub async fn send_lead_alert(bot: &Bot, lead: &Lead) -> bool {
    let Some(admin) = *config::ADMIN_CHAT_ID else {
        log::warn!("Lead alert for #{} dropped: ADMIN_CHAT_ID is not set", lead.id);
        return false;
    };
    match bot
        .send_message(ChatId(admin), views::new_lead_admin(lead))
        .parse_mode(ParseMode::Html)
        .reply_markup(views::lead_action_keyboard(lead.id))
        .await
    {
        Ok(_) => true,
        Err(e) => {
            log::warn!("Failed to send lead alert for #{}: {}", lead.id, e);
            false
        }
    }
}
