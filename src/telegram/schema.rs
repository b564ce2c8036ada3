//! Dispatcher schema: the dptree handler chain and the action performer.
//!
//! The handler tree converts Telegram updates into [`IncomingMessage`] /
//! [`IncomingCallback`], asks the [`Dispatcher`] what to do, and performs the
//! resulting actions. The same schema is used in production and in tests.

use std::sync::Arc;

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::{MaybeInaccessibleMessage, ParseMode};

use super::dispatch::{Action, Dispatcher, IncomingCallback, IncomingMessage};

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub dispatcher: Arc<Dispatcher>,
}

/// Creates the main dispatcher schema for the Telegram bot.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_messages = deps.clone();
    let deps_callbacks = deps;

    dptree::entry()
        .branch(Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
            let deps = deps_messages.clone();
            async move {
                if let Some(text) = msg.text() {
                    let incoming = IncomingMessage {
                        chat_id: msg.chat.id.0,
                        text: text.to_string(),
                        username: msg.from.as_ref().and_then(|u| u.username.clone()),
                        first_name: msg.from.as_ref().map(|u| u.first_name.clone()),
                    };
                    let actions = deps.dispatcher.handle_message(&incoming);
                    perform_sends(&bot, actions).await;
                }
                Ok(())
            }
        }))
        .branch(Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
            let deps = deps_callbacks.clone();
            async move {
                let Some(data) = q.data.clone() else {
                    if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
                        log::warn!("Failed to answer callback query: {}", e);
                    }
                    return Ok(());
                };

                let (chat_id, message_id) = match q.message.as_ref() {
                    Some(m) => (m.chat().id.0, m.id().0),
                    None => {
                        // Still acknowledge, or the client shows a spinner.
                        if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
                            log::warn!("Failed to answer callback query: {}", e);
                        }
                        return Ok(());
                    }
                };
                let message_text = q.message.as_ref().and_then(|m| match m {
                    MaybeInaccessibleMessage::Regular(msg) => msg.text().map(str::to_owned),
                    MaybeInaccessibleMessage::Inaccessible(_) => None,
                });

                let incoming = IncomingCallback { chat_id, message_id, message_text, data };
                let actions = deps.dispatcher.handle_callback(&incoming);

                for action in actions {
                    match action {
                        Action::AnswerCallback { text } => {
                            let mut req = bot.answer_callback_query(q.id.clone());
                            if let Some(text) = text {
                                req = req.text(text);
                            }
                            if let Err(e) = req.await {
                                log::warn!("Failed to answer callback query: {}", e);
                            }
                        }
                        other => perform_one(&bot, other).await,
                    }
                }
                Ok(())
            }
        }))
}

/// Perform message-context actions. Answering a callback has no meaning here.
async fn perform_sends(bot: &Bot, actions: Vec<Action>) {
    for action in actions {
        match action {
            Action::AnswerCallback { .. } => {
                log::warn!("AnswerCallback action outside a callback context, ignoring");
            }
            other => perform_one(bot, other).await,
        }
    }
}

/// Execute a single outbound action, swallowing transport errors.
async fn perform_one(bot: &Bot, action: Action) {
    match action {
        Action::Send { chat_id, text, keyboard } => {
            let mut req = bot
                .send_message(ChatId(chat_id), text)
                .parse_mode(ParseMode::Html);
            if let Some(keyboard) = keyboard {
                req = req.reply_markup(keyboard);
            }
            if let Err(e) = req.await {
                log::warn!("Failed to send message to {}: {}", chat_id, e);
            }
        }
        Action::EditText { chat_id, message_id, text } => {
            if let Err(e) = bot
                .edit_message_text(ChatId(chat_id), teloxide::types::MessageId(message_id), text)
                .parse_mode(ParseMode::Html)
                .await
            {
                log::warn!("Failed to edit message {} in {}: {}", message_id, chat_id, e);
            }
        }
        Action::AnswerCallback { .. } => {}
    }
}
