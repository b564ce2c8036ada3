//! Bot initialization and command registration.

use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::core::config;

/// Public bot commands with descriptions.
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "I can:")]
pub enum Command {
    #[command(description = "welcome message, or link an order with an access code")]
    Start,
    #[command(description = "choose a language")]
    Lang,
    #[command(description = "browse the template marketplace")]
    Marketplace,
    #[command(description = "see our portfolio")]
    Portfolio,
    #[command(description = "who we are")]
    About,
    #[command(description = "frequently asked questions")]
    Faq,
    #[command(description = "payment options")]
    Payment,
}

/// Creates a Bot instance from the configured token.
///
/// # Returns
/// * `Ok(Bot)` - Successfully created bot instance
/// * `Err(anyhow::Error)` - No token configured
pub fn create_bot() -> anyhow::Result<Bot> {
    let token = config::BOT_TOKEN.as_str();
    if token.is_empty() {
        anyhow::bail!("BOT_TOKEN is not set");
    }
    Ok(Bot::new(token))
}

/// Sets up bot commands in the Telegram UI.
///
/// Admin commands (/leads, /ready, /msg) are deliberately not registered; the
/// admin knows them and clients should not see them in the command menu.
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(Command::bot_commands()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_public_commands_are_registered() {
        let commands = Command::bot_commands();
        assert_eq!(commands.len(), 7);
        assert!(commands.iter().any(|c| c.command == "/marketplace" || c.command == "marketplace"));
    }
}
