use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::update_listeners::webhooks;

use induktr_bot::cli::{Cli, Commands};
use induktr_bot::core::{config, init_logger};
use induktr_bot::storage::create_pool;
use induktr_bot::telegram::agent::{run_agent_server, AgentState};
use induktr_bot::telegram::{create_bot, schema, setup_bot_commands, Dispatcher, HandlerDeps};

/// Main entry point for the Telegram bot.
///
/// # Errors
/// Returns an error if initialization fails (logging, database, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Load environment variables from .env before any config statics are read
    let _ = dotenv();

    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command {
        Some(Commands::Run { webhook }) => run_bot(webhook).await,
        None => run_bot(false).await,
    }
}

async fn run_bot(use_webhook: bool) -> Result<()> {
    log::info!("Starting bot...");

    let db_pool = Arc::new(create_pool(&config::DATABASE_PATH)?);
    log::info!("Database ready at {}", config::DATABASE_PATH.as_str());

    let bot = create_bot()?;

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    let admin_chat_id = *config::ADMIN_CHAT_ID;
    if admin_chat_id.is_none() {
        log::warn!("ADMIN_CHAT_ID is not set; admin commands and lead notifications are disabled");
    }

    let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&db_pool), admin_chat_id));

    // Agent control API runs alongside the bot when a secret is configured.
    if let Some(secret) = config::AGENT_SECRET.clone() {
        let state = AgentState {
            bot: bot.clone(),
            db_pool: Arc::clone(&db_pool),
            secret,
            started_at: std::time::Instant::now(),
        };
        let port = *config::AGENT_PORT;
        tokio::spawn(async move {
            if let Err(e) = run_agent_server(state, port).await {
                log::error!("Agent API server stopped: {}", e);
            }
        });
    } else {
        log::info!("AGENT_SECRET_KEY is not set; agent API disabled");
    }

    let handler = schema(HandlerDeps { dispatcher });

    if use_webhook {
        let Some(webhook_url) = config::WEBHOOK_URL.clone() else {
            anyhow::bail!("webhook mode requires WEBHOOK_URL");
        };
        let url = url::Url::parse(&webhook_url)?;
        let addr = ([0, 0, 0, 0], *config::WEBHOOK_PORT).into();
        log::info!("Starting bot in webhook mode at {}", webhook_url);

        let listener = webhooks::axum(bot.clone(), webhooks::Options::new(addr, url)).await?;
        teloxide::dispatching::Dispatcher::builder(bot, handler)
            .enable_ctrlc_handler()
            .build()
            .dispatch_with_listener(
                listener,
                LoggingErrorHandler::with_custom_text("An error from the update listener"),
            )
            .await;
    } else {
        log::info!("Starting bot in long polling mode");
        teloxide::dispatching::Dispatcher::builder(bot, handler)
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }

    Ok(())
}
