use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "induktr-bot")]
#[command(author, version, about = "Telegram bot for the Induktr portfolio and template marketplace", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the bot
    Run {
        /// Use webhook mode instead of long polling
        #[arg(long)]
        webhook: bool,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
