//! cbot CLI: wires the in-memory repositories, the starter command set, the
//! Telegram senders, and the dispatcher, then runs the polling loop.
//! Config comes from env (`BOT_TOKEN`, `TELEGRAM_API_URL`, `LOG_FILE`) with
//! an optional token override on the command line.

mod handlers;

use std::sync::Arc;

use anyhow::Result;
use cbot_core::{init_tracing, AccessLevel, CommandDescriptor};
use cbot_telegram::{
    run_polling, TelegramConfig, TelegramDocumentGroupSender, TelegramDocumentSender,
    TelegramKeyboardEditSender, TelegramLocationSender, TelegramTextSender,
};
use clap::{Parser, Subcommand};
use dispatch::{
    AccessController, AliasResolver, CommandExecutor, CommandRegistry, Dispatcher,
    InMemoryStats, ResponseRouter,
};
use storage::{
    InMemoryAccessRepository, InMemoryAliasRepository, InMemoryDisabledCommandRepository,
    InMemoryWaitingStateRepository,
};
use tracing::info;

use handlers::{AuditAnalyzer, HelpHandler, PingHandler, SettingsHandler};

#[derive(Parser)]
#[command(name = "cbot")]
#[command(about = "Conversational bot pipeline: run the Telegram dispatcher", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bot (config from env; token can override BOT_TOKEN).
    Run {
        #[arg(short, long)]
        token: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run { token } => run(token).await,
    }
}

/// The starter command set. Deployments add their own descriptors and
/// handler registrations alongside these.
fn commands() -> Vec<CommandDescriptor> {
    vec![
        CommandDescriptor::new("set", "set", AccessLevel::Moderator)
            .with_help("manage commands in this chat")
            .as_settings(),
        CommandDescriptor::new("help", "help", AccessLevel::Newcomer)
            .with_help("list available commands"),
        CommandDescriptor::new("ping", "ping", AccessLevel::Newcomer)
            .with_help("liveness check"),
    ]
}

async fn run(token: Option<String>) -> Result<()> {
    let config = match token {
        Some(token) => TelegramConfig::with_token(token),
        None => TelegramConfig::from_env()?,
    };

    let log_file = config.log_file.clone().unwrap_or_else(|| "logs/cbot.log".to_string());
    init_tracing(&log_file)?;

    let bot = config.build_bot()?;

    let descriptors = commands();
    let registry = Arc::new(CommandRegistry::new(descriptors.clone()));
    let stats = Arc::new(InMemoryStats::new());

    let aliases = Arc::new(InMemoryAliasRepository::new(registry.settings_names()));
    let waiting = Arc::new(InMemoryWaitingStateRepository::new());
    let access = Arc::new(InMemoryAccessRepository::new());
    let disabled = Arc::new(InMemoryDisabledCommandRepository::new());

    let router = ResponseRouter::new(stats.clone())
        .register(Arc::new(TelegramTextSender::new(bot.clone())))
        .register(Arc::new(TelegramDocumentSender::new(bot.clone())))
        .register(Arc::new(TelegramDocumentGroupSender::new(bot.clone())))
        .register(Arc::new(TelegramLocationSender::new(bot.clone())))
        .register(Arc::new(TelegramKeyboardEditSender::new(bot.clone())));

    let known_commands: Vec<String> =
        descriptors.iter().map(|d| d.name.clone()).collect();
    let executor = CommandExecutor::new(router, stats.clone())
        .register("ping", Arc::new(PingHandler))
        .register("help", Arc::new(HelpHandler::new(descriptors)))
        .register(
            "set",
            Arc::new(SettingsHandler::new(disabled.clone(), known_commands)),
        );

    let dispatcher = Dispatcher::new(
        registry,
        AliasResolver::new(aliases),
        waiting,
        AccessController::new(access, disabled),
        Arc::new(executor),
        stats,
    )
    .add_analyzer(Arc::new(AuditAnalyzer));

    info!("Bot started");
    run_polling(bot, Arc::new(dispatcher)).await
}
