use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing_subscriber::EnvFilter;

mod bot;
mod config;
mod db;
mod weather;

use bot::commands::BotCommand;
use config::AppConfig;
use db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("🌦 Starting weather bot...");

    // Load config
    let config = AppConfig::from_env()?;
    tracing::info!("Config loaded. Weather endpoint: {}", config.weather_api_url);

    // Initialize database
    let db = Database::connect(&config.database_url).await?;
    db.run_migrations().await?;
    tracing::info!("Database connected and migrations applied.");

    let weather = weather::OpenWeatherClient::new(&config)?;

    // Build shared application state
    let state = Arc::new(bot::AppState {
        config: config.clone(),
        db,
        weather,
    });

    // Create the Telegram bot
    let bot = Bot::new(&state.config.telegram_bot_token);

    if let Err(e) = bot.set_my_commands(BotCommand::bot_commands()).await {
        tracing::warn!("Failed to register the command menu: {}", e);
    }

    // Build the dispatcher
    let handler = bot::build_handler();

    // One queue per user keeps a user's dialogue steps strictly ordered.
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .distribution_function(|update: &Update| update.from().map(|user| user.id))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
