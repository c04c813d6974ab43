pub mod actions;
pub mod commands;
pub mod dialogue;
pub mod handlers;
pub mod messenger;

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::dptree;
use teloxide::prelude::*;

use crate::config::AppConfig;
use crate::db::Database;
use crate::weather::OpenWeatherClient;
use actions::Services;
use messenger::Messenger;

/// Shared application state, accessible from all handlers.
pub struct AppState {
    pub config: AppConfig,
    pub db: Database,
    pub weather: OpenWeatherClient,
}

impl AppState {
    pub fn services<'a>(&'a self, messenger: &'a dyn Messenger) -> Services<'a> {
        Services {
            locations: &self.db,
            sessions: &self.db,
            weather: &self.weather,
            messenger,
        }
    }
}

/// Build the teloxide update handler tree.
pub fn build_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    let command_handler = Update::filter_message()
        .filter_command::<commands::BotCommand>()
        .endpoint(commands::handle_command);

    let message_handler = Update::filter_message()
        .endpoint(handlers::handle_message);

    dptree::entry()
        .branch(command_handler)
        .branch(message_handler)
}
