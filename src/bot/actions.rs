//! What each command and dialogue step does, independent of the transport.
//!
//! Storage and provider failures end here as plain-language replies; only a
//! failure to send a reply is returned to the dispatcher.

use teloxide::utils::command::BotCommands;

use crate::bot::commands::BotCommand;
use crate::bot::dialogue::{self, DialogueInput, Effect};
use crate::bot::messenger::{Keyboard, Messenger};
use crate::db::models::{Coordinates, SessionState};
use crate::db::{LocationStore, SessionStore, StorageError};
use crate::weather::WeatherGateway;

pub const WELCOME: &str = "Welcome to the weather bot!\n\
                           Here you can get a forecast for any location!";
pub const LOCATION_NOT_SET: &str = "Your current location is not set";
pub const LOCATION_NOT_SET_HINT: &str = "Your current location is not set\n\
                                         Please use this command /set_location";
pub const CURRENT_LOCATION: &str = "Your current location: ";
pub const ASK_NEW_LOCATION: &str = "Do you want to set the new location?";
pub const LOCATION_SAVED: &str = "The new location is successfully set";
pub const LOCATION_SAVE_FAILED: &str =
    "Sorry, I couldn't save your location. Please try again later.";
pub const FORECAST_FAILED: &str =
    "Sorry, I couldn't fetch the forecast right now. Please try again later.";
pub const STORAGE_FAILED: &str = "Sorry, something went wrong on my side. Please try again later.";

pub struct Services<'a> {
    pub locations: &'a dyn LocationStore,
    pub sessions: &'a dyn SessionStore,
    pub weather: &'a dyn WeatherGateway,
    pub messenger: &'a dyn Messenger,
}

impl Services<'_> {
    pub async fn start(&self, chat_id: i64) -> anyhow::Result<()> {
        self.reply(chat_id, WELCOME).await?;
        self.help(chat_id).await
    }

    pub async fn help(&self, chat_id: i64) -> anyhow::Result<()> {
        self.reply(chat_id, &BotCommand::descriptions().to_string()).await
    }

    pub async fn get_weather(&self, user_id: i64, chat_id: i64) -> anyhow::Result<()> {
        let location = match self.locations.get(user_id).await {
            Ok(Some(location)) => location,
            Ok(None) => return self.reply(chat_id, LOCATION_NOT_SET_HINT).await,
            Err(e) => {
                tracing::error!("Failed to read location of user {}: {}", user_id, e);
                return self.reply(chat_id, STORAGE_FAILED).await;
            }
        };

        match self.weather.fetch_forecast(location).await {
            Ok(forecast) => self.reply(chat_id, &forecast.to_string()).await,
            Err(e) => {
                tracing::warn!("Forecast for user {} failed: {}", user_id, e);
                self.reply(chat_id, FORECAST_FAILED).await
            }
        }
    }

    /// Feed one input through the set-location dialogue of `user_id`.
    pub async fn converse(
        &self,
        user_id: i64,
        chat_id: i64,
        input: DialogueInput,
    ) -> anyhow::Result<()> {
        let current = match self.sessions.load_state(user_id).await {
            Ok(state) => state,
            // An unrecognised stored value restarts the dialogue; the next save overwrites it.
            Err(StorageError::CorruptSession(raw)) => {
                tracing::warn!(
                    "Dialogue state {:?} of user {} is unknown, assuming idle",
                    raw,
                    user_id
                );
                SessionState::Idle
            }
            Err(e) => {
                tracing::error!("Failed to load dialogue state of user {}: {}", user_id, e);
                return self.reply(chat_id, STORAGE_FAILED).await;
            }
        };

        let step = dialogue::transition(current, &input);

        // Persist first so a failing side effect cannot leave the user mid-flow.
        if step.next != current {
            if let Err(e) = self.sessions.save_state(user_id, step.next).await {
                tracing::error!(
                    "Failed to move user {} from {} to {}: {}",
                    user_id,
                    current,
                    step.next,
                    e
                );
                return self.reply(chat_id, STORAGE_FAILED).await;
            }
            tracing::debug!("User {} dialogue: {} -> {}", user_id, current, step.next);
        }

        match step.effect {
            Effect::Prompt => self.prompt_for_location(user_id, chat_id).await,
            Effect::Save(location) => self.save_location(user_id, chat_id, location).await,
            Effect::Nothing => Ok(()),
        }
    }

    async fn prompt_for_location(&self, user_id: i64, chat_id: i64) -> anyhow::Result<()> {
        match self.locations.get(user_id).await {
            Ok(Some(location)) => {
                self.reply(chat_id, CURRENT_LOCATION).await?;
                self.messenger.send_location(chat_id, location).await?;
            }
            Ok(None) => self.reply(chat_id, LOCATION_NOT_SET).await?,
            Err(e) => {
                tracing::error!("Failed to read location of user {}: {}", user_id, e);
            }
        }

        self.messenger
            .send_text(chat_id, ASK_NEW_LOCATION, Keyboard::LocationRequest)
            .await
    }

    async fn save_location(
        &self,
        user_id: i64,
        chat_id: i64,
        location: Coordinates,
    ) -> anyhow::Result<()> {
        let text = match self.locations.upsert(user_id, location).await {
            Ok(()) => {
                tracing::info!(
                    "User {} set location to ({}, {})",
                    user_id,
                    location.latitude,
                    location.longitude
                );
                LOCATION_SAVED
            }
            Err(e) => {
                tracing::error!("Failed to save location of user {}: {}", user_id, e);
                LOCATION_SAVE_FAILED
            }
        };

        self.messenger.send_text(chat_id, text, Keyboard::Remove).await
    }

    async fn reply(&self, chat_id: i64, text: &str) -> anyhow::Result<()> {
        self.messenger
            .send_text(chat_id, text, Keyboard::Unchanged)
            .await
    }
}
