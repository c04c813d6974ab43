use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ButtonRequest, KeyboardButton, KeyboardMarkup, KeyboardRemove};

use super::dialogue::CANCEL_TEXT;
use crate::db::models::Coordinates;

/// Reply keyboard to attach to an outgoing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyboard {
    Unchanged,
    /// One-time keyboard with "Send location" and "Cancel".
    LocationRequest,
    Remove,
}

/// Outbound side of the messaging platform.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_text(&self, chat_id: i64, text: &str, keyboard: Keyboard) -> anyhow::Result<()>;

    async fn send_location(&self, chat_id: i64, location: Coordinates) -> anyhow::Result<()>;
}

pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

fn location_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![KeyboardButton::new("Send location").request(ButtonRequest::Location)],
        vec![KeyboardButton::new(CANCEL_TEXT)],
    ])
    .resize_keyboard()
    .one_time_keyboard()
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send_text(&self, chat_id: i64, text: &str, keyboard: Keyboard) -> anyhow::Result<()> {
        let request = self.bot.send_message(ChatId(chat_id), text);
        match keyboard {
            Keyboard::Unchanged => request.await?,
            Keyboard::LocationRequest => request.reply_markup(location_keyboard()).await?,
            Keyboard::Remove => request.reply_markup(KeyboardRemove::new()).await?,
        };
        Ok(())
    }

    async fn send_location(&self, chat_id: i64, location: Coordinates) -> anyhow::Result<()> {
        self.bot
            .send_location(ChatId(chat_id), location.latitude, location.longitude)
            .await?;
        Ok(())
    }
}
