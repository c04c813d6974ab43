use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::bot::dialogue::DialogueInput;
use crate::bot::messenger::TelegramMessenger;
use crate::bot::AppState;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "snake_case", description = "Available commands:")]
pub enum BotCommand {
    #[command(hide)]
    Start,
    #[command(description = "available commands")]
    Help,
    #[command(description = "set a weather forecast location")]
    SetLocation,
    #[command(description = "get a weather forecast")]
    GetWeather,
}

pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: BotCommand,
    state: Arc<AppState>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let user_id = msg.from.as_ref().map(|u| u.id.0 as i64).unwrap_or(0);
    let chat_id = msg.chat.id.0;

    tracing::info!("User {} sent {:?}", user_id, cmd);

    let messenger = TelegramMessenger::new(bot);
    let services = state.services(&messenger);

    match cmd {
        BotCommand::Start => services.start(chat_id).await?,
        BotCommand::Help => services.help(chat_id).await?,
        BotCommand::SetLocation => {
            services
                .converse(user_id, chat_id, DialogueInput::SetLocation)
                .await?
        }
        BotCommand::GetWeather => services.get_weather(user_id, chat_id).await?,
    }

    Ok(())
}
