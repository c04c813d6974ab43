use std::sync::Arc;
use teloxide::prelude::*;

use crate::bot::dialogue::DialogueInput;
use crate::bot::messenger::TelegramMessenger;
use crate::bot::AppState;
use crate::db::models::Coordinates;

/// Non-command messages: shared locations and plain text feed the dialogue.
pub async fn handle_message(
    bot: Bot,
    msg: Message,
    state: Arc<AppState>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let user_id = msg.from.as_ref().map(|u| u.id.0 as i64).unwrap_or(0);
    let chat_id = msg.chat.id.0;

    let Some(input) = dialogue_input(&msg) else {
        // Unsupported message type
        return Ok(());
    };

    let messenger = TelegramMessenger::new(bot);
    state
        .services(&messenger)
        .converse(user_id, chat_id, input)
        .await?;

    Ok(())
}

/// A venue share carries a location too and counts as one.
fn dialogue_input(msg: &Message) -> Option<DialogueInput> {
    let location = msg
        .location()
        .or_else(|| msg.venue().map(|venue| &venue.location));

    if let Some(location) = location {
        Some(DialogueInput::Location(Coordinates::new(
            location.latitude,
            location.longitude,
        )))
    } else {
        msg.text().map(DialogueInput::text)
    }
}
