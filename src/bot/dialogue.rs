//! The "set location" conversation as a pure state machine.
//!
//! Transitions know nothing about Telegram or Postgres: they map the current
//! state and one input to the next state plus the effect the caller performs.

use crate::db::models::{Coordinates, SessionState};

/// Exact text of the reply-keyboard button that abandons the flow.
pub const CANCEL_TEXT: &str = "Cancel";

#[derive(Debug, Clone, PartialEq)]
pub enum DialogueInput {
    /// The `/set_location` command.
    SetLocation,
    Location(Coordinates),
    Text(String),
}

impl DialogueInput {
    pub fn text(text: &str) -> Self {
        DialogueInput::Text(text.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Show the stored location and offer the location/cancel keyboard.
    Prompt,
    Save(Coordinates),
    /// Input consumed without a reply.
    Nothing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub next: SessionState,
    pub effect: Effect,
}

impl Transition {
    fn to(next: SessionState, effect: Effect) -> Self {
        Self { next, effect }
    }
}

pub fn transition(state: SessionState, input: &DialogueInput) -> Transition {
    use SessionState::*;

    match (state, input) {
        // Re-entering while already waiting just shows the prompt again.
        (_, DialogueInput::SetLocation) => Transition::to(AwaitingLocation, Effect::Prompt),
        (AwaitingLocation, DialogueInput::Location(location)) => {
            Transition::to(Idle, Effect::Save(*location))
        }
        (AwaitingLocation, DialogueInput::Text(text)) if text == CANCEL_TEXT => {
            Transition::to(Idle, Effect::Nothing)
        }
        (AwaitingLocation, _) => Transition::to(AwaitingLocation, Effect::Nothing),
        (Idle, _) => Transition::to(Idle, Effect::Nothing),
    }
}
