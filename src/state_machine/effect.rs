//! Effects produced by state transitions

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Author {
    User,
    Bot,
}

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Show a message in the chat
    Display { author: Author, text: String },

    /// Hand bot text to the narration queue
    Narrate { text: String },

    /// Deliver a bot message later as an [`Event::FollowUpDue`](super::Event::FollowUpDue)
    ScheduleFollowUp { delay: Duration, text: String },

    /// Stop accepting input
    DisableInput,

    /// Ask the shell to close after a delay
    RequestShutdown { after: Duration },
}

impl Effect {
    pub fn echo_user(text: impl Into<String>) -> Self {
        Effect::Display {
            author: Author::User,
            text: text.into(),
        }
    }

    /// Bot messages are always shown and spoken together
    pub fn bot_message(text: impl Into<String>) -> [Self; 2] {
        let text = text.into();
        [
            Effect::Display {
                author: Author::Bot,
                text: text.clone(),
            },
            Effect::Narrate { text },
        ]
    }

    pub fn follow_up(delay: Duration, text: impl Into<String>) -> Self {
        Effect::ScheduleFollowUp {
            delay,
            text: text.into(),
        }
    }

    /// Text of a displayed message, if this is one
    #[cfg(test)]
    pub fn displayed(&self) -> Option<(Author, &str)> {
        match self {
            Effect::Display { author, text } => Some((*author, text.as_str())),
            _ => None,
        }
    }
}
