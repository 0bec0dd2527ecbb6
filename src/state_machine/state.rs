//! Conversation state types

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Youngest age allowed to continue past the age question
pub const MINIMUM_AGE: u32 = 18;

/// Highest star rating accepted as feedback
pub const MAX_RATING: u8 = 5;

// ============================================================================
// Conversation State
// ============================================================================

/// Conversation state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConvState {
    /// Waiting for the user's name
    #[default]
    CollectingName,

    /// Waiting for an age that parses as an integer
    CollectingAge,

    /// Waiting for a free-form description of the user's music taste
    CollectingMusicPreference,

    /// DJ roster shown, waiting for yes/no on the event listing
    PresentingDjs,

    /// Waiting for the user's favorite resident DJ
    CollectingFavoriteDj,

    /// Waiting for a 1-5 star rating
    CollectingFeedback,

    /// No further input accepted
    Complete { outcome: Completion },
}

/// How a conversation reached its terminal state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Completion {
    /// Feedback given, summary shown
    Finished,
    /// User reported an age below [`MINIMUM_AGE`]
    UnderageRejected,
}

impl ConvState {
    /// Check if this is a terminal state (cannot transition out)
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConvState::Complete { .. })
    }

    /// Short label for logs
    pub fn name(&self) -> &'static str {
        match self {
            ConvState::CollectingName => "collecting_name",
            ConvState::CollectingAge => "collecting_age",
            ConvState::CollectingMusicPreference => "collecting_music_preference",
            ConvState::PresentingDjs => "presenting_djs",
            ConvState::CollectingFavoriteDj => "collecting_favorite_dj",
            ConvState::CollectingFeedback => "collecting_feedback",
            ConvState::Complete {
                outcome: Completion::Finished,
            } => "complete",
            ConvState::Complete {
                outcome: Completion::UnderageRejected,
            } => "rejected",
        }
    }
}

// ============================================================================
// Session
// ============================================================================

/// Answers collected so far. Only the transition function produces new values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub name: Option<String>,
    /// Set only once accepted, so always >= [`MINIMUM_AGE`]
    pub age: Option<u64>,
    /// Catalog key of the chosen DJ
    pub favorite_dj: Option<&'static str>,
    pub feedback_rating: Option<u8>,
}

// ============================================================================
// Context
// ============================================================================

/// Context for a conversation (immutable configuration)
#[derive(Debug, Clone)]
pub struct ChatContext {
    pub session_id: String,
    /// Delay before follow-up prompts (events question, closing info)
    pub follow_up_delay: Duration,
    /// Delay between an under-age rejection and shutdown
    pub shutdown_delay: Duration,
}

pub const DEFAULT_FOLLOW_UP_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_SHUTDOWN_DELAY: Duration = Duration::from_secs(5);

impl ChatContext {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            follow_up_delay: DEFAULT_FOLLOW_UP_DELAY,
            shutdown_delay: DEFAULT_SHUTDOWN_DELAY,
        }
    }

    pub fn with_delays(mut self, follow_up: Duration, shutdown: Duration) -> Self {
        self.follow_up_delay = follow_up;
        self.shutdown_delay = shutdown;
        self
    }
}
