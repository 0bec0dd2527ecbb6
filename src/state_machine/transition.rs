//! Pure state transition function
//!
//! Given the same state, session, and event this always produces the same
//! result. Timers, narration, and rendering happen in the runtime when it
//! executes the returned effects.

use super::state::{MAX_RATING, MINIMUM_AGE};
use super::{ChatContext, Completion, ConvState, Effect, Event, Session};
use crate::catalog::{self, BOT_NAME, WEBSITE};
use std::time::Duration;
use thiserror::Error;

const AFFIRMATIVE: &[&str] = &["yes", "y", "yeah", "sure"];

/// Keyword groups checked in order; the first group with a substring hit wins
const RECOMMENDATIONS: &[(&[&str], &str)] = &[
    (
        &["house", "tech"],
        "Great choice! I recommend checking out DJ MICKY's house and deep tech sets. They're known for groovy basslines!",
    ),
    (
        &["chill", "tropical"],
        "Perfect! DJ FUSION's tropical house sets would be perfect for you. Very relaxing vibes!",
    ),
    (
        &["techno", "progressive"],
        "Awesome! You should definitely check out DJ IPRO's techno sets at The Factory. Mind-bending beats guaranteed!",
    ),
];

const DEFAULT_RECOMMENDATION: &str = "Cool! Based on that, I think you'd enjoy our Sunday Brunch sessions with DJ FUSION. It's a great mix of different styles!";

const EVENTS_QUESTION: &str =
    "Would you like to hear about our upcoming events and gigs? Please say yes or no.";

const FEEDBACK_PROMPT: &str = "How was your experience chatting with me today? Please rate from 1 to 5 stars, where 5 is the best!";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub session: Session,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConvState, session: Session) -> Self {
        Self {
            new_state: state,
            session,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }

    pub fn with_bot_message(self, text: impl Into<String>) -> Self {
        self.with_effects(Effect::bot_message(text))
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Conversation is over, input is disabled")]
    ConversationClosed,
    #[error("Empty input")]
    EmptyInput,
}

/// Messages shown when a conversation opens
pub fn opening() -> [Effect; 2] {
    Effect::bot_message(format!(
        "Hi! I'm {BOT_NAME}, your friendly music & events chatbot! \nWhat's your name?"
    ))
}

/// Pure transition function
pub fn transition(
    state: &ConvState,
    session: &Session,
    context: &ChatContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    let text = match event {
        // Follow-ups belong to the transition that scheduled them, so they are
        // delivered in every state, terminal included
        Event::FollowUpDue { text } => {
            return Ok(TransitionResult::new(*state, session.clone()).with_bot_message(text));
        }
        Event::UserSubmit { .. } if state.is_terminal() => {
            return Err(TransitionError::ConversationClosed);
        }
        Event::UserSubmit { text } => text,
    };

    let input = text.trim();
    if input.is_empty() {
        return Err(TransitionError::EmptyInput);
    }

    let mut next = session.clone();
    let echo = Effect::echo_user(input);

    let result = match state {
        ConvState::CollectingName => {
            next.name = Some(input.to_string());
            TransitionResult::new(ConvState::CollectingAge, next)
                .with_effect(echo)
                .with_bot_message(format!("Nice to meet you, {input}! How old are you?"))
        }

        ConvState::CollectingAge => match parse_age(input) {
            Some(Age::Underage) => TransitionResult::new(
                ConvState::Complete {
                    outcome: Completion::UnderageRejected,
                },
                next,
            )
            .with_effect(echo)
            .with_bot_message(format!(
                "Sorry, you must be {MINIMUM_AGE} or older to use this chatbot. The application will close in {}.",
                describe_delay(context.shutdown_delay)
            ))
            .with_effect(Effect::DisableInput)
            .with_effect(Effect::RequestShutdown {
                after: context.shutdown_delay,
            }),
            Some(Age::Accepted(age)) => {
                next.age = Some(age);
                TransitionResult::new(ConvState::CollectingMusicPreference, next)
                    .with_effect(echo)
                    .with_bot_message("What kind of music do you like?")
            }
            None => TransitionResult::new(*state, next)
                .with_effect(echo)
                .with_bot_message("Please enter a valid number for your age."),
        },

        ConvState::CollectingMusicPreference => TransitionResult::new(ConvState::PresentingDjs, next)
            .with_effect(echo)
            .with_bot_message(recommend(input))
            .with_bot_message(catalog::dj_roster())
            .with_effect(Effect::follow_up(context.follow_up_delay, EVENTS_QUESTION)),

        ConvState::PresentingDjs => {
            let result = TransitionResult::new(ConvState::CollectingFavoriteDj, next).with_effect(echo);
            if is_affirmative(input) {
                result
                    .with_bot_message(catalog::event_roster())
                    .with_effect(Effect::follow_up(
                        context.follow_up_delay,
                        favorite_dj_prompt(),
                    ))
            } else {
                result.with_bot_message(format!("No problem! {}", favorite_dj_prompt()))
            }
        }

        ConvState::CollectingFavoriteDj => {
            let result = match catalog::find_dj(input) {
                Some(dj) => {
                    next.favorite_dj = Some(dj.name);
                    TransitionResult::new(ConvState::CollectingFeedback, next)
                        .with_effect(echo)
                        .with_bot_message(format!(
                            "Great choice! {} is amazing at {}!\nYou can catch them at: {}",
                            dj.name,
                            dj.style,
                            dj.events.join(", ")
                        ))
                }
                None => TransitionResult::new(ConvState::CollectingFeedback, next).with_effect(echo),
            };
            result.with_bot_message(FEEDBACK_PROMPT)
        }

        ConvState::CollectingFeedback => match parse_rating(input) {
            Rating::Valid(rating) => {
                next.feedback_rating = Some(rating);
                let recap = summary(&next);
                TransitionResult::new(
                    ConvState::Complete {
                        outcome: Completion::Finished,
                    },
                    next,
                )
                .with_effect(echo)
                .with_bot_message(recap)
                .with_effect(Effect::follow_up(
                    context.follow_up_delay,
                    WEBSITE.closing_message(),
                ))
                .with_effect(Effect::DisableInput)
            }
            Rating::OutOfRange => TransitionResult::new(*state, next)
                .with_effect(echo)
                .with_bot_message(format!("Please rate between 1 and {MAX_RATING} stars.")),
            Rating::NotANumber => TransitionResult::new(*state, next)
                .with_effect(echo)
                .with_bot_message(format!(
                    "Please enter a valid rating between 1 and {MAX_RATING} stars."
                )),
        },

        ConvState::Complete { .. } => return Err(TransitionError::ConversationClosed),
    };

    Ok(result)
}

// Helper functions

enum Age {
    Underage,
    Accepted(u64),
}

/// `None` when the input is not an integer that fits a `u64`
fn parse_age(input: &str) -> Option<Age> {
    let age: i128 = input.parse().ok()?;
    if age < i128::from(MINIMUM_AGE) {
        return Some(Age::Underage);
    }
    u64::try_from(age).ok().map(Age::Accepted)
}

/// "1 second", "5 seconds", "1.5 seconds"
fn describe_delay(delay: Duration) -> String {
    let millis = delay.as_millis();
    match (millis / 1000, millis % 1000) {
        (1, 0) => "1 second".to_string(),
        (secs, 0) => format!("{secs} seconds"),
        _ => format!("{} seconds", delay.as_secs_f64()),
    }
}

enum Rating {
    Valid(u8),
    OutOfRange,
    NotANumber,
}

fn parse_rating(input: &str) -> Rating {
    match input.parse::<i64>() {
        Ok(n) if (1..=i64::from(MAX_RATING)).contains(&n) => {
            u8::try_from(n).map_or(Rating::OutOfRange, Rating::Valid)
        }
        Ok(_) => Rating::OutOfRange,
        Err(_) => Rating::NotANumber,
    }
}

pub(crate) fn recommend(preference: &str) -> &'static str {
    let preference = preference.to_lowercase();
    RECOMMENDATIONS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| preference.contains(k)))
        .map_or(DEFAULT_RECOMMENDATION, |(_, text)| text)
}

fn is_affirmative(input: &str) -> bool {
    let answer = input.to_lowercase();
    AFFIRMATIVE.contains(&answer.as_str())
}

fn favorite_dj_prompt() -> String {
    format!(
        "Which of our resident DJs is your favorite? Please choose {}.",
        catalog::dj_choices()
    )
}

fn summary(session: &Session) -> String {
    let name = session.name.as_deref().unwrap_or("friend");
    let age = session
        .age
        .map_or_else(|| "unknown".to_string(), |a| a.to_string());
    let dj = session.favorite_dj.unwrap_or("Not chosen");
    let stars = "⭐".repeat(usize::from(session.feedback_rating.unwrap_or(0)));
    format!(
        "\nThank you for chatting with me, {name}! Here's a summary of our conversation:\n• Age: {age}\n• Favorite DJ: {dj}\n• Your Feedback: {stars}\n\nI'd love to see you at our events!\n"
    )
}
