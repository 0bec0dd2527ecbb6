//! Core conversation state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.

mod conversation;
mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use conversation::Conversation;
pub use effect::{Author, Effect};
pub use event::Event;
pub use state::{ChatContext, Completion, ConvState, Session};
pub use transition::{opening, transition, TransitionError};
