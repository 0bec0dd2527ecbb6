//! Stateful wrapper around the pure transition function

use super::{opening, transition, ChatContext, ConvState, Effect, Event, Session, TransitionError};

/// Owns the current state and session and threads them through [`transition`]
#[derive(Debug)]
pub struct Conversation {
    context: ChatContext,
    state: ConvState,
    session: Session,
}

impl Conversation {
    pub fn new(context: ChatContext) -> Self {
        Self {
            context,
            state: ConvState::default(),
            session: Session::default(),
        }
    }

    /// Effects that open the conversation (the greeting)
    pub fn start(&self) -> Vec<Effect> {
        opening().to_vec()
    }

    /// Feed one line of user input. Input that cannot be accepted (blank, or
    /// after the conversation has ended) yields no effects and no change.
    pub fn submit(&mut self, raw: &str) -> Vec<Effect> {
        self.handle(Event::user(raw)).unwrap_or_else(|e| {
            tracing::debug!(session_id = %self.context.session_id, error = %e, "Input ignored");
            Vec::new()
        })
    }

    /// Apply any event, committing the new state and session on success
    pub fn handle(&mut self, event: Event) -> Result<Vec<Effect>, TransitionError> {
        let result = transition(&self.state, &self.session, &self.context, event)?;
        if result.new_state != self.state {
            tracing::debug!(
                session_id = %self.context.session_id,
                from = self.state.name(),
                to = result.new_state.name(),
                "State transition"
            );
        }
        self.state = result.new_state;
        self.session = result.session;
        Ok(result.effects)
    }

    pub fn state(&self) -> ConvState {
        self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn context(&self) -> &ChatContext {
        &self.context
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }
}
