//! Events that can occur in a conversation

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// One line typed by the user
    UserSubmit { text: String },

    /// A follow-up scheduled by an earlier transition has come due
    FollowUpDue { text: String },
}

impl Event {
    pub fn user(text: impl Into<String>) -> Self {
        Event::UserSubmit { text: text.into() }
    }
}
