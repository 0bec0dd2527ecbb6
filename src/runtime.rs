//! Runtime for executing a conversation
//!
//! The runtime owns the state machine, turns its effects into broadcasts for
//! the presentation layer and narrations for the speech queue, and runs the
//! timers for delayed follow-ups.

mod executor;
pub mod traits;


pub use executor::ChatRuntime;
pub use traits::*;

use crate::state_machine::{Author, ChatContext, Conversation, Event};
use chrono::{DateTime, Local};
use serde::Serialize;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A rendered chat line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub author: Author,
    pub text: String,
    pub timestamp: DateTime<Local>,
}

impl ChatMessage {
    pub fn now(author: Author, text: impl Into<String>) -> Self {
        Self {
            author,
            text: text.into(),
            timestamp: Local::now(),
        }
    }
}

/// Events sent to the presentation layer
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    Message(ChatMessage),
    /// The conversation reached a terminal state; stop collecting input
    InputDisabled,
    /// The conversation asked for the application to close
    ShutdownRequested,
    StateChange {
        /// Full state as JSON object (e.g., `{"type":"collecting_age"}`)
        state: serde_json::Value,
    },
}

/// Handle to interact with a running conversation
pub struct ChatHandle {
    event_tx: mpsc::Sender<Event>,
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

impl ChatHandle {
    /// Start a runtime for a fresh conversation. The returned receiver is
    /// subscribed before the greeting is sent, so it sees every message.
    pub fn spawn<N: Narrator + 'static>(
        context: ChatContext,
        narrator: N,
    ) -> (Self, broadcast::Receiver<RuntimeEvent>) {
        let (event_tx, event_rx) = mpsc::channel(32);
        let (broadcast_tx, broadcast_rx) = broadcast::channel(256);
        let shutdown = CancellationToken::new();

        let runtime = ChatRuntime::new(
            Conversation::new(context),
            narrator,
            event_rx,
            event_tx.clone(),
            broadcast_tx,
            shutdown.clone(),
        );
        let task = tokio::spawn(runtime.run());

        (
            Self {
                event_tx,
                shutdown,
                task,
            },
            broadcast_rx,
        )
    }

    /// Forward one line of user input
    pub async fn submit(&self, text: impl Into<String>) -> Result<(), String> {
        self.event_tx
            .send(Event::user(text))
            .await
            .map_err(|e| format!("Failed to send input: {e}"))
    }

    /// Stop the runtime and any pending timers
    pub async fn shutdown(self) {
        self.shutdown.cancel();
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Chat runtime panicked");
        }
    }
}
