//! Conversation runtime executor

use super::traits::Narrator;
use super::{ChatMessage, RuntimeEvent};

use crate::state_machine::{Conversation, ConvState, Effect, Event};
use serde_json::Value;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;

/// Drives one [`Conversation`], executing the effects its transitions return
pub struct ChatRuntime<N>
where
    N: Narrator + 'static,
{
    conversation: Conversation,
    narrator: N,
    event_rx: mpsc::Receiver<Event>,
    /// Cloned into timer tasks so follow-ups re-enter through the same loop
    event_tx: mpsc::Sender<Event>,
    broadcast_tx: broadcast::Sender<RuntimeEvent>,
    /// Cancelled to stop the loop; also cancels pending timers
    shutdown: CancellationToken,
}

impl<N> ChatRuntime<N>
where
    N: Narrator + 'static,
{
    pub fn new(
        conversation: Conversation,
        narrator: N,
        event_rx: mpsc::Receiver<Event>,
        event_tx: mpsc::Sender<Event>,
        broadcast_tx: broadcast::Sender<RuntimeEvent>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            conversation,
            narrator,
            event_rx,
            event_tx,
            broadcast_tx,
            shutdown,
        }
    }

    pub async fn run(mut self) {
        let session_id = self.conversation.context().session_id.clone();
        tracing::info!(session_id = %session_id, "Starting chat runtime");

        self.broadcast_state();
        for effect in self.conversation.start() {
            self.execute_effect(effect);
        }

        loop {
            tokio::select! {
                biased;

                () = self.shutdown.cancelled() => break,

                Some(event) = self.event_rx.recv() => self.process_event(event),

                else => break,
            }
        }

        tracing::info!(
            session_id = %session_id,
            state = self.conversation.state().name(),
            finished = self.conversation.is_finished(),
            "Chat runtime stopped"
        );
        tracing::debug!(session_id = %session_id, session = ?self.conversation.session(), "Final answers");
    }

    fn process_event(&mut self, event: Event) {
        let before = self.conversation.state();
        let effects = match event {
            // Blank lines and input after the end yield no effects
            Event::UserSubmit { text } => self.conversation.submit(&text),
            event => match self.conversation.handle(event) {
                Ok(effects) => effects,
                Err(e) => {
                    tracing::warn!(error = %e, state = before.name(), "Event rejected");
                    Vec::new()
                }
            },
        };

        if self.conversation.state() != before {
            self.broadcast_state();
        }
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Display { author, text } => {
                let _ = self
                    .broadcast_tx
                    .send(RuntimeEvent::Message(ChatMessage::now(author, text)));
            }

            Effect::Narrate { text } => {
                self.narrator.narrate(&text);
            }

            Effect::ScheduleFollowUp { delay, text } => {
                let event_tx = self.event_tx.clone();
                let shutdown = self.shutdown.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        () = shutdown.cancelled() => {}
                        () = tokio::time::sleep(delay) => {
                            let _ = event_tx.send(Event::FollowUpDue { text }).await;
                        }
                    }
                });
            }

            Effect::DisableInput => {
                tracing::info!(state = self.conversation.state().name(), "Input disabled");
                let _ = self.broadcast_tx.send(RuntimeEvent::InputDisabled);
            }

            Effect::RequestShutdown { after } => {
                tracing::info!(after_ms = after.as_millis(), "Shutdown requested");
                let broadcast_tx = self.broadcast_tx.clone();
                let shutdown = self.shutdown.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        () = shutdown.cancelled() => {}
                        () = tokio::time::sleep(after) => {
                            let _ = broadcast_tx.send(RuntimeEvent::ShutdownRequested);
                        }
                    }
                });
            }
        }
    }

    fn broadcast_state(&self) {
        let state: ConvState = self.conversation.state();
        let state_json = serde_json::to_value(state).unwrap_or(Value::Null);
        let _ = self
            .broadcast_tx
            .send(RuntimeEvent::StateChange { state: state_json });
    }
}
