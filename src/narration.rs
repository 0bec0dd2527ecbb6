//! Narration queue
//!
//! Bot messages are spoken one at a time, in the order they were enqueued, by a
//! single consumer task. Enqueueing never blocks the caller.

mod synthesizer;


pub use synthesizer::{CommandSynthesizer, MutedSynthesizer, Synthesizer};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Errors from a speech synthesizer
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NarrationError {
    #[error("Speech synthesizer unavailable: {0}")]
    Unavailable(String),
    #[error("Speech synthesizer rejected text: {0}")]
    Rejected(String),
    #[error("Narration cancelled")]
    Cancelled,
}

/// One queued piece of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrationItem {
    pub seq: u64,
    pub text: String,
}

/// Progress notifications from the consumer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarrationEvent {
    Started { seq: u64 },
    Finished { seq: u64 },
    Failed { seq: u64, error: NarrationError },
}

/// Handle to the narration consumer task
pub struct NarrationQueue {
    tx: mpsc::UnboundedSender<NarrationItem>,
    /// Observers subscribe here; the consumer holds its own clone
    #[cfg_attr(not(test), allow(dead_code))]
    events: broadcast::Sender<NarrationEvent>,
    cancel: CancellationToken,
    next_seq: AtomicU64,
    consumer: Mutex<Option<JoinHandle<()>>>,
}

impl NarrationQueue {
    /// Start the consumer task. Must be called inside a tokio runtime.
    pub fn spawn<S: Synthesizer + 'static>(synthesizer: S) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(128);
        let cancel = CancellationToken::new();

        tracing::info!(synthesizer = %synthesizer.name(), "Starting narration queue");
        let consumer = tokio::spawn(consume(synthesizer, rx, events.clone(), cancel.clone()));

        Self {
            tx,
            events,
            cancel,
            next_seq: AtomicU64::new(0),
            consumer: Mutex::new(Some(consumer)),
        }
    }

    /// Append text to the tail. Never blocks; items wait while the consumer
    /// is busy. Returns the item's sequence number.
    pub fn enqueue(&self, text: impl Into<String>) -> u64 {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let item = NarrationItem {
            seq,
            text: text.into(),
        };
        if let Err(mpsc::error::SendError(item)) = self.tx.send(item) {
            tracing::debug!(seq = item.seq, "Narration queue closed, dropping item");
        }
        seq
    }

    #[cfg(test)]
    pub fn subscribe(&self) -> broadcast::Receiver<NarrationEvent> {
        self.events.subscribe()
    }

    /// Kill any in-flight narration, drop pending items, and wait for the
    /// consumer to exit. Safe to call more than once.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        let handle = self
            .consumer
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Narration consumer panicked");
            }
        }
    }
}

impl Drop for NarrationQueue {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn consume<S: Synthesizer>(
    synthesizer: S,
    mut rx: mpsc::UnboundedReceiver<NarrationItem>,
    events: broadcast::Sender<NarrationEvent>,
    cancel: CancellationToken,
) {
    loop {
        let item = tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            item = rx.recv() => match item {
                Some(item) => item,
                None => break,
            },
        };

        let seq = item.seq;
        tracing::debug!(seq, chars = item.text.chars().count(), "Narrating");
        let _ = events.send(NarrationEvent::Started { seq });

        match synthesizer.speak(&item.text, cancel.child_token()).await {
            Ok(()) => {
                let _ = events.send(NarrationEvent::Finished { seq });
            }
            Err(NarrationError::Cancelled) => {
                tracing::info!(seq, "Narration interrupted");
                let _ = events.send(NarrationEvent::Failed {
                    seq,
                    error: NarrationError::Cancelled,
                });
                break;
            }
            Err(error) => {
                tracing::warn!(seq, error = %error, "Narration failed, skipping");
                let _ = events.send(NarrationEvent::Failed { seq, error });
            }
        }
    }

    rx.close();
    let mut dropped = 0usize;
    while rx.try_recv().is_ok() {
        dropped += 1;
    }
    tracing::info!(dropped, "Narration queue stopped");
}
