//! djbot - a voice-narrated nightclub chatbot
//!
//! A terminal chat in which "David" collects a visitor's name and age,
//! recommends DJs, and asks for feedback. Bot lines are read aloud.

mod catalog;
mod config;
mod narration;
mod runtime;
mod shell;
mod state_machine;

use config::ChatConfig;
use narration::NarrationQueue;
use runtime::ChatHandle;
use state_machine::ChatContext;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they stay out of the transcript
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "djbot=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = ChatConfig::from_env();
    tracing::info!(?config, "Configuration loaded");

    let narration = Arc::new(NarrationQueue::spawn(config.synthesizer()));

    let session_id = uuid::Uuid::new_v4().to_string();
    let context = ChatContext::new(session_id).with_delays(config.follow_up_delay, config.shutdown_delay);
    let (chat, events) = ChatHandle::spawn(context, narration.clone());

    let result = shell::run(chat, events).await;

    // Stop any speech still playing before exiting
    narration.shutdown().await;
    result?;
    Ok(())
}
