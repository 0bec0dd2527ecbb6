//! Configuration from the environment

use crate::narration::{CommandSynthesizer, MutedSynthesizer, Synthesizer};
use crate::state_machine::state::{DEFAULT_FOLLOW_UP_DELAY, DEFAULT_SHUTDOWN_DELAY};
use std::sync::Arc;
use std::time::Duration;

/// Runtime settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Speech command looked up on PATH
    pub voice_command: String,
    pub mute: bool,
    pub follow_up_delay: Duration,
    pub shutdown_delay: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            voice_command: CommandSynthesizer::default_command().to_string(),
            mute: false,
            follow_up_delay: DEFAULT_FOLLOW_UP_DELAY,
            shutdown_delay: DEFAULT_SHUTDOWN_DELAY,
        }
    }
}

impl ChatConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            voice_command: lookup("DJBOT_VOICE_COMMAND")
                .filter(|c| !c.trim().is_empty())
                .unwrap_or(defaults.voice_command),
            mute: lookup("DJBOT_MUTE").is_some_and(|v| {
                matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
            }),
            follow_up_delay: millis(&lookup, "DJBOT_FOLLOW_UP_DELAY_MS")
                .unwrap_or(defaults.follow_up_delay),
            shutdown_delay: millis(&lookup, "DJBOT_SHUTDOWN_DELAY_MS")
                .unwrap_or(defaults.shutdown_delay),
        }
    }

    /// Pick the synthesizer, falling back to silence if the command is missing
    pub fn synthesizer(&self) -> Arc<dyn Synthesizer> {
        if self.mute {
            tracing::info!("Narration muted");
            return Arc::new(MutedSynthesizer);
        }
        match CommandSynthesizer::locate(&self.voice_command) {
            Ok(synth) => Arc::new(synth),
            Err(e) => {
                tracing::warn!(error = %e, "No speech command found, narration disabled");
                Arc::new(MutedSynthesizer)
            }
        }
    }
}

fn millis(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<Duration> {
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(ms) => Some(Duration::from_millis(ms)),
        Err(e) => {
            tracing::warn!(key, value = %raw, error = %e, "Ignoring invalid duration");
            None
        }
    }
}
