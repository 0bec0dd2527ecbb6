//! Speech synthesizers
//!
//! Speech is delegated to an external command (`say`, `espeak`, ...) that
//! receives the text as its only argument and exits when done speaking.

use super::NarrationError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

#[cfg(unix)]
use nix::sys::signal::{killpg, Signal};
#[cfg(unix)]
use nix::unistd::Pid;

/// Speaks text, returning once speech has finished
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Speak `text`. Must return promptly with [`NarrationError::Cancelled`]
    /// once `cancel` fires.
    async fn speak(&self, text: &str, cancel: CancellationToken) -> Result<(), NarrationError>;

    /// Display name for logs
    fn name(&self) -> String;
}

#[async_trait]
impl<T: Synthesizer + ?Sized> Synthesizer for Arc<T> {
    async fn speak(&self, text: &str, cancel: CancellationToken) -> Result<(), NarrationError> {
        (**self).speak(text, cancel).await
    }

    fn name(&self) -> String {
        (**self).name()
    }
}

// ============================================================================
// External command
// ============================================================================

/// Runs a speech command once per narration
#[derive(Debug, Clone)]
pub struct CommandSynthesizer {
    program: PathBuf,
}

impl CommandSynthesizer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Resolve `command` on `PATH`
    pub fn locate(command: &str) -> Result<Self, NarrationError> {
        which::which(command)
            .map(Self::new)
            .map_err(|e| NarrationError::Unavailable(format!("{command}: {e}")))
    }

    /// The platform's usual speech command
    pub fn default_command() -> &'static str {
        if cfg!(target_os = "macos") {
            "say"
        } else {
            "espeak"
        }
    }

    /// Kill a process group immediately with SIGKILL.
    #[cfg(unix)]
    fn kill_process_group(pid: Option<u32>) {
        let Some(pid) = pid else { return };
        let pgid = Pid::from_raw(pid.cast_signed());
        tracing::debug!(pgid = pid, "Sending SIGKILL to speech process group");
        let _ = killpg(pgid, Signal::SIGKILL);
    }

    #[cfg(not(unix))]
    fn kill_process_group(_pid: Option<u32>) {
        // kill_on_drop covers the direct child
    }
}

/// Quotes confuse some speech engines' argument handling
fn clean_text(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '"' | '\'')).collect()
}

#[async_trait]
impl Synthesizer for CommandSynthesizer {
    async fn speak(&self, text: &str, cancel: CancellationToken) -> Result<(), NarrationError> {
        let cleaned = clean_text(text);
        if cleaned.trim().is_empty() {
            return Err(NarrationError::Rejected("nothing to speak".to_string()));
        }

        let mut cmd = Command::new(&self.program);
        cmd.arg(&cleaned)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Own process group so engines that fork helpers die with it
        #[cfg(unix)]
        unsafe {
            cmd.pre_exec(|| {
                nix::unistd::setpgid(nix::unistd::Pid::from_raw(0), nix::unistd::Pid::from_raw(0))
                    .ok();
                Ok(())
            });
        }

        let child = cmd.spawn().map_err(|e| {
            NarrationError::Unavailable(format!("{}: {e}", self.program.display()))
        })?;
        let pid = child.id();

        tokio::select! {
            biased;

            () = cancel.cancelled() => {
                Self::kill_process_group(pid);
                Err(NarrationError::Cancelled)
            }

            result = child.wait_with_output() => {
                let output = result.map_err(|e| NarrationError::Unavailable(e.to_string()))?;
                if output.status.success() {
                    Ok(())
                } else {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    let exit_code = output.status.code().unwrap_or(-1);
                    Err(NarrationError::Rejected(format!(
                        "exit code {exit_code}: {}",
                        stderr.trim()
                    )))
                }
            }
        }
    }

    fn name(&self) -> String {
        self.program.display().to_string()
    }
}

// ============================================================================
// Muted
// ============================================================================

/// Accepts every narration and says nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct MutedSynthesizer;

#[async_trait]
impl Synthesizer for MutedSynthesizer {
    async fn speak(&self, text: &str, _cancel: CancellationToken) -> Result<(), NarrationError> {
        tracing::trace!(chars = text.chars().count(), "Narration muted");
        Ok(())
    }

    fn name(&self) -> String {
        "muted".to_string()
    }
}
