//! Text-to-speech backends.
//!
//! The pet only needs to say a line of text. [`CommandSpeech`] hands the
//! text to an external program such as `espeak` or `say`; [`SilentSpeech`]
//! is used when the pet is muted.

use crate::error::{Error, Result};
use std::process::Stdio;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::process::Command;
use tokio::runtime::Handle;
use tracing::{debug, warn};

/// Something that can say text out loud.
pub trait SpeechService {
    /// Say `text`. Returns once the utterance has been handed off.
    fn speak(&mut self, text: &str) -> Result<()>;
}

/// Speaks by spawning an external text-to-speech command per utterance.
///
/// Utterances do not block the event loop. Each child is awaited on the
/// tokio runtime it was spawned from and reaped as soon as it exits; any
/// still running when the runtime shuts down are killed.
#[derive(Debug)]
pub struct CommandSpeech {
    command: String,
    args: Vec<String>,
    speaking: Arc<AtomicUsize>,
}

impl CommandSpeech {
    /// Create a backend that runs `command args... <text>`.
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            speaking: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// The command this backend runs.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Number of utterances whose process has not exited yet.
    pub fn in_flight(&self) -> usize {
        self.speaking.load(Ordering::SeqCst)
    }
}

impl SpeechService for CommandSpeech {
    fn speak(&mut self, text: &str) -> Result<()> {
        let runtime = Handle::try_current()
            .map_err(|e| Error::speech_error(format!("no async runtime to speak on: {}", e)))?;

        let mut child = Command::new(&self.command)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::speech_error(format!("speech command not found: '{}'", self.command))
                } else {
                    Error::speech_error(format!("failed to spawn '{}': {}", self.command, e))
                }
            })?;

        debug!(command = %self.command, pid = child.id(), "speaking");
        self.speaking.fetch_add(1, Ordering::SeqCst);
        let speaking = Arc::clone(&self.speaking);
        let command = self.command.clone();
        runtime.spawn(async move {
            match child.wait().await {
                Ok(status) if !status.success() => {
                    warn!(%command, %status, "speech command failed");
                }
                Ok(_) => {}
                Err(e) => warn!(%command, "failed to wait for speech command: {}", e),
            }
            speaking.fetch_sub(1, Ordering::SeqCst);
        });
        Ok(())
    }
}

/// A speech backend that says nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSpeech;

impl SpeechService for SilentSpeech {
    fn speak(&mut self, text: &str) -> Result<()> {
        debug!(text, "speech muted");
        Ok(())
    }
}
