//! Looping background audio.
//!
//! Only the intro music uses this: it loops from first launch until the
//! user has told the pet their name.
//!
//! [`RodioAudio`] decodes and mixes the file in-process. It needs the
//! `rodio` feature, which links the platform audio libraries (ALSA on
//! Linux); without it the pet falls back to [`SilentAudio`].

use crate::error::Result;
use std::path::Path;
use tracing::debug;

#[cfg(feature = "rodio")]
pub use self::rodio_backend::RodioAudio;

/// Something that can loop a sound file and stop it again.
pub trait AudioService {
    /// Start looping the sound at `path`, replacing whatever is playing.
    fn play_loop(&mut self, path: &Path) -> Result<()>;

    /// Stop playback. Stopping when nothing plays is not an error.
    fn stop(&mut self) -> Result<()>;
}

/// An audio backend that plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioService for SilentAudio {
    fn play_loop(&mut self, path: &Path) -> Result<()> {
        debug!(file = %path.display(), "audio muted");
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(feature = "rodio")]
mod rodio_backend {
    use super::AudioService;
    use crate::error::{Error, Result};
    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
    use std::fs::File;
    use std::io::BufReader;
    use std::path::{Path, PathBuf};
    use tracing::debug;

    /// Plays audio in-process through the default output device.
    ///
    /// The output stream is opened on first use and kept open, so a pet
    /// that never plays music never touches the audio device.
    #[derive(Default)]
    pub struct RodioAudio {
        output: Option<(OutputStream, OutputStreamHandle)>,
        playing: Option<(PathBuf, Sink)>,
    }

    impl RodioAudio {
        /// Create a backend with no output opened yet.
        pub fn new() -> Self {
            Self::default()
        }

        /// The file currently looping, if any.
        pub fn now_playing(&self) -> Option<&Path> {
            self.playing.as_ref().map(|(path, _)| path.as_path())
        }
    }

    impl std::fmt::Debug for RodioAudio {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("RodioAudio")
                .field("output_open", &self.output.is_some())
                .field("now_playing", &self.now_playing())
                .finish()
        }
    }

    impl AudioService for RodioAudio {
        fn play_loop(&mut self, path: &Path) -> Result<()> {
            if !path.exists() {
                return Err(Error::AudioFileMissing {
                    path: path.to_path_buf(),
                });
            }
            self.stop()?;

            let file = File::open(path).map_err(|e| {
                Error::audio_error(format!("failed to open '{}': {}", path.display(), e))
            })?;
            let source = Decoder::new(BufReader::new(file)).map_err(|e| {
                Error::audio_error(format!("failed to decode '{}': {}", path.display(), e))
            })?;

            let (stream, handle) = match self.output.take() {
                Some(output) => output,
                None => OutputStream::try_default()
                    .map_err(|e| Error::audio_error(format!("no audio output: {}", e)))?,
            };
            let sink = Sink::try_new(&handle);
            self.output = Some((stream, handle));
            let sink =
                sink.map_err(|e| Error::audio_error(format!("failed to start playback: {}", e)))?;

            sink.append(source.repeat_infinite());
            debug!(file = %path.display(), "audio loop started");
            self.playing = Some((path.to_path_buf(), sink));
            Ok(())
        }

        fn stop(&mut self) -> Result<()> {
            if let Some((path, sink)) = self.playing.take() {
                sink.stop();
                debug!(file = %path.display(), "audio loop stopped");
            }
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_missing_file_is_reported() {
            let mut audio = RodioAudio::new();
            let err = audio
                .play_loop(Path::new("/definitely/not/here/Snakey_intro.wav"))
                .unwrap_err();
            assert!(matches!(err, Error::AudioFileMissing { .. }));
            assert!(audio.now_playing().is_none());
        }

        #[test]
        fn test_undecodable_file_is_audio_error() {
            let file = std::env::temp_dir()
                .join(format!("snakey_audio_bad_{}.wav", std::process::id()));
            std::fs::write(&file, b"not a wave file").unwrap();

            let mut audio = RodioAudio::new();
            let err = audio.play_loop(&file).unwrap_err();
            assert!(matches!(err, Error::AudioError { .. }));
            assert!(audio.now_playing().is_none());

            std::fs::remove_file(&file).ok();
        }

        #[test]
        fn test_stop_when_idle_is_ok() {
            let mut audio = RodioAudio::new();
            assert!(audio.stop().is_ok());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_audio_does_nothing() {
        let mut audio = SilentAudio;
        assert!(audio.play_loop(Path::new("/no/such/intro.wav")).is_ok());
        assert!(audio.stop().is_ok());
    }
}
