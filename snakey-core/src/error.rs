//! Error types for the Snakey desktop pet.
//!
//! Nothing in this crate treats an error as fatal. Services return these
//! errors and the [`Pet`](crate::Pet) logs and swallows them, degrading the
//! affected feature instead of taking the overlay down.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for snakey-core operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read the settings file from disk.
    #[error("failed to read settings file '{path}': {source}")]
    SettingsReadError {
        /// The path that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The settings file did not contain valid settings JSON.
    #[error("failed to parse settings JSON from '{path}': {source}")]
    SettingsParseError {
        /// The path containing invalid JSON.
        path: PathBuf,
        /// The underlying JSON parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Failed to write the settings file to disk.
    #[error("failed to write settings file '{path}': {source}")]
    SettingsWriteError {
        /// The path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The speech backend failed to say something.
    #[error("speech failed: {message}")]
    SpeechError {
        /// Description of what went wrong.
        message: String,
    },

    /// The audio backend failed to start or stop playback.
    #[error("audio playback failed: {message}")]
    AudioError {
        /// Description of what went wrong.
        message: String,
    },

    /// A sound file that was asked for does not exist.
    #[error("no file '{path}' found")]
    AudioFileMissing {
        /// The missing sound file.
        path: PathBuf,
    },

    /// An image could not be used as the overlay visual.
    #[error("failed to load image '{path}': {message}")]
    ImageLoadError {
        /// The image path.
        path: PathBuf,
        /// Why the image was rejected.
        message: String,
    },

    /// The windowing layer does not support a requested capability.
    #[error("{capability} not supported on this system")]
    Unsupported {
        /// The capability that is unavailable.
        capability: String,
    },

    /// The default browser could not be opened.
    #[error("failed to open '{url}': {source}")]
    BrowserError {
        /// The URL that was requested.
        url: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem.
        message: String,
    },
}

impl Error {
    /// Create a new `SpeechError` with the given message.
    pub fn speech_error(message: impl Into<String>) -> Self {
        Self::SpeechError {
            message: message.into(),
        }
    }

    /// Create a new `AudioError` with the given message.
    pub fn audio_error(message: impl Into<String>) -> Self {
        Self::AudioError {
            message: message.into(),
        }
    }

    /// Create a new `ImageLoadError` for the given path.
    pub fn image_load_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ImageLoadError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new `Unsupported` error for the given capability.
    pub fn unsupported(capability: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: capability.into(),
        }
    }

    /// Create a new `ConfigError` with the given message.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }
}

/// A specialized `Result` type for snakey-core operations.
pub type Result<T> = std::result::Result<T, Error>;
