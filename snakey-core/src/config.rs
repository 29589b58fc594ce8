//! Configuration for the Snakey overlay.
//!
//! This module provides the `Config` struct with a builder pattern for
//! the overlay geometry, movement and talk timing, and the commands and
//! paths used by the speech, audio, and settings backends.

use crate::error::{Error, Result};
use crate::geometry::{Position, Size};
use std::path::PathBuf;
use std::time::Duration;

/// Default overlay window size.
const DEFAULT_WINDOW_SIZE: Size = Size::new(200, 200);

/// Where the overlay first appears.
const DEFAULT_INITIAL_POSITION: Position = Position::new(500, 300);

/// Screen size reported by the headless window.
const DEFAULT_SCREEN_SIZE: Size = Size::new(1920, 1080);

/// Default shortest wait before the next random move, in milliseconds.
const DEFAULT_MOVE_DELAY_MIN_MS: u64 = 5_000;

/// Default longest wait before the next random move, in milliseconds.
const DEFAULT_MOVE_DELAY_MAX_MS: u64 = 15_000;

/// Default maximum distance of a random move on each axis, in pixels.
const DEFAULT_MOVE_OFFSET: i32 = 1_000;

/// Default glide duration in milliseconds.
const DEFAULT_GLIDE_DURATION_MS: u64 = 5_000;

/// Default number of glide steps.
const DEFAULT_GLIDE_STEPS: u32 = 100;

/// How long the moving visual is shown after a move starts, in milliseconds.
const DEFAULT_MOVING_VISUAL_MS: u64 = 5_000;

/// Default shortest wait before the next random phrase, in milliseconds.
const DEFAULT_TALK_DELAY_MIN_MS: u64 = 10_000;

/// Default longest wait before the next random phrase, in milliseconds.
const DEFAULT_TALK_DELAY_MAX_MS: u64 = 60_000;

/// How long notifications stay on screen, in milliseconds.
const DEFAULT_NOTIFICATION_MS: u64 = 2_000;

/// Page opened by "Surf the Web!".
const DEFAULT_WEB_URL: &str = "https://www.google.com";

/// File name of the intro music.
const INTRO_MUSIC_FILE: &str = "Snakey_intro.wav";

/// File name of the settings document.
const SETTINGS_FILE: &str = "SnakeyData.json";

/// Default speech command for this platform.
#[cfg(target_os = "macos")]
const DEFAULT_SPEECH_COMMAND: &str = "say";
#[cfg(not(target_os = "macos"))]
const DEFAULT_SPEECH_COMMAND: &str = "espeak";

/// Default location of the settings file.
///
/// Lives in the platform's local data directory, falling back to the
/// working directory when that cannot be determined.
pub fn default_settings_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("Snakey").join(SETTINGS_FILE))
        .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE))
}

/// Default location of the intro music, next to the executable.
pub fn default_intro_music_path() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(INTRO_MUSIC_FILE)))
        .unwrap_or_else(|| PathBuf::from(INTRO_MUSIC_FILE))
}

/// Configuration for the Snakey overlay.
#[derive(Debug, Clone)]
pub struct Config {
    /// Size of the overlay window.
    pub window_size: Size,

    /// Where the overlay appears at startup.
    pub initial_position: Position,

    /// Screen size used by the headless window.
    pub screen_size: Size,

    /// Shortest wait before a random move.
    pub move_delay_min: Duration,

    /// Longest wait before a random move.
    pub move_delay_max: Duration,

    /// Maximum random offset on each axis, in pixels.
    pub move_offset: i32,

    /// Duration of a glide.
    pub glide_duration: Duration,

    /// Number of position updates in a glide.
    pub glide_steps: u32,

    /// How long the moving visual stays up after a move starts.
    pub moving_visual_duration: Duration,

    /// Shortest wait before a random phrase.
    pub talk_delay_min: Duration,

    /// Longest wait before a random phrase.
    pub talk_delay_max: Duration,

    /// How long notifications stay on screen.
    pub notification_duration: Duration,

    /// URL opened by the web menu entry.
    pub web_url: String,

    /// Path to the intro music played on first launch.
    pub intro_music_path: PathBuf,

    /// Path to the settings JSON file.
    pub settings_path: PathBuf,

    /// Command used to speak text.
    pub speech_command: String,

    /// Arguments passed before the text to speak.
    pub speech_args: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            initial_position: DEFAULT_INITIAL_POSITION,
            screen_size: DEFAULT_SCREEN_SIZE,
            move_delay_min: Duration::from_millis(DEFAULT_MOVE_DELAY_MIN_MS),
            move_delay_max: Duration::from_millis(DEFAULT_MOVE_DELAY_MAX_MS),
            move_offset: DEFAULT_MOVE_OFFSET,
            glide_duration: Duration::from_millis(DEFAULT_GLIDE_DURATION_MS),
            glide_steps: DEFAULT_GLIDE_STEPS,
            moving_visual_duration: Duration::from_millis(DEFAULT_MOVING_VISUAL_MS),
            talk_delay_min: Duration::from_millis(DEFAULT_TALK_DELAY_MIN_MS),
            talk_delay_max: Duration::from_millis(DEFAULT_TALK_DELAY_MAX_MS),
            notification_duration: Duration::from_millis(DEFAULT_NOTIFICATION_MS),
            web_url: DEFAULT_WEB_URL.to_string(),
            intro_music_path: default_intro_music_path(),
            settings_path: default_settings_path(),
            speech_command: DEFAULT_SPEECH_COMMAND.to_string(),
            speech_args: Vec::new(),
        }
    }
}

impl Config {
    /// Create a new Config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the overlay window size.
    pub fn window_size(mut self, size: Size) -> Self {
        self.window_size = size;
        self
    }

    /// Set where the overlay appears at startup.
    pub fn initial_position(mut self, position: Position) -> Self {
        self.initial_position = position;
        self
    }

    /// Set the screen size used by the headless window.
    pub fn screen_size(mut self, size: Size) -> Self {
        self.screen_size = size;
        self
    }

    /// Set the range of waits between random moves.
    pub fn move_delay(mut self, min: Duration, max: Duration) -> Self {
        self.move_delay_min = min;
        self.move_delay_max = max;
        self
    }

    /// Set the maximum random offset per axis.
    pub fn move_offset(mut self, offset: i32) -> Self {
        self.move_offset = offset;
        self
    }

    /// Set the glide duration and step count.
    pub fn glide(mut self, duration: Duration, steps: u32) -> Self {
        self.glide_duration = duration;
        self.glide_steps = steps;
        self
    }

    /// Set how long the moving visual stays up.
    pub fn moving_visual_duration(mut self, duration: Duration) -> Self {
        self.moving_visual_duration = duration;
        self
    }

    /// Set the range of waits between random phrases.
    pub fn talk_delay(mut self, min: Duration, max: Duration) -> Self {
        self.talk_delay_min = min;
        self.talk_delay_max = max;
        self
    }

    /// Set how long notifications stay on screen.
    pub fn notification_duration(mut self, duration: Duration) -> Self {
        self.notification_duration = duration;
        self
    }

    /// Set the URL opened by the web menu entry.
    pub fn web_url(mut self, url: impl Into<String>) -> Self {
        self.web_url = url.into();
        self
    }

    /// Set the intro music path.
    pub fn intro_music_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.intro_music_path = path.into();
        self
    }

    /// Set the settings file path.
    pub fn settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = path.into();
        self
    }

    /// Set the speech command.
    pub fn speech_command(mut self, command: impl Into<String>) -> Self {
        self.speech_command = command.into();
        self
    }

    /// Set the speech arguments from a string (space-separated).
    pub fn speech_args_str(mut self, args: impl Into<String>) -> Self {
        self.speech_args = args.into().split_whitespace().map(String::from).collect();
        self
    }

    /// Check that the timing ranges and geometry make sense.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigError` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.window_size.width <= 0 || self.window_size.height <= 0 {
            return Err(Error::config_error(format!(
                "window size must be positive, got {}",
                self.window_size
            )));
        }
        if self.screen_size.width <= 0 || self.screen_size.height <= 0 {
            return Err(Error::config_error(format!(
                "screen size must be positive, got {}",
                self.screen_size
            )));
        }
        if self.move_delay_min > self.move_delay_max {
            return Err(Error::config_error(
                "move delay minimum is greater than its maximum",
            ));
        }
        if self.talk_delay_min > self.talk_delay_max {
            return Err(Error::config_error(
                "talk delay minimum is greater than its maximum",
            ));
        }
        if self.move_offset < 0 {
            return Err(Error::config_error("move offset must not be negative"));
        }
        if self.glide_steps == 0 {
            return Err(Error::config_error("glide needs at least one step"));
        }
        Ok(())
    }
}
