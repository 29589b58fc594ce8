//! Snakey core library
//!
//! This crate provides the core of the Snakey desktop pet: the movement and
//! talk schedulers with their timer queue, glide interpolation, persistent
//! settings, the service seams for the window, speech, audio, and browser,
//! and the [`Pet`] that ties them together on a single event loop.

pub mod audio;
pub mod browser;
pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod glide;
pub mod menu;
pub mod pet;
pub mod phrases;
pub mod scheduler;
pub mod settings;
pub mod speech;
pub mod timer;
pub mod window;

pub use audio::{AudioService, SilentAudio};
#[cfg(feature = "rodio")]
pub use audio::RodioAudio;
pub use browser::{Browser, SystemBrowser};
pub use config::Config;
pub use error::{Error, Result};
pub use event::{Event, EventReceiver, EventSender};
pub use geometry::{Position, Size};
pub use glide::{Glide, MoveCommand};
pub use menu::{MenuAction, MenuEntry, CONTEXT_MENU};
pub use pet::{Pet, Services, Visual};
pub use scheduler::{MovementScheduler, TalkScheduler, Task};
pub use settings::{Settings, SettingsStore};
pub use speech::{CommandSpeech, SilentSpeech, SpeechService};
pub use timer::{TimerId, TimerQueue};
pub use window::{Appearance, OverlayWindow, VirtualWindow};
