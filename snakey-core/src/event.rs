//! Events published by the pet.
//!
//! The pet reports everything visible it does (moving, changing visuals,
//! speaking, notifications) through this channel so a front end can render
//! it. Sending never blocks the event loop: events are dropped when the
//! buffer is full or nobody is listening any more.

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::geometry::Position;
use crate::pet::Visual;

/// Default channel buffer size.
///
/// Large enough for a full glide between two drains of the receiver.
pub const DEFAULT_CHANNEL_SIZE: usize = 256;

/// Events emitted by the pet.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The pet has started.
    Started {
        /// Where the overlay is.
        position: Position,
    },

    /// The next random move has been armed.
    MoveScheduled {
        /// How long until it fires.
        delay: Duration,
    },

    /// A glide has started.
    GlideStarted {
        /// Where the glide starts.
        from: Position,
        /// Where the glide is heading.
        to: Position,
    },

    /// The overlay moved.
    Moved {
        /// The new position.
        position: Position,
    },

    /// A glide ran all of its steps.
    GlideFinished {
        /// Where the overlay ended up.
        position: Position,
    },

    /// The overlay switched between idle and moving visuals.
    VisualChanged {
        /// The new visual state.
        visual: Visual,
        /// The image shown, `None` for the fallback shape.
        image: Option<PathBuf>,
    },

    /// The pet said something.
    Spoke {
        /// What was said.
        text: String,
    },

    /// A notification was shown.
    Notification {
        /// The message.
        text: String,
    },

    /// The pet wants to know the user's name.
    NameRequested,

    /// The settings file was written.
    SettingsSaved,

    /// A web page was opened.
    OpenedUrl {
        /// The URL.
        url: String,
    },

    /// Something degraded but the pet carries on.
    Warning {
        /// The warning message.
        message: String,
    },

    /// A service failed; the failure was swallowed.
    Error {
        /// The error message.
        message: String,
    },

    /// The pet is shutting down.
    Quit,
}

/// Sender for events.
pub type EventSender = mpsc::Sender<Event>;

/// Receiver for events.
pub type EventReceiver = mpsc::Receiver<Event>;

/// Create a new event channel with the default buffer size.
pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::channel(DEFAULT_CHANNEL_SIZE)
}

/// Create a new event channel with a custom buffer size.
pub fn channel_with_size(size: usize) -> (EventSender, EventReceiver) {
    mpsc::channel(size)
}

impl Event {
    /// Create a warning event with the given message.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::Warning {
            message: message.into(),
        }
    }

    /// Create an error event with the given message.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Event::Started { position } => write!(f, "Snakey woke up at {}", position),
            Event::MoveScheduled { delay } => {
                write!(f, "next move in {:.1}s", delay.as_secs_f64())
            }
            Event::GlideStarted { from, to } => write!(f, "gliding {} -> {}", from, to),
            Event::Moved { position } => write!(f, "moved to {}", position),
            Event::GlideFinished { position } => write!(f, "settled at {}", position),
            Event::VisualChanged { visual, image } => match image {
                Some(path) => write!(f, "looking {} ({})", visual, path.display()),
                None => write!(f, "looking {} (green circle)", visual),
            },
            Event::Spoke { text } => write!(f, "says: \"{}\"", text),
            Event::Notification { text } => write!(f, "[notification] {}", text),
            Event::NameRequested => write!(f, "What's your name? (type: name <your name>)"),
            Event::SettingsSaved => write!(f, "settings saved"),
            Event::OpenedUrl { url } => write!(f, "opened {}", url),
            Event::Warning { message } => write!(f, "warning: {}", message),
            Event::Error { message } => write!(f, "error: {}", message),
            Event::Quit => write!(f, "bye!"),
        }
    }
}
