//! The overlay window seam.
//!
//! [`OverlayWindow`] is everything the pet needs from a windowing layer.
//! [`VirtualWindow`] is a headless implementation that keeps the window
//! state in memory; it backs the terminal front end and the tests. It
//! still decodes every image it is asked to show, so a file the overlay
//! could not draw is rejected here too.

use crate::error::{Error, Result};
use crate::geometry::{Position, Size};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Image formats the overlay can show.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// How many recent notifications a [`VirtualWindow`] remembers.
pub const NOTIFICATION_HISTORY: usize = 16;

/// What the overlay is currently drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Appearance {
    /// A user-chosen image.
    Image(PathBuf),
    /// The built-in green circle.
    Fallback,
}

/// A transient message shown next to the pet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// The message.
    pub text: String,
    /// How long it stays up.
    pub duration: Duration,
}

/// The always-on-top, borderless overlay window.
pub trait OverlayWindow {
    /// Current top-left corner.
    fn position(&self) -> Position;

    /// Move the window immediately.
    fn set_position(&mut self, position: Position);

    /// Size of the screen the window lives on.
    fn screen_size(&self) -> Size;

    /// Size of the overlay window itself.
    fn window_size(&self) -> Size;

    /// Show `image`, or the fallback shape when `None`.
    ///
    /// On error the fallback shape stays up.
    fn set_visual(&mut self, image: Option<&Path>) -> Result<()>;

    /// Show a message that disappears after `duration`.
    fn show_notification(&mut self, text: &str, duration: Duration);

    /// Make pixels of `color` see-through.
    fn set_transparent_color(&mut self, _color: &str) -> Result<()> {
        Err(Error::unsupported("transparent color"))
    }
}

/// A window that only exists in memory.
#[derive(Debug, Clone)]
pub struct VirtualWindow {
    position: Position,
    screen: Size,
    size: Size,
    appearance: Appearance,
    transparent_color: Option<String>,
    supports_transparency: bool,
    notifications: Vec<Notification>,
}

impl VirtualWindow {
    /// Create a window of `size` at `position` on a screen of `screen`.
    pub fn new(position: Position, size: Size, screen: Size) -> Self {
        Self {
            position,
            screen,
            size,
            appearance: Appearance::Fallback,
            transparent_color: None,
            supports_transparency: true,
            notifications: Vec::new(),
        }
    }

    /// Pretend the platform cannot do transparent colors.
    pub fn without_transparency(mut self) -> Self {
        self.supports_transparency = false;
        self
    }

    /// What the window is drawing.
    pub fn appearance(&self) -> &Appearance {
        &self.appearance
    }

    /// The color made transparent, if any.
    pub fn transparent_color(&self) -> Option<&str> {
        self.transparent_color.as_deref()
    }

    /// The most recent notifications, oldest first.
    ///
    /// At most [`NOTIFICATION_HISTORY`] are kept.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }
}

impl OverlayWindow for VirtualWindow {
    fn position(&self) -> Position {
        self.position
    }

    fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    fn screen_size(&self) -> Size {
        self.screen
    }

    fn window_size(&self) -> Size {
        self.size
    }

    fn set_visual(&mut self, image: Option<&Path>) -> Result<()> {
        self.appearance = Appearance::Fallback;
        let Some(path) = image else {
            return Ok(());
        };

        let supported = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if !supported {
            return Err(Error::image_load_error(path, "unsupported image format"));
        }
        if !path.is_file() {
            return Err(Error::image_load_error(path, "file not found"));
        }

        let decoded = image::ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|e| Error::image_load_error(path, e.to_string()))?
            .decode()
            .map_err(|e| Error::image_load_error(path, e.to_string()))?;

        debug!(
            image = %path.display(),
            width = decoded.width(),
            height = decoded.height(),
            "visual changed"
        );
        self.appearance = Appearance::Image(path.to_path_buf());
        Ok(())
    }

    fn show_notification(&mut self, text: &str, duration: Duration) {
        if self.notifications.len() >= NOTIFICATION_HISTORY {
            self.notifications.remove(0);
        }
        self.notifications.push(Notification {
            text: text.to_string(),
            duration,
        });
    }

    fn set_transparent_color(&mut self, color: &str) -> Result<()> {
        if !self.supports_transparency {
            return Err(Error::unsupported("transparent color"));
        }
        self.transparent_color = Some(color.to_string());
        Ok(())
    }
}
