//! Screen geometry for the overlay window.

use serde::{Deserialize, Serialize};

/// Top-left corner of the overlay, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal offset from the left edge of the screen.
    pub x: i32,
    /// Vertical offset from the top edge of the screen.
    pub y: i32,
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Position {
    /// Create a new position.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Offset this position by the given deltas.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Clamp this position so a window of `window` size stays on a screen
    /// of `screen` size.
    ///
    /// A window larger than the screen pins to 0 on that axis.
    pub fn clamp_to_screen(self, screen: Size, window: Size) -> Self {
        let max_x = (screen.width - window.width).max(0);
        let max_y = (screen.height - window.height).max(0);
        Self {
            x: self.x.clamp(0, max_x),
            y: self.y.clamp(0, max_y),
        }
    }
}

impl Size {
    /// Create a new size.
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl std::str::FromStr for Size {
    type Err = String;

    /// Parse a size written as `WIDTHxHEIGHT`, e.g. `1920x1080`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
        let width = w
            .trim()
            .parse()
            .map_err(|e| format!("invalid width '{}': {}", w, e))?;
        let height = h
            .trim()
            .parse()
            .map_err(|e| format!("invalid height '{}': {}", h, e))?;
        Ok(Self { width, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Size = Size::new(1920, 1080);
    const WINDOW: Size = Size::new(200, 200);

    #[test]
    fn test_clamp_inside_is_unchanged() {
        let pos = Position::new(500, 300);
        assert_eq!(pos.clamp_to_screen(SCREEN, WINDOW), pos);
    }

    #[test]
    fn test_clamp_negative_to_zero() {
        let pos = Position::new(-500, -1);
        assert_eq!(pos.clamp_to_screen(SCREEN, WINDOW), Position::new(0, 0));
    }

    #[test]
    fn test_clamp_past_far_edge() {
        let pos = Position::new(500, 300).offset(-1000, 1000);
        assert_eq!(pos, Position::new(-500, 1300));
        assert_eq!(pos.clamp_to_screen(SCREEN, WINDOW), Position::new(0, 880));
    }

    #[test]
    fn test_clamp_window_larger_than_screen() {
        let tiny = Size::new(100, 150);
        let pos = Position::new(40, 70);
        assert_eq!(pos.clamp_to_screen(tiny, WINDOW), Position::new(0, 0));
    }

    #[test]
    fn test_clamp_holds_for_all_offsets() {
        let screens = [Size::new(1920, 1080), Size::new(800, 600), Size::new(200, 200)];
        for screen in screens {
            for dx in (-1000..=1000).step_by(50) {
                for dy in (-1000..=1000).step_by(50) {
                    let p = Position::new(500, 300)
                        .offset(dx, dy)
                        .clamp_to_screen(screen, WINDOW);
                    assert!(p.x >= 0 && p.x <= screen.width - WINDOW.width);
                    assert!(p.y >= 0 && p.y <= screen.height - WINDOW.height);
                }
            }
        }
    }

    #[test]
    fn test_size_from_str() {
        assert_eq!("1920x1080".parse::<Size>().unwrap(), SCREEN);
        assert_eq!("800X600".parse::<Size>().unwrap(), Size::new(800, 600));
        assert!("1920".parse::<Size>().is_err());
        assert!("axb".parse::<Size>().is_err());
    }
}
