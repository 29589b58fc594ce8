//! Linear glide of the overlay between two positions.
//!
//! A glide is a finite sequence of `steps` positions emitted on a fixed
//! interval. The sequence stops one increment short of the end point:
//! step `i` is `start + i * (end - start) / steps` for `i` in `0..steps`.

use std::time::Duration;

use crate::geometry::Position;

/// Immutable description of one move of the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveCommand {
    /// Where the glide starts.
    pub start: Position,
    /// Where the glide is heading.
    pub end: Position,
    /// Total time the glide takes.
    pub duration: Duration,
    /// Number of position updates emitted.
    pub steps: u32,
}

impl MoveCommand {
    /// Create a new move command.
    pub fn new(start: Position, end: Position, duration: Duration, steps: u32) -> Self {
        Self {
            start,
            end,
            duration,
            steps,
        }
    }

    /// Delay between consecutive steps, `duration / steps` in whole milliseconds.
    pub fn step_interval(&self) -> Duration {
        if self.steps == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(self.duration.as_millis() as u64 / self.steps as u64)
    }

    /// Position of step `i`, truncated toward zero.
    pub fn position_at(&self, i: u32) -> Position {
        if self.steps == 0 {
            return self.start;
        }
        let step_x = (self.end.x - self.start.x) as f64 / self.steps as f64;
        let step_y = (self.end.y - self.start.y) as f64 / self.steps as f64;
        Position {
            x: (self.start.x as f64 + i as f64 * step_x) as i32,
            y: (self.start.y as f64 + i as f64 * step_y) as i32,
        }
    }

    /// Start a fresh glide for this command.
    pub fn glide(self) -> Glide {
        Glide {
            command: self,
            next: 0,
        }
    }
}

/// A running glide. Yields each step's position once, in order.
///
/// Glides are not restartable; build a new one from the [`MoveCommand`].
#[derive(Debug, Clone)]
pub struct Glide {
    command: MoveCommand,
    next: u32,
}

impl Glide {
    /// The command this glide is executing.
    pub fn command(&self) -> &MoveCommand {
        &self.command
    }

    /// Index of the step that will be emitted next.
    pub fn next_index(&self) -> u32 {
        self.next
    }

    /// Whether every step has been emitted.
    pub fn is_finished(&self) -> bool {
        self.next >= self.command.steps
    }
}

impl Iterator for Glide {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        if self.is_finished() {
            return None;
        }
        let pos = self.command.position_at(self.next);
        self.next += 1;
        Some(pos)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.command.steps.saturating_sub(self.next) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Glide {}
