//! Movement and talk scheduling.
//!
//! Both chains re-arm themselves each time they fire. Each scheduler keeps
//! the id of its pending timer, so re-arming replaces the previous timer
//! instead of stacking another one on top of it.
//!
//! Only one glide runs at a time. Starting a glide while another is still
//! stepping cancels the old one's pending step and the new glide takes
//! over from wherever the window currently is.

use std::time::Duration;

use rand::Rng;
use tracing::debug;

use crate::config::Config;
use crate::geometry::{Position, Size};
use crate::glide::{Glide, MoveCommand};
use crate::timer::{TimerId, TimerQueue};

/// Work the pet does when a timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Pick a destination and start gliding there.
    RandomMove,
    /// Apply the next step of the running glide.
    GlideStep,
    /// Switch back to the idle visual.
    RevertVisual,
    /// Say a random phrase.
    SpeakRandomPhrase,
}

/// Draw a delay uniformly from `[min, max]` at millisecond resolution.
fn random_delay<R: Rng + ?Sized>(rng: &mut R, min: Duration, max: Duration) -> Duration {
    let min_ms = min.as_millis() as u64;
    let max_ms = (max.as_millis() as u64).max(min_ms);
    Duration::from_millis(rng.gen_range(min_ms..=max_ms))
}

/// What happened when a glide advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlideStep {
    /// Where the window should be now.
    pub position: Position,
    /// Index of this step within the glide.
    pub index: u32,
    /// Whether this was the last step.
    pub finished: bool,
}

/// Decides when and where the overlay moves.
#[derive(Debug)]
pub struct MovementScheduler {
    delay_min: Duration,
    delay_max: Duration,
    max_offset: i32,
    glide_duration: Duration,
    glide_steps: u32,
    window_size: Size,
    pending_move: Option<TimerId>,
    glide: Option<Glide>,
    pending_step: Option<TimerId>,
}

impl MovementScheduler {
    /// Create a scheduler using the movement settings from `config`.
    pub fn new(config: &Config) -> Self {
        Self {
            delay_min: config.move_delay_min,
            delay_max: config.move_delay_max,
            // a negative range would make the offset draw panic
            max_offset: config.move_offset.max(0),
            glide_duration: config.glide_duration,
            glide_steps: config.glide_steps,
            window_size: config.window_size,
            pending_move: None,
            glide: None,
            pending_step: None,
        }
    }

    /// Arm the next random move, replacing any move already pending.
    pub fn schedule_next_move<R: Rng + ?Sized>(
        &mut self,
        timers: &mut TimerQueue<Task>,
        now: Duration,
        rng: &mut R,
    ) -> Duration {
        if let Some(id) = self.pending_move.take() {
            timers.cancel(id);
        }
        let delay = random_delay(rng, self.delay_min, self.delay_max);
        self.pending_move = Some(timers.schedule_at(now + delay, Task::RandomMove));
        debug!(delay_ms = delay.as_millis() as u64, "next move scheduled");
        delay
    }

    /// Forget the pending move timer once it has fired.
    pub fn move_fired(&mut self) {
        self.pending_move = None;
    }

    /// The pending random-move timer, if armed.
    pub fn pending_move(&self) -> Option<TimerId> {
        self.pending_move
    }

    /// Draw a random offset for each axis from `[-max_offset, max_offset]`.
    pub fn random_offset<R: Rng + ?Sized>(&self, rng: &mut R) -> (i32, i32) {
        let dx = rng.gen_range(-self.max_offset..=self.max_offset);
        let dy = rng.gen_range(-self.max_offset..=self.max_offset);
        (dx, dy)
    }

    /// Build the move from `current` by `(dx, dy)`, kept on screen.
    pub fn plan_move(&self, current: Position, dx: i32, dy: i32, screen: Size) -> MoveCommand {
        let target = current
            .offset(dx, dy)
            .clamp_to_screen(screen, self.window_size);
        MoveCommand::new(current, target, self.glide_duration, self.glide_steps)
    }

    /// Start gliding and return the first step, which applies immediately.
    ///
    /// A glide already in flight is abandoned.
    pub fn start_glide(
        &mut self,
        command: MoveCommand,
        timers: &mut TimerQueue<Task>,
        now: Duration,
    ) -> Option<GlideStep> {
        if self.cancel_glide(timers) {
            debug!("previous glide superseded");
        }
        self.glide = Some(command.glide());
        self.advance_glide(timers, now)
    }

    /// Emit the next step of the running glide and arm the one after it.
    pub fn advance_glide(
        &mut self,
        timers: &mut TimerQueue<Task>,
        now: Duration,
    ) -> Option<GlideStep> {
        self.pending_step = None;
        let glide = self.glide.as_mut()?;
        let index = glide.next_index();
        let Some(position) = glide.next() else {
            self.glide = None;
            return None;
        };

        let finished = glide.is_finished();
        if finished {
            self.glide = None;
        } else {
            let interval = glide.command().step_interval();
            self.pending_step = Some(timers.schedule_at(now + interval, Task::GlideStep));
        }

        Some(GlideStep {
            position,
            index,
            finished,
        })
    }

    /// Stop the running glide where it is. Returns whether one was running.
    pub fn cancel_glide(&mut self, timers: &mut TimerQueue<Task>) -> bool {
        if let Some(id) = self.pending_step.take() {
            timers.cancel(id);
        }
        self.glide.take().is_some()
    }

    /// Whether a glide is in flight.
    pub fn is_gliding(&self) -> bool {
        self.glide.is_some()
    }
}

/// Decides when the pet talks on its own.
#[derive(Debug)]
pub struct TalkScheduler {
    delay_min: Duration,
    delay_max: Duration,
    pending: Option<TimerId>,
}

impl TalkScheduler {
    /// Create a scheduler using the talk settings from `config`.
    pub fn new(config: &Config) -> Self {
        Self {
            delay_min: config.talk_delay_min,
            delay_max: config.talk_delay_max,
            pending: None,
        }
    }

    /// Arm the next random phrase, replacing any phrase already pending.
    pub fn schedule_talk<R: Rng + ?Sized>(
        &mut self,
        timers: &mut TimerQueue<Task>,
        now: Duration,
        rng: &mut R,
    ) -> Duration {
        if let Some(id) = self.pending.take() {
            timers.cancel(id);
        }
        let delay = random_delay(rng, self.delay_min, self.delay_max);
        self.pending = Some(timers.schedule_at(now + delay, Task::SpeakRandomPhrase));
        debug!(delay_ms = delay.as_millis() as u64, "next phrase scheduled");
        delay
    }

    /// Forget the pending talk timer once it has fired.
    pub fn talk_fired(&mut self) {
        self.pending = None;
    }

    /// The pending talk timer, if armed.
    pub fn pending(&self) -> Option<TimerId> {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_schedule_next_move_within_range() {
        let config = Config::default();
        let mut movement = MovementScheduler::new(&config);
        let mut timers = TimerQueue::new();
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..200 {
            let delay = movement.schedule_next_move(&mut timers, Duration::ZERO, &mut rng);
            assert!(delay >= ms(5000) && delay <= ms(15000));
        }
    }

    #[test]
    fn test_double_schedule_leaves_one_timer() {
        let config = Config::default();
        let mut movement = MovementScheduler::new(&config);
        let mut timers = TimerQueue::new();
        let mut rng = StdRng::seed_from_u64(2);

        movement.schedule_next_move(&mut timers, Duration::ZERO, &mut rng);
        let first = movement.pending_move().unwrap();
        movement.schedule_next_move(&mut timers, Duration::ZERO, &mut rng);
        let second = movement.pending_move().unwrap();

        assert_ne!(first, second);
        assert!(!timers.is_pending(first));
        assert_eq!(timers.len(), 1);

        let (_, id, task) = timers.pop_due(ms(60_000)).unwrap();
        assert_eq!(id, second);
        assert_eq!(task, Task::RandomMove);
        assert!(timers.pop_due(ms(60_000)).is_none());
    }

    #[test]
    fn test_random_offset_within_range() {
        let movement = MovementScheduler::new(&Config::default());
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            let (dx, dy) = movement.random_offset(&mut rng);
            assert!((-1000..=1000).contains(&dx));
            assert!((-1000..=1000).contains(&dy));
        }
    }

    #[test]
    fn test_negative_offset_stays_put() {
        let config = Config::default().move_offset(-50);
        let movement = MovementScheduler::new(&config);
        let mut rng = StdRng::seed_from_u64(4);
        assert_eq!(movement.random_offset(&mut rng), (0, 0));
    }

    #[test]
    fn test_plan_move_clamps_target() {
        let movement = MovementScheduler::new(&Config::default());
        let cmd = movement.plan_move(Position::new(500, 300), -1000, 1000, Size::new(1920, 1080));
        assert_eq!(cmd.start, Position::new(500, 300));
        assert_eq!(cmd.end, Position::new(0, 880));
        assert_eq!(cmd.duration, ms(5000));
        assert_eq!(cmd.steps, 100);
    }

    #[test]
    fn test_glide_steps_chain_through_timers() {
        let config = Config::default().glide(ms(40), 4);
        let mut movement = MovementScheduler::new(&config);
        let mut timers = TimerQueue::new();
        let cmd = movement.plan_move(Position::new(0, 0), 100, 0, Size::new(1920, 1080));

        let first = movement.start_glide(cmd, &mut timers, Duration::ZERO).unwrap();
        assert_eq!(first.position, Position::new(0, 0));
        assert_eq!(first.index, 0);
        assert!(movement.is_gliding());

        let mut positions = vec![first.position];
        let mut now = Duration::ZERO;
        while let Some(deadline) = timers.next_deadline() {
            let (at, _, task) = timers.pop_due(deadline).unwrap();
            assert_eq!(task, Task::GlideStep);
            assert_eq!(at - now, ms(10));
            now = at;
            let step = movement.advance_glide(&mut timers, now).unwrap();
            positions.push(step.position);
            if step.finished {
                assert_eq!(step.index, 3);
            }
        }

        assert_eq!(
            positions,
            vec![
                Position::new(0, 0),
                Position::new(25, 0),
                Position::new(50, 0),
                Position::new(75, 0),
            ]
        );
        assert!(!movement.is_gliding());
    }

    #[test]
    fn test_new_glide_supersedes_running_one() {
        let config = Config::default().glide(ms(100), 10);
        let mut movement = MovementScheduler::new(&config);
        let mut timers = TimerQueue::new();
        let screen = Size::new(1920, 1080);

        let a = movement.plan_move(Position::new(0, 0), 500, 0, screen);
        movement.start_glide(a, &mut timers, Duration::ZERO);
        assert_eq!(timers.len(), 1);

        let b = movement.plan_move(Position::new(0, 0), 0, 500, screen);
        movement.start_glide(b, &mut timers, ms(5));
        assert_eq!(timers.len(), 1);

        let (_, _, task) = timers.pop_due(ms(1000)).unwrap();
        assert_eq!(task, Task::GlideStep);
        let step = movement.advance_glide(&mut timers, ms(15)).unwrap();
        assert_eq!(step.position, Position::new(0, 50));
    }

    #[test]
    fn test_advance_without_glide_is_noop() {
        let mut movement = MovementScheduler::new(&Config::default());
        let mut timers = TimerQueue::new();
        assert!(movement.advance_glide(&mut timers, Duration::ZERO).is_none());
        assert!(!movement.cancel_glide(&mut timers));
        assert!(timers.is_empty());
    }

    #[test]
    fn test_talk_schedule_replaces_pending() {
        let config = Config::default();
        let mut talk = TalkScheduler::new(&config);
        let mut timers = TimerQueue::new();
        let mut rng = StdRng::seed_from_u64(4);

        let delay = talk.schedule_talk(&mut timers, Duration::ZERO, &mut rng);
        assert!(delay >= ms(10_000) && delay <= ms(60_000));
        talk.schedule_talk(&mut timers, Duration::ZERO, &mut rng);
        assert_eq!(timers.len(), 1);
        assert!(talk.pending().is_some());

        talk.talk_fired();
        assert!(talk.pending().is_none());
    }
}
