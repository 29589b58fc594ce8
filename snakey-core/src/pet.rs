//! The pet itself.
//!
//! [`Pet`] owns the settings, the services, and both timer chains. It runs
//! on a single event loop: the loop asks [`Pet::next_deadline`] when to wake
//! up, then calls [`Pet::run_until`] with the current time, and forwards
//! menu actions through [`Pet::handle_menu`]. Every callback runs to
//! completion before the next one starts, so no state here needs locking.
//!
//! Service failures never escape. They are logged, published as
//! [`Event::Error`], and the pet carries on without that feature.

use std::path::PathBuf;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, error, info, trace, warn};

use crate::audio::AudioService;
use crate::browser::Browser;
use crate::config::Config;
use crate::event::{channel, Event, EventReceiver, EventSender};
use crate::geometry::Position;
use crate::glide::MoveCommand;
use crate::menu::MenuAction;
use crate::phrases;
use crate::scheduler::{GlideStep, MovementScheduler, TalkScheduler, Task};
use crate::settings::{Settings, SettingsStore};
use crate::speech::SpeechService;
use crate::timer::TimerQueue;
use crate::window::OverlayWindow;

/// Color the overlay background is drawn in, made see-through when possible.
const TRANSPARENT_COLOR: &str = "white";

/// Which of the two pet images is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visual {
    /// Sitting still.
    Idle,
    /// On the move.
    Moving,
}

impl std::fmt::Display for Visual {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Visual::Idle => write!(f, "idle"),
            Visual::Moving => write!(f, "moving"),
        }
    }
}

/// The collaborators the pet talks to.
pub struct Services {
    /// The overlay window.
    pub window: Box<dyn OverlayWindow>,
    /// Text-to-speech.
    pub speech: Box<dyn SpeechService>,
    /// Intro music.
    pub audio: Box<dyn AudioService>,
    /// Web links.
    pub browser: Box<dyn Browser>,
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("position", &self.window.position())
            .finish_non_exhaustive()
    }
}

/// The desktop pet.
#[derive(Debug)]
pub struct Pet<R = StdRng> {
    config: Config,
    store: SettingsStore,
    settings: Settings,
    services: Services,
    timers: TimerQueue<Task>,
    movement: MovementScheduler,
    talk: TalkScheduler,
    visual: Visual,
    rng: R,
    now: Duration,
    events: EventSender,
    running: bool,
}

impl<R: Rng> Pet<R> {
    /// Create a pet, loading its settings from `config.settings_path`.
    ///
    /// Returns the pet and the receiving end of its event channel. Nothing
    /// is scheduled until [`Pet::start`] is called.
    pub fn new(config: Config, services: Services, rng: R) -> (Self, EventReceiver) {
        let store = SettingsStore::new(&config.settings_path);
        let settings = store.load();
        let (tx, rx) = channel();

        let pet = Self {
            movement: MovementScheduler::new(&config),
            talk: TalkScheduler::new(&config),
            config,
            store,
            settings,
            services,
            timers: TimerQueue::new(),
            visual: Visual::Idle,
            rng,
            now: Duration::ZERO,
            events: tx,
            running: true,
        };

        (pet, rx)
    }

    fn emit(&self, event: Event) {
        if let Err(TrySendError::Full(event)) = self.events.try_send(event) {
            trace!(?event, "event buffer full, dropping event");
        }
    }

    /// Bring the pet to life: show it, arm both timer chains, and greet.
    pub fn start(&mut self) {
        if let Err(e) = self
            .services
            .window
            .set_transparent_color(TRANSPARENT_COLOR)
        {
            warn!("Transparent color not supported on this system: {}", e);
            self.emit(Event::warning(e.to_string()));
        }

        let position = self.services.window.position();
        info!(%position, "Snakey started");
        self.emit(Event::Started { position });

        self.show_visual(Visual::Idle);
        self.schedule_next_move();
        self.schedule_talk();
        self.greet();
    }

    /// Fire every timer due at or before `now`, in deadline order.
    ///
    /// Returns how many timers fired. Timers armed by a callback fire in
    /// the same call if they are already due.
    pub fn run_until(&mut self, now: Duration) -> usize {
        let mut fired = 0;
        while self.running {
            let Some((deadline, _, task)) = self.timers.pop_due(now) else {
                break;
            };
            self.now = self.now.max(deadline);
            debug!(?task, at_ms = deadline.as_millis() as u64, "timer fired");
            self.dispatch(task);
            fired += 1;
        }
        self.now = self.now.max(now);
        fired
    }

    /// When the next timer is due, if any.
    pub fn next_deadline(&mut self) -> Option<Duration> {
        if !self.running {
            return None;
        }
        self.timers.next_deadline()
    }

    fn dispatch(&mut self, task: Task) {
        match task {
            Task::RandomMove => {
                self.movement.move_fired();
                self.perform_random_move();
            }
            Task::GlideStep => {
                let step = self.movement.advance_glide(&mut self.timers, self.now);
                self.apply_glide_step(step);
            }
            Task::RevertVisual => self.show_visual(Visual::Idle),
            Task::SpeakRandomPhrase => {
                self.talk.talk_fired();
                self.speak_random_phrase();
            }
        }
    }

    /// Arm the next random move, replacing any pending one.
    pub fn schedule_next_move(&mut self) {
        let delay = self
            .movement
            .schedule_next_move(&mut self.timers, self.now, &mut self.rng);
        self.emit(Event::MoveScheduled { delay });
    }

    /// Move somewhere random nearby, switching to the moving visual for a while.
    pub fn perform_random_move(&mut self) {
        let current = self.services.window.position();
        let screen = self.services.window.screen_size();
        let (dx, dy) = self.movement.random_offset(&mut self.rng);
        let command = self.movement.plan_move(current, dx, dy, screen);
        info!(from = %command.start, to = %command.end, dx, dy, "random move");

        self.glide(command);
        self.show_visual(Visual::Moving);
        self.timers.schedule_at(
            self.now + self.config.moving_visual_duration,
            Task::RevertVisual,
        );
        self.schedule_next_move();
    }

    /// Glide the overlay according to `command`.
    ///
    /// The first step applies immediately; the rest follow on timers.
    pub fn glide(&mut self, command: MoveCommand) {
        self.emit(Event::GlideStarted {
            from: command.start,
            to: command.end,
        });
        let step = self
            .movement
            .start_glide(command, &mut self.timers, self.now);
        self.apply_glide_step(step);
    }

    fn apply_glide_step(&mut self, step: Option<GlideStep>) {
        let Some(step) = step else {
            return;
        };
        debug!(index = step.index, position = %step.position, "glide step");
        self.services.window.set_position(step.position);
        self.emit(Event::Moved {
            position: step.position,
        });
        if step.finished {
            self.emit(Event::GlideFinished {
                position: step.position,
            });
        }
    }

    /// Whether a glide is in flight.
    pub fn is_gliding(&self) -> bool {
        self.movement.is_gliding()
    }

    /// Show the idle or moving image, or the fallback shape.
    pub fn show_visual(&mut self, visual: Visual) {
        let image = match visual {
            Visual::Idle => self.settings.image.clone(),
            Visual::Moving => self.settings.image_moving.clone(),
        };
        self.visual = visual;

        let shown = match self.services.window.set_visual(image.as_deref()) {
            Ok(()) => image,
            Err(e) => {
                error!("Failed to load image: {}", e);
                self.emit(Event::error(e.to_string()));
                None
            }
        };
        self.emit(Event::VisualChanged {
            visual,
            image: shown,
        });
    }

    /// Arm the next random phrase, replacing any pending one.
    pub fn schedule_talk(&mut self) {
        self.talk
            .schedule_talk(&mut self.timers, self.now, &mut self.rng);
    }

    /// Say something random and arm the next phrase.
    pub fn speak_random_phrase(&mut self) {
        let phrase = phrases::random_phrase(&mut self.rng);
        self.speak(phrase);
        self.schedule_talk();
    }

    /// Say `text` if speech is enabled. Failures are logged, never returned.
    pub fn speak(&mut self, text: &str) {
        if !self.settings.speech_enabled {
            debug!(text, "speech disabled");
            return;
        }
        match self.services.speech.speak(text) {
            Ok(()) => self.emit(Event::Spoke {
                text: text.to_string(),
            }),
            Err(e) => {
                error!("Speech engine error: {}", e);
                self.emit(Event::error(e.to_string()));
            }
        }
    }

    /// Show a short-lived notification next to the pet.
    pub fn notify(&mut self, text: &str) {
        self.services
            .window
            .show_notification(text, self.config.notification_duration);
        self.emit(Event::Notification {
            text: text.to_string(),
        });
    }

    /// Greet the user, or start the introduction on first launch.
    pub fn greet(&mut self) {
        if !self.settings.has_played_before() {
            self.speak(phrases::INTRODUCTION);
            self.emit(Event::NameRequested);
            self.play_intro_music();
        } else {
            let greeting = phrases::greeting(self.settings.user_name());
            self.notify(&greeting);
            self.speak(&greeting);
            self.stop_intro_music();
        }
    }

    /// Finish the introduction with the user's name. Empty names are ignored.
    pub fn submit_name(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        info!(name, "user introduced themselves");
        self.settings.set_user_name(name);
        self.save_settings();
        self.speak(&phrases::nice_to_meet_you(name));
        self.stop_intro_music();
    }

    fn play_intro_music(&mut self) {
        let path = self.config.intro_music_path.clone();
        if let Err(e) = self.services.audio.play_loop(&path) {
            error!("Failed to play intro music: {}", e);
            self.emit(Event::error(e.to_string()));
        }
    }

    fn stop_intro_music(&mut self) {
        if let Err(e) = self.services.audio.stop() {
            error!("Failed to stop music: {}", e);
            self.emit(Event::error(e.to_string()));
        }
    }

    fn save_settings(&mut self) {
        match self.store.save(&self.settings) {
            Ok(()) => self.emit(Event::SettingsSaved),
            Err(e) => {
                error!("Failed to save settings: {}", e);
                self.emit(Event::error(e.to_string()));
            }
        }
    }

    /// Carry out a context menu action.
    pub fn handle_menu(&mut self, action: MenuAction) {
        debug!(?action, "menu action");
        match action {
            MenuAction::SelectIdleImage(path) => self.select_idle_image(path),
            MenuAction::SelectMovingImage(path) => {
                self.settings.image_moving = Some(path);
                self.save_settings();
            }
            MenuAction::ClearData => self.clear_data(),
            MenuAction::SurfWeb => self.surf_web(),
            MenuAction::Quit => self.quit(),
            MenuAction::TellJoke => self.tell_joke(),
            MenuAction::Talk(text) => {
                if !text.trim().is_empty() {
                    self.speak(&text);
                }
            }
        }
    }

    fn select_idle_image(&mut self, path: PathBuf) {
        self.settings.image = Some(path);
        self.save_settings();
        self.show_visual(Visual::Idle);
    }

    /// Tell a random joke out loud and on screen.
    pub fn tell_joke(&mut self) {
        let joke = phrases::random_joke(&mut self.rng);
        self.speak(joke);
        self.notify(joke);
    }

    /// Open the configured web page in the default browser.
    pub fn surf_web(&mut self) {
        let url = self.config.web_url.clone();
        match self.services.browser.open(&url) {
            Ok(()) => self.emit(Event::OpenedUrl { url }),
            Err(e) => {
                error!("Failed to open browser: {}", e);
                self.emit(Event::error(e.to_string()));
            }
        }
    }

    /// Forget everything the pet has collected, then quit.
    pub fn clear_data(&mut self) {
        info!("clearing collected data");
        self.settings = Settings::default();
        self.save_settings();
        self.quit();
    }

    /// Move the overlay by a pointer drag offset.
    pub fn drag(&mut self, dx: i32, dy: i32) {
        let position = self.services.window.position().offset(dx, dy);
        self.services.window.set_position(position);
        self.emit(Event::Moved { position });
    }

    /// Stop all timers and the music, and mark the pet as finished.
    pub fn quit(&mut self) {
        if !self.running {
            return;
        }
        info!("Snakey going to sleep");
        self.running = false;
        self.timers.clear();
        self.movement.cancel_glide(&mut self.timers);
        self.stop_intro_music();
        self.emit(Event::Quit);
    }

    /// Whether the pet is still running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The visual currently selected.
    pub fn visual(&self) -> Visual {
        self.visual
    }

    /// Current overlay position.
    pub fn position(&self) -> Position {
        self.services.window.position()
    }

    /// The pet's clock.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of timers waiting to fire.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}
