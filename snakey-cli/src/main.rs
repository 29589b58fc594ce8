//! Snakey CLI - a desktop pet that wanders around, talks, and tells jokes.

mod input;

use std::path::PathBuf;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use snakey_core::{
    AudioService, CommandSpeech, Config, Event, EventReceiver, Pet, Services, SilentAudio,
    SilentSpeech, Size, SpeechService, SystemBrowser, VirtualWindow, CONTEXT_MENU,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Instant;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use crate::input::Command;

/// Snakey - a little snake that lives on your screen.
///
/// Snakey glides to a random spot every few seconds, mutters to itself,
/// and answers the commands you type (type `help` to list them).
#[derive(Parser, Debug)]
#[command(name = "snakey")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the settings JSON file.
    #[arg(short = 's', long = "settings", env = "SNAKEY_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Path to the intro music played on first launch.
    #[arg(long = "intro-music", env = "SNAKEY_INTRO_MUSIC")]
    pub intro_music: Option<PathBuf>,

    /// Screen size the pet roams on, as WIDTHxHEIGHT.
    #[arg(long = "screen", default_value = "1920x1080")]
    pub screen: Size,

    /// Text-to-speech command; the text is passed as the last argument.
    #[arg(long = "speech-command", env = "SNAKEY_SPEECH")]
    pub speech_command: Option<String>,

    /// Arguments passed to the speech command before the text.
    #[arg(long = "speech-args", default_value = "", allow_hyphen_values = true)]
    pub speech_args: String,

    /// Page opened by "Surf the Web!".
    #[arg(long = "web-url")]
    pub web_url: Option<String>,

    /// Disable speech and music.
    #[arg(short = 'm', long = "mute")]
    pub mute: bool,

    /// Enable verbose output.
    ///
    /// Shows every glide step and timer firing. `RUST_LOG` overrides this.
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    /// Convert CLI arguments to a Config.
    pub fn to_config(&self) -> Config {
        let mut config = Config::new()
            .screen_size(self.screen)
            .speech_args_str(&self.speech_args);

        if let Some(ref path) = self.settings {
            config = config.settings_path(path);
        }

        if let Some(ref path) = self.intro_music {
            config = config.intro_music_path(path);
        }

        if let Some(ref command) = self.speech_command {
            config = config.speech_command(command);
        }

        if let Some(ref url) = self.web_url {
            config = config.web_url(url);
        }

        config
    }

    /// Build the services the pet runs with.
    pub fn services(&self, config: &Config) -> Services {
        let window = VirtualWindow::new(
            config.initial_position,
            config.window_size,
            config.screen_size,
        );

        let (speech, audio): (Box<dyn SpeechService>, Box<dyn AudioService>) = if self.mute {
            (Box::new(SilentSpeech), Box::new(SilentAudio))
        } else {
            (
                Box::new(CommandSpeech::new(
                    &config.speech_command,
                    config.speech_args.clone(),
                )),
                music_player(),
            )
        };

        Services {
            window: Box::new(window),
            speech,
            audio,
            browser: Box::new(SystemBrowser),
        }
    }
}

#[cfg(feature = "audio")]
fn music_player() -> Box<dyn AudioService> {
    Box::new(snakey_core::RodioAudio::new())
}

#[cfg(not(feature = "audio"))]
fn music_player() -> Box<dyn AudioService> {
    debug!("built without the audio feature, intro music is off");
    Box::new(SilentAudio)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_events(events: &mut EventReceiver) {
    while let Ok(event) = events.try_recv() {
        match event {
            // A glide produces a step every few milliseconds.
            Event::Moved { position } => debug!(%position, "moved"),
            Event::MoveScheduled { .. } => debug!("{}", event),
            other => println!("snakey: {}", other),
        }
    }
}

fn print_help() {
    let labels: Vec<_> = CONTEXT_MENU.iter().map(|entry| entry.label()).collect();
    println!("menu: {}", labels.join(" | "));
    println!("{}", input::HELP);
}

fn handle_line(pet: &mut Pet, line: &str) {
    match input::parse(line) {
        Ok(Command::Menu(action)) => pet.handle_menu(action),
        Ok(Command::Name(name)) => pet.submit_name(&name),
        Ok(Command::Drag(dx, dy)) => pet.drag(dx, dy),
        Ok(Command::Where) => println!("snakey is at {}", pet.position()),
        Ok(Command::Help) => print_help(),
        Ok(Command::Nothing) => {}
        Err(message) => println!("{}", message),
    }
}

async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.to_config();
    config.validate()?;
    let services = cli.services(&config);
    let (mut pet, mut events) = Pet::new(config, services, StdRng::from_entropy());

    let start = Instant::now();
    pet.start();
    print_events(&mut events);
    println!("type 'help' for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    while pet.is_running() {
        let deadline = pet.next_deadline().map(|d| start + d);

        tokio::select! {
            _ = sleep_until_deadline(deadline) => {
                pet.run_until(start.elapsed());
            }
            line = lines.next_line(), if stdin_open => {
                pet.run_until(start.elapsed());
                match line {
                    Ok(Some(line)) => handle_line(&mut pet, &line),
                    Ok(None) => {
                        debug!("stdin closed, running without commands");
                        stdin_open = false;
                    }
                    Err(e) => {
                        warn!("failed to read stdin: {}", e);
                        stdin_open = false;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                pet.quit();
            }
        }

        print_events(&mut events);
    }

    Ok(())
}
