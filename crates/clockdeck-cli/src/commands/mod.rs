//! One module per subcommand area. Each exposes an `XAction` enum and a
//! `run` handler; the one-shot handlers share the helpers below.

pub mod alarm;
pub mod clock;
pub mod config;
pub mod stopwatch;
pub mod theme;
pub mod timer;
pub mod tz;
pub mod watch;

use clockdeck_core::sound::{voice, AlarmSound, Melody, Silent, TerminalBell};
use clockdeck_core::{Config, Database, Deck, Event, SystemClock};
use serde::Serialize;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Open the on-disk deck and report whatever happened while no process was
/// running (a timer that ran out). Those events go to stderr so stdout
/// stays a single JSON document.
pub fn open_deck(config: Config) -> Result<Deck<Database, SystemClock>, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut deck = Deck::open(db, SystemClock, config)?;
    let pending = deck.drain_events();
    if !pending.is_empty() {
        let mut sound = alarm_sound(deck.config());
        let melody = Melody::alarm(deck.config().sound.repeats);
        for event in &pending {
            eprintln!("{}", serde_json::to_string_pretty(event)?);
            voice(sound.as_mut(), &melody, event);
        }
    }
    Ok(deck)
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print the event if there was one, otherwise the fallback state.
pub fn print_event_or<T: Serialize>(event: Option<Event>, fallback: &T) -> CliResult {
    match event {
        Some(event) => print_json(&event),
        None => print_json(fallback),
    }
}

pub fn alarm_sound(config: &Config) -> Box<dyn AlarmSound> {
    if config.sound.enabled {
        Box::new(TerminalBell::stderr())
    } else {
        Box::new(Silent)
    }
}
