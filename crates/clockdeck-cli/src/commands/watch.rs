//! `clockdeck watch`: the long-running view.
//!
//! A current-thread runtime multiplexes four sources: the clock's
//! one-second interval (always on), one interval per running engine,
//! operator lines on stdin, and Ctrl-C. An engine's interval exists only
//! while that engine is running, so stopping it discards any tick that was
//! still due.

use std::io::IsTerminal;
use std::time::Duration;

use clockdeck_core::sound::{voice, Melody};
use clockdeck_core::{
    Config, CoreError, Database, Deck, Event, KvStore, MemoryStore, Period, Renderer, SystemClock,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval, interval_at, Instant, Interval};

use super::{alarm_sound, CliResult};
use crate::render::TerminalRenderer;

const TICK: Duration = Duration::from_secs(1);

const HELP: &str = "commands: sw | lap | reset | timer [MIN] | resume | preset MIN | \
alarm [H M AM|PM] | cancel | tz NAME | theme | quit";

/// One line typed at the `watch` prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LineCommand {
    StopwatchToggle,
    StopwatchLap,
    StopwatchReset,
    /// Start/stop button; empty input reuses the entered duration.
    TimerToggle(String),
    TimerResume,
    TimerPreset(u32),
    AlarmSet { hour: u32, minute: u32, period: Period },
    AlarmDefault,
    AlarmCancel,
    Timezone(String),
    Theme,
    Help,
    Quit,
}

impl LineCommand {
    fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(None);
        };
        let rest: Vec<&str> = words.collect();
        let command = match (head.to_ascii_lowercase().as_str(), rest.as_slice()) {
            ("sw" | "stopwatch", []) => Self::StopwatchToggle,
            ("lap", []) => Self::StopwatchLap,
            ("reset", []) => Self::StopwatchReset,
            ("timer" | "t", []) => Self::TimerToggle(String::new()),
            ("timer" | "t", [minutes]) => Self::TimerToggle((*minutes).to_string()),
            ("resume", []) => Self::TimerResume,
            ("preset", [minutes]) => Self::TimerPreset(
                minutes
                    .parse()
                    .map_err(|_| "Please enter a valid number of minutes.".to_string())?,
            ),
            ("alarm", []) => Self::AlarmDefault,
            ("alarm", [hour, minute, period]) => Self::AlarmSet {
                hour: hour.parse().map_err(|_| format!("invalid hour: {hour}"))?,
                minute: minute.parse().map_err(|_| format!("invalid minute: {minute}"))?,
                period: period.parse().map_err(|e: clockdeck_core::ValidationError| e.to_string())?,
            },
            ("cancel", []) => Self::AlarmCancel,
            ("tz", [name]) => Self::Timezone((*name).to_string()),
            ("theme", []) => Self::Theme,
            ("help" | "?", []) => Self::Help,
            ("quit" | "q" | "exit", []) => Self::Quit,
            _ => return Err(format!("unknown command: {}", line.trim())),
        };
        Ok(Some(command))
    }
}

pub fn run(ephemeral: bool, config: Config) -> CliResult {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    if ephemeral {
        let deck = Deck::open(MemoryStore::new(), SystemClock, config)?;
        runtime.block_on(watch(deck))
    } else {
        let deck = Deck::open(Database::open()?, SystemClock, config)?;
        runtime.block_on(watch(deck))
    }
}

async fn watch<S: KvStore>(mut deck: Deck<S, SystemClock>) -> CliResult {
    let mut sound = alarm_sound(deck.config());
    let melody = Melody::alarm(deck.config().sound.repeats);
    let stdout = std::io::stdout();
    let ansi = stdout.is_terminal();
    let mut renderer = TerminalRenderer::new(stdout, ansi);
    renderer.notice(HELP);

    for event in deck.drain_events() {
        renderer.announce(&event);
        voice(sound.as_mut(), &melody, &event);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut clock_tick = interval(TICK);
    let mut stopwatch_tick: Option<Interval> = None;
    let mut timer_tick: Option<Interval> = None;

    tracing::info!("watch started");
    loop {
        sync_interval(&mut stopwatch_tick, deck.stopwatch().is_running());
        sync_interval(&mut timer_tick, deck.timer().is_running());
        renderer.display(&deck.view());

        let events: Vec<Event> = tokio::select! {
            _ = clock_tick.tick() => deck.tick_clock()?.into_iter().collect(),
            _ = next_tick(&mut stopwatch_tick) => {
                deck.tick_stopwatch()?;
                Vec::new()
            }
            _ = next_tick(&mut timer_tick) => deck.tick_timer()?.into_iter().collect(),
            line = lines.next_line(), if stdin_open => match line? {
                Some(line) => match LineCommand::parse(&line) {
                    Ok(Some(LineCommand::Quit)) => break,
                    Ok(Some(LineCommand::Help)) => {
                        renderer.notice(HELP);
                        Vec::new()
                    }
                    Ok(Some(command)) => match apply(&mut deck, command) {
                        Ok(events) => events,
                        Err(CoreError::Validation(e)) => {
                            renderer.notice(e.to_string());
                            Vec::new()
                        }
                        Err(e) => return Err(e.into()),
                    },
                    Ok(None) => Vec::new(),
                    Err(message) => {
                        renderer.notice(message);
                        Vec::new()
                    }
                },
                None => {
                    stdin_open = false;
                    Vec::new()
                }
            },
            _ = tokio::signal::ctrl_c() => break,
        };

        for event in &events {
            renderer.announce(event);
            voice(sound.as_mut(), &melody, event);
        }
    }

    sound.stop();
    tracing::info!("watch stopped");
    Ok(())
}

fn apply<S: KvStore>(deck: &mut Deck<S, SystemClock>, command: LineCommand) -> Result<Vec<Event>, CoreError> {
    let event = match command {
        LineCommand::StopwatchToggle => Some(deck.stopwatch_toggle()?),
        LineCommand::StopwatchLap => deck.stopwatch_lap()?,
        LineCommand::StopwatchReset => Some(deck.stopwatch_reset()?),
        LineCommand::TimerToggle(input) => Some(deck.timer_toggle(&input)?),
        LineCommand::TimerResume => deck.timer_resume()?,
        LineCommand::TimerPreset(minutes) => {
            deck.timer_preset(minutes)?;
            None
        }
        LineCommand::AlarmSet {
            hour,
            minute,
            period,
        } => Some(deck.alarm_arm(hour, minute, period)?),
        LineCommand::AlarmDefault => Some(deck.alarm_arm_default()?),
        LineCommand::AlarmCancel => deck.alarm_cancel()?,
        LineCommand::Timezone(name) => Some(deck.set_timezone(&name)?),
        LineCommand::Theme => Some(deck.toggle_dark_mode()?),
        LineCommand::Help | LineCommand::Quit => None,
    };
    Ok(event.into_iter().collect())
}

/// Create the interval when the engine starts running, drop it when it
/// stops. The first tick lands one period after the start.
fn sync_interval(slot: &mut Option<Interval>, running: bool) {
    match (slot.is_some(), running) {
        (false, true) => *slot = Some(interval_at(Instant::now() + TICK, TICK)),
        (true, false) => *slot = None,
        _ => {}
    }
}

async fn next_tick(slot: &mut Option<Interval>) {
    match slot {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
