use clap::Subcommand;
use clockdeck_core::Config;

use super::{open_deck, print_event_or, print_json, CliResult};

#[derive(Subcommand)]
pub enum StopwatchAction {
    /// Start counting (keeps the current count)
    Start,
    /// Stop counting
    Stop,
    /// Record a lap while running
    Lap,
    /// Stop and zero the count, clearing laps
    Reset,
    /// Print current stopwatch state as JSON
    Status,
}

pub fn run(action: StopwatchAction, config: Config) -> CliResult {
    let mut deck = open_deck(config)?;

    match action {
        StopwatchAction::Start if !deck.stopwatch().is_running() => {
            print_json(&deck.stopwatch_toggle()?)?;
        }
        StopwatchAction::Stop if deck.stopwatch().is_running() => {
            print_json(&deck.stopwatch_toggle()?)?;
        }
        StopwatchAction::Lap => {
            let event = deck.stopwatch_lap()?;
            print_event_or(event, &deck.stopwatch().view())?;
        }
        StopwatchAction::Reset => {
            print_json(&deck.stopwatch_reset()?)?;
        }
        StopwatchAction::Start | StopwatchAction::Stop | StopwatchAction::Status => {
            print_json(&deck.stopwatch().view())?;
        }
    }
    Ok(())
}
