use clap::Subcommand;
use clockdeck_core::timer::parse_minutes;
use clockdeck_core::Config;

use super::{open_deck, print_event_or, print_json, CliResult};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start a fresh countdown
    Start {
        /// Duration in whole minutes; defaults to the last entered one
        minutes: Option<String>,
    },
    /// Pause the countdown
    Stop,
    /// Continue a paused countdown
    Resume,
    /// Enter a duration without starting
    Preset {
        /// Duration in whole minutes
        minutes: u32,
    },
    /// Print current timer state as JSON
    Status,
}

pub fn run(action: TimerAction, config: Config) -> CliResult {
    let mut deck = open_deck(config)?;

    match action {
        TimerAction::Start { minutes } => {
            let input = minutes.unwrap_or_else(|| deck.timer().input().to_string());
            let minutes = parse_minutes(&input)?;
            print_json(&deck.timer_start(minutes)?)?;
        }
        TimerAction::Stop => {
            let event = deck.timer_stop()?;
            print_event_or(event, &deck.timer().view())?;
        }
        TimerAction::Resume => {
            let event = deck.timer_resume()?;
            print_event_or(event, &deck.timer().view())?;
        }
        TimerAction::Preset { minutes } => {
            deck.timer_preset(minutes)?;
            print_json(&deck.timer().view())?;
        }
        TimerAction::Status => {
            print_json(&deck.timer().view())?;
        }
    }
    Ok(())
}
