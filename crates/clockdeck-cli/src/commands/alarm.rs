use clap::Subcommand;
use clockdeck_core::{Config, Period};

use super::{open_deck, print_event_or, print_json, CliResult};

#[derive(Subcommand)]
pub enum AlarmAction {
    /// Arm for the next occurrence of a 12-hour time in the selected zone
    Set {
        /// Hour, 1-12
        hour: u32,
        /// Minute, 0-59
        minute: u32,
        /// AM or PM
        period: String,
    },
    /// Arm at the configured default time
    Default,
    /// Disarm, or dismiss a ringing alarm
    Cancel,
    /// Print current alarm state as JSON
    Status,
}

pub fn run(action: AlarmAction, config: Config) -> CliResult {
    let mut deck = open_deck(config)?;

    match action {
        AlarmAction::Set {
            hour,
            minute,
            period,
        } => {
            let period: Period = period.parse()?;
            print_json(&deck.alarm_arm(hour, minute, period)?)?;
        }
        AlarmAction::Default => {
            print_json(&deck.alarm_arm_default()?)?;
        }
        AlarmAction::Cancel => {
            let event = deck.alarm_cancel()?;
            print_event_or(event, &deck.view().alarm)?;
        }
        AlarmAction::Status => {
            print_json(&deck.view().alarm)?;
        }
    }
    Ok(())
}
