use chrono::Utc;
use clockdeck_core::{ClockView, Config, Zone};

use super::{open_deck, print_json, CliResult};

/// Print the clock in `tz`, or in the selected zone when absent. An explicit
/// zone is shown only and not remembered.
pub fn run(tz: Option<String>, config: Config) -> CliResult {
    let view = match tz {
        Some(name) => {
            let zone: Zone = name.parse()?;
            ClockView::at(Utc::now(), zone)
        }
        None => open_deck(config)?.view().clock,
    };
    print_json(&view)
}
