use chrono::Utc;
use clap::Subcommand;
use clockdeck_core::clock::zone_listing;
use clockdeck_core::Config;

use super::{open_deck, print_json, CliResult};

#[derive(Subcommand)]
pub enum TzAction {
    /// Print the selected timezone and its current time
    Get,
    /// Select a timezone by IANA name (e.g. "Europe/Berlin")
    Set {
        name: String,
    },
    /// List every known zone with its current time
    List,
}

pub fn run(action: TzAction, config: Config) -> CliResult {
    match action {
        TzAction::Get => {
            let deck = open_deck(config)?;
            print_json(&deck.view().clock)?;
        }
        TzAction::Set { name } => {
            let mut deck = open_deck(config)?;
            print_json(&deck.set_timezone(&name)?)?;
        }
        TzAction::List => {
            for (name, time) in zone_listing(Utc::now()) {
                println!("{name:<32} {time}");
            }
        }
    }
    Ok(())
}
