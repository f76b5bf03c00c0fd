use clap::Subcommand;
use clockdeck_core::Config;

use super::{open_deck, print_json, CliResult};

#[derive(Subcommand)]
pub enum ThemeAction {
    /// Switch between light and dark mode
    Toggle,
    /// Print the current theme as JSON
    Status,
}

pub fn run(action: ThemeAction, config: Config) -> CliResult {
    let mut deck = open_deck(config)?;

    match action {
        ThemeAction::Toggle => print_json(&deck.toggle_dark_mode()?)?,
        ThemeAction::Status => print_json(&serde_json::json!({ "dark_mode": deck.dark_mode() }))?,
    }
    Ok(())
}
