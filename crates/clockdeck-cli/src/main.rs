use clap::{Parser, Subcommand};
use clockdeck_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "clockdeck", version, about = "Clock, stopwatch, timer and alarm")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current time
    Clock {
        /// Show the time in this IANA zone instead of the selected one
        #[arg(long)]
        tz: Option<String>,
    },
    /// Stopwatch control
    Stopwatch {
        #[command(subcommand)]
        action: commands::stopwatch::StopwatchAction,
    },
    /// Countdown timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// One-shot alarm
    Alarm {
        #[command(subcommand)]
        action: commands::alarm::AlarmAction,
    },
    /// Timezone selection
    Tz {
        #[command(subcommand)]
        action: commands::tz::TzAction,
    },
    /// Dark mode preference
    Theme {
        #[command(subcommand)]
        action: commands::theme::ThemeAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Live view with a one-second tick; reads commands from stdin
    Watch {
        /// Keep state in memory only
        #[arg(long)]
        ephemeral: bool,
    },
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let loaded = Config::load();
    // A broken config still gets a subscriber, at the default level.
    init_tracing(loaded.as_ref().unwrap_or(&Config::default()));
    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "using default configuration");
        Config::default()
    });

    let result = match cli.command {
        Commands::Clock { tz } => commands::clock::run(tz, config),
        Commands::Stopwatch { action } => commands::stopwatch::run(action, config),
        Commands::Timer { action } => commands::timer::run(action, config),
        Commands::Alarm { action } => commands::alarm::run(action, config),
        Commands::Tz { action } => commands::tz::run(action, config),
        Commands::Theme { action } => commands::theme::run(action, config),
        Commands::Config { action } => commands::config::run(action),
        Commands::Watch { ephemeral } => commands::watch::run(ephemeral, config),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
