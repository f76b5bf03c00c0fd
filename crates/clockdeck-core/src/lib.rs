//! # Clockdeck Core Library
//!
//! Core logic for clockdeck: a live clock, a stopwatch, a countdown timer and
//! a one-shot alarm whose state survives restarts. The CLI is a thin layer
//! over this crate.
//!
//! ## Architecture
//!
//! - **Engines**: plain state machines with no threads. The caller supplies
//!   "now" and drives a one-second `tick()`.
//! - **Storage**: a flat key-value store (SQLite) holding one JSON snapshot
//!   per engine, plus a TOML configuration file.
//! - **Deck**: owns the engines, persists each one after it changes, and
//!   projects everything into a [`DeckView`] for the render layer.
//!
//! ## Key Components
//!
//! - [`Stopwatch`], [`TimerEngine`], [`AlarmEngine`]: the engines
//! - [`Deck`]: application coordinator
//! - [`Database`]: persistence store
//! - [`Config`]: application configuration
//! - [`Event`]: notifications raised by the engines

pub mod alarm;
pub mod clock;
pub mod counter;
pub mod deck;
pub mod error;
pub mod events;
pub mod preferences;
pub mod sound;
pub mod stopwatch;
pub mod storage;
pub mod timer;

pub use alarm::{AlarmEngine, AlarmSetting, AlarmState, AlarmView, Period};
pub use clock::{ClockView, ManualClock, SystemClock, TimeSource, Zone};
pub use counter::RunState;
pub use deck::{Deck, DeckView, Renderer};
pub use error::{ConfigError, CoreError, SoundError, StorageError, ValidationError};
pub use events::Event;
pub use preferences::Preferences;
pub use sound::{AlarmSound, Melody, Silent, TerminalBell};
pub use stopwatch::{Stopwatch, StopwatchView};
pub use storage::{Config, Database, KvStore, MemoryStore, Persisted};
pub use timer::{TimerEngine, TimerView};
