mod engine;

pub use engine::{parse_minutes, Countdown, TimerEngine, TimerSnapshot, TimerView};
