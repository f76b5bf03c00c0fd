use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every state change in the system produces an Event.
///
/// The application consumes them after each command or tick: the render
/// layer redraws, the audio layer starts or stops the alarm melody.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    StopwatchStarted {
        seconds: u64,
        at: DateTime<Utc>,
    },
    StopwatchStopped {
        seconds: u64,
        at: DateTime<Utc>,
    },
    StopwatchReset {
        at: DateTime<Utc>,
    },
    /// `lap` is 1-based.
    StopwatchLap {
        lap: usize,
        seconds: u64,
        at: DateTime<Utc>,
    },
    TimerStarted {
        total_secs: u64,
        at: DateTime<Utc>,
    },
    TimerStopped {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero, live or while the process was not running.
    TimerFinished {
        total_secs: u64,
        at: DateTime<Utc>,
    },
    AlarmArmed {
        target: DateTime<Utc>,
        timezone: String,
        at: DateTime<Utc>,
    },
    AlarmRinging {
        target: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    AlarmCleared {
        at: DateTime<Utc>,
    },
    TimezoneChanged {
        timezone: String,
        at: DateTime<Utc>,
    },
    ThemeChanged {
        dark_mode: bool,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// The one-shot notifications the surrounding application must react to.
    pub fn is_notification(&self) -> bool {
        matches!(
            self,
            Event::TimerFinished { .. } | Event::AlarmRinging { .. } | Event::AlarmCleared { .. }
        )
    }

    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::StopwatchStarted { at, .. }
            | Event::StopwatchStopped { at, .. }
            | Event::StopwatchReset { at }
            | Event::StopwatchLap { at, .. }
            | Event::TimerStarted { at, .. }
            | Event::TimerStopped { at, .. }
            | Event::TimerResumed { at, .. }
            | Event::TimerFinished { at, .. }
            | Event::AlarmArmed { at, .. }
            | Event::AlarmRinging { at, .. }
            | Event::AlarmCleared { at }
            | Event::TimezoneChanged { at, .. }
            | Event::ThemeChanged { at, .. } => *at,
        }
    }
}
