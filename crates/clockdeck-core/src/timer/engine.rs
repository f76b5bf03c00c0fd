//! Countdown timer engine.
//!
//! Counts a whole-second `remaining` down from an operator-supplied number of
//! minutes. There is no internal thread: the caller invokes `tick()` once a
//! second while the timer is running.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Idle        (stop / toggle)
//! Running -> Idle                (remaining hits zero: TimerFinished)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new();
//! engine.start(5, now)?;
//! // Once a second:
//! if let Some(Event::TimerFinished { .. }) = engine.tick(now) { /* ring */ }
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::counter::{hms, RunState};
use crate::error::ValidationError;
use crate::events::Event;
use crate::storage::snapshot::elapsed_secs;
use crate::storage::{Persisted, Restored};

/// A countdown in progress. `0 < total` and `remaining <= total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    pub remaining: u64,
    pub total: u64,
}

#[derive(Debug, Clone, Default)]
pub struct TimerEngine {
    state: RunState,
    countdown: Option<Countdown>,
    /// Duration text as last entered or picked from a preset.
    input: String,
    /// A preset was picked and nothing has been started from it yet.
    preset_pending: bool,
    /// Instant at which `remaining` was last exact.
    synced_at: DateTime<Utc>,
}

/// Persisted form.
///
/// `total == 0` marks a snapshot that only carries the entered duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub remaining: u64,
    pub total: u64,
    pub running: bool,
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub input_value: String,
}

/// Read-only projection for the render layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerView {
    pub remaining_secs: u64,
    pub total_secs: u64,
    pub running: bool,
    /// `HH:MM:SS` of the remaining time.
    pub display: String,
    /// Remaining share of the total, rounded, 0 ..= 100.
    pub percentage: u8,
    /// Remaining share of the total, 0.0 ..= 1.0.
    pub progress: f64,
    pub input: String,
}

/// Parse operator input as a positive whole number of minutes.
///
/// # Errors
/// Returns [`ValidationError::InvalidDuration`] for anything else.
pub fn parse_minutes(input: &str) -> Result<u32, ValidationError> {
    match input.trim().parse::<u32>() {
        Ok(minutes) if minutes > 0 => Ok(minutes),
        _ => Err(ValidationError::InvalidDuration {
            input: input.to_string(),
        }),
    }
}

impl TimerEngine {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn countdown(&self) -> Option<Countdown> {
        self.countdown
    }

    pub fn remaining_secs(&self) -> u64 {
        self.countdown.map(|c| c.remaining).unwrap_or(0)
    }

    pub fn total_secs(&self) -> u64 {
        self.countdown.map(|c| c.total).unwrap_or(0)
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn view(&self) -> TimerView {
        let (remaining, total) = (self.remaining_secs(), self.total_secs());
        let progress = if total == 0 {
            0.0
        } else {
            remaining as f64 / total as f64
        };
        TimerView {
            remaining_secs: remaining,
            total_secs: total,
            running: self.is_running(),
            display: hms(remaining),
            percentage: (progress * 100.0).round() as u8,
            progress,
            input: self.input.clone(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a fresh countdown of `minutes`, replacing any previous one.
    ///
    /// # Errors
    /// Rejects zero minutes; the engine is left untouched.
    pub fn start(&mut self, minutes: u32, now: DateTime<Utc>) -> Result<Event, ValidationError> {
        if minutes == 0 {
            return Err(ValidationError::InvalidDuration {
                input: minutes.to_string(),
            });
        }
        let total = u64::from(minutes) * 60;
        self.input = minutes.to_string();
        self.preset_pending = false;
        self.countdown = Some(Countdown {
            remaining: total,
            total,
        });
        self.state = RunState::Running;
        self.synced_at = now;
        Ok(Event::TimerStarted {
            total_secs: total,
            at: now,
        })
    }

    /// The start/stop button: stops a running countdown, otherwise starts a
    /// fresh one from `input`.
    ///
    /// # Errors
    /// Returns a validation error if `input` is not a positive whole number
    /// of minutes; the engine is left untouched.
    pub fn toggle(&mut self, input: &str, now: DateTime<Utc>) -> Result<Event, ValidationError> {
        if let Some(event) = self.stop(now) {
            return Ok(event);
        }
        let minutes = parse_minutes(input)?;
        self.start(minutes, now)
    }

    /// Pause. `remaining` is kept for [`resume`](Self::resume).
    pub fn stop(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if !self.is_running() {
            return None;
        }
        self.state = RunState::Idle;
        self.synced_at = now;
        Some(Event::TimerStopped {
            remaining_secs: self.remaining_secs(),
            at: now,
        })
    }

    pub fn resume(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.is_running() || self.remaining_secs() == 0 {
            return None;
        }
        self.state = RunState::Running;
        self.synced_at = now;
        Some(Event::TimerResumed {
            remaining_secs: self.remaining_secs(),
            at: now,
        })
    }

    /// Fill in the duration without starting.
    pub fn set_preset(&mut self, minutes: u32) {
        self.input = minutes.to_string();
        self.preset_pending = true;
    }

    /// One-second tick. Returns `Some(Event::TimerFinished)` on the tick
    /// that reaches zero.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if !self.is_running() {
            return None;
        }
        let countdown = self.countdown.as_mut()?;
        countdown.remaining = countdown.remaining.saturating_sub(1);
        self.synced_at = now;
        if countdown.remaining == 0 {
            return Some(self.finish(now));
        }
        None
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// The entered duration survives, so the next start repeats it.
    fn finish(&mut self, now: DateTime<Utc>) -> Event {
        let total_secs = self.total_secs();
        self.state = RunState::Idle;
        self.countdown = None;
        self.preset_pending = false;
        Event::TimerFinished { total_secs, at: now }
    }
}

impl Persisted for TimerEngine {
    const KEY: &'static str = "timer";
    type Snapshot = TimerSnapshot;

    fn to_snapshot(&self) -> Option<TimerSnapshot> {
        match self.countdown {
            Some(c) => Some(TimerSnapshot {
                remaining: c.remaining,
                total: c.total,
                running: self.is_running(),
                saved_at: self.synced_at,
                input_value: self.input.clone(),
            }),
            None if self.preset_pending => Some(TimerSnapshot {
                remaining: 0,
                total: 0,
                running: false,
                saved_at: self.synced_at,
                input_value: self.input.clone(),
            }),
            None => None,
        }
    }

    fn restore(snapshot: TimerSnapshot, now: DateTime<Utc>) -> Option<Restored<Self>> {
        if snapshot.total == 0 {
            if snapshot.remaining != 0 || snapshot.running {
                return None;
            }
            return Some(Restored {
                engine: TimerEngine {
                    input: snapshot.input_value,
                    preset_pending: true,
                    synced_at: snapshot.saved_at,
                    ..TimerEngine::default()
                },
                events: Vec::new(),
            });
        }
        if snapshot.remaining > snapshot.total || snapshot.remaining == 0 {
            return None;
        }

        let mut engine = TimerEngine {
            state: RunState::Idle,
            countdown: Some(Countdown {
                remaining: snapshot.remaining,
                total: snapshot.total,
            }),
            input: snapshot.input_value,
            preset_pending: false,
            synced_at: snapshot.saved_at,
        };
        if !snapshot.running {
            return Some(Restored {
                engine,
                events: Vec::new(),
            });
        }

        let delta = elapsed_secs(snapshot.saved_at, now);
        if delta >= snapshot.remaining {
            let finished_at = snapshot.saved_at + Duration::seconds(snapshot.remaining as i64);
            tracing::info!(%finished_at, "timer finished while not running");
            let event = engine.finish(now);
            return Some(Restored {
                engine,
                events: vec![event],
            });
        }

        engine.state = RunState::Running;
        engine.countdown = Some(Countdown {
            remaining: snapshot.remaining - delta,
            total: snapshot.total,
        });
        engine.synced_at = snapshot.saved_at + Duration::seconds(delta as i64);
        Some(Restored {
            engine,
            events: Vec::new(),
        })
    }
}
