//! Stopwatch engine.
//!
//! A whole-second counter advanced by the caller's one-second tick. Like the
//! timer, it has no thread of its own.
//!
//! ```text
//! Idle <-> Running      (toggle)
//! *    ->  Idle, 0      (reset)
//! ```
//!
//! Laps record the count at the moment they are taken and are only
//! accepted while running; reset clears them.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::counter::{hms, RunState};
use crate::events::Event;
use crate::storage::{Persisted, Restored};
use crate::storage::snapshot::elapsed_secs;

#[derive(Debug, Clone, Default)]
pub struct Stopwatch {
    seconds: u64,
    state: RunState,
    laps: Vec<u64>,
    /// Instant at which `seconds` was last exact.
    synced_at: DateTime<Utc>,
}

/// Persisted form, written on every tick and transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopwatchSnapshot {
    pub seconds: u64,
    pub running: bool,
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub laps: Vec<u64>,
}

/// Read-only projection for the render layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopwatchView {
    pub seconds: u64,
    pub running: bool,
    /// `HH:MM:SS`.
    pub display: String,
    /// Human summary, e.g. `3m 12s elapsed`.
    pub summary: String,
    /// Position within the current minute, 0.0 .. 1.0.
    pub progress: f64,
    /// `Lap N: HH:MM:SS`, oldest first.
    pub laps: Vec<String>,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn laps(&self) -> &[u64] {
        &self.laps
    }

    pub fn view(&self) -> StopwatchView {
        StopwatchView {
            seconds: self.seconds,
            running: self.is_running(),
            display: hms(self.seconds),
            summary: summary(self.seconds),
            progress: (self.seconds % 60) as f64 / 60.0,
            laps: self
                .laps
                .iter()
                .enumerate()
                .map(|(i, &secs)| format!("Lap {}: {}", i + 1, hms(secs)))
                .collect(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start if idle, stop if running.
    pub fn toggle(&mut self, now: DateTime<Utc>) -> Event {
        match self.state {
            RunState::Idle => {
                self.state = RunState::Running;
                self.synced_at = now;
                Event::StopwatchStarted {
                    seconds: self.seconds,
                    at: now,
                }
            }
            RunState::Running => {
                self.state = RunState::Idle;
                self.synced_at = now;
                Event::StopwatchStopped {
                    seconds: self.seconds,
                    at: now,
                }
            }
        }
    }

    /// Stop and zero. The snapshot is erased on the next save.
    pub fn reset(&mut self, now: DateTime<Utc>) -> Event {
        self.state = RunState::Idle;
        self.seconds = 0;
        self.laps.clear();
        self.synced_at = now;
        Event::StopwatchReset { at: now }
    }

    /// Record the current count. Ignored unless running.
    pub fn lap(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if !self.is_running() {
            return None;
        }
        self.laps.push(self.seconds);
        Some(Event::StopwatchLap {
            lap: self.laps.len(),
            seconds: self.seconds,
            at: now,
        })
    }

    /// One-second tick. Returns whether the counter moved.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        if !self.is_running() {
            return false;
        }
        self.seconds = self.seconds.saturating_add(1);
        self.synced_at = now;
        true
    }
}

impl Persisted for Stopwatch {
    const KEY: &'static str = "stopwatch";
    type Snapshot = StopwatchSnapshot;

    fn to_snapshot(&self) -> Option<StopwatchSnapshot> {
        if self.seconds == 0 && !self.is_running() && self.laps.is_empty() {
            return None;
        }
        Some(StopwatchSnapshot {
            seconds: self.seconds,
            running: self.is_running(),
            saved_at: self.synced_at,
            laps: self.laps.clone(),
        })
    }

    fn restore(snapshot: StopwatchSnapshot, now: DateTime<Utc>) -> Option<Restored<Self>> {
        let engine = if snapshot.running {
            let delta = elapsed_secs(snapshot.saved_at, now);
            Stopwatch {
                seconds: snapshot.seconds.saturating_add(delta),
                state: RunState::Running,
                laps: snapshot.laps,
                synced_at: snapshot.saved_at + Duration::seconds(delta as i64),
            }
        } else {
            Stopwatch {
                seconds: snapshot.seconds,
                state: RunState::Idle,
                laps: snapshot.laps,
                synced_at: snapshot.saved_at,
            }
        };
        Some(Restored {
            engine,
            events: Vec::new(),
        })
    }
}

fn summary(seconds: u64) -> String {
    match seconds {
        0 => "0 seconds".to_string(),
        1 => "1 second".to_string(),
        s if s < 60 => format!("{s} seconds"),
        s if s < 3600 => format!("{}m {}s elapsed", s / 60, s % 60),
        s => format!("{}h {}m elapsed", s / 3600, (s % 3600) / 60),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap()
    }

    #[test]
    fn toggle_starts_and_stops() {
        let mut sw = Stopwatch::new();
        assert!(matches!(sw.toggle(t0()), Event::StopwatchStarted { seconds: 0, .. }));
        assert!(sw.is_running());
        assert!(matches!(sw.toggle(t0()), Event::StopwatchStopped { .. }));
        assert_eq!(sw.state(), RunState::Idle);
    }

    #[test]
    fn ticks_only_count_while_running() {
        let mut sw = Stopwatch::new();
        assert!(!sw.tick(t0()));
        sw.toggle(t0());
        for i in 1..=3 {
            assert!(sw.tick(t0() + Duration::seconds(i)));
        }
        sw.toggle(t0() + Duration::seconds(3));
        assert!(!sw.tick(t0() + Duration::seconds(4)));
        assert_eq!(sw.seconds(), 3);
    }

    #[test]
    fn reset_zeroes_and_stops() {
        let mut sw = Stopwatch::new();
        sw.toggle(t0());
        sw.tick(t0() + Duration::seconds(1));
        sw.reset(t0() + Duration::seconds(1));
        assert_eq!(sw.seconds(), 0);
        assert!(!sw.is_running());
        assert!(sw.to_snapshot().is_none());
    }

    #[test]
    fn restore_running_adds_elapsed() {
        let now = t0();
        let snap = StopwatchSnapshot {
            seconds: 10,
            running: true,
            saved_at: now - Duration::seconds(5),
            laps: Vec::new(),
        };
        let restored = Stopwatch::restore(snap, now).unwrap();
        assert_eq!(restored.engine.seconds(), 15);
        assert!(restored.engine.is_running());
    }

    #[test]
    fn restore_keeps_subsecond_remainder() {
        let saved_at = t0();
        let snap = StopwatchSnapshot {
            seconds: 0,
            running: true,
            saved_at,
            laps: Vec::new(),
        };
        let first = Stopwatch::restore(snap, saved_at + Duration::milliseconds(1_600))
            .unwrap()
            .engine;
        assert_eq!(first.seconds(), 1);
        let again = Stopwatch::restore(
            first.to_snapshot().unwrap(),
            saved_at + Duration::milliseconds(2_100),
        )
        .unwrap()
        .engine;
        assert_eq!(again.seconds(), 2);
    }

    #[test]
    fn restore_stopped_ignores_elapsed() {
        let snap = StopwatchSnapshot {
            seconds: 42,
            running: false,
            saved_at: t0() - Duration::hours(3),
            laps: vec![10, 30],
        };
        let restored = Stopwatch::restore(snap, t0()).unwrap();
        assert_eq!(restored.engine.seconds(), 42);
        assert!(!restored.engine.is_running());
        assert_eq!(restored.engine.laps(), &[10, 30]);
    }

    #[test]
    fn restore_from_future_timestamp_adds_nothing() {
        let snap = StopwatchSnapshot {
            seconds: 7,
            running: true,
            saved_at: t0() + Duration::minutes(10),
            laps: Vec::new(),
        };
        assert_eq!(Stopwatch::restore(snap, t0()).unwrap().engine.seconds(), 7);
    }

    #[test]
    fn laps_record_running_count() {
        let mut sw = Stopwatch::new();
        assert!(sw.lap(t0()).is_none());
        sw.toggle(t0());
        for i in 1..=5 {
            sw.tick(t0() + Duration::seconds(i));
        }
        let event = sw.lap(t0() + Duration::seconds(5));
        assert!(matches!(event, Some(Event::StopwatchLap { lap: 1, seconds: 5, .. })));
        for i in 6..=65 {
            sw.tick(t0() + Duration::seconds(i));
        }
        sw.lap(t0() + Duration::seconds(65));
        assert_eq!(sw.view().laps, vec!["Lap 1: 00:00:05", "Lap 2: 00:01:05"]);

        sw.toggle(t0() + Duration::seconds(65));
        assert!(sw.lap(t0() + Duration::seconds(66)).is_none());
        assert_eq!(sw.laps().len(), 2);
    }

    #[test]
    fn reset_clears_laps() {
        let mut sw = Stopwatch::new();
        sw.toggle(t0());
        sw.lap(t0());
        sw.reset(t0());
        assert!(sw.laps().is_empty());
        assert!(sw.to_snapshot().is_none());
    }

    #[test]
    fn snapshot_without_laps_still_loads() {
        let json = r#"{"seconds":3,"running":false,"saved_at":"2026-10-16T09:00:00Z"}"#;
        let snap: StopwatchSnapshot = serde_json::from_str(json).unwrap();
        assert!(snap.laps.is_empty());
    }

    #[test]
    fn summary_wording() {
        assert_eq!(summary(0), "0 seconds");
        assert_eq!(summary(1), "1 second");
        assert_eq!(summary(59), "59 seconds");
        assert_eq!(summary(192), "3m 12s elapsed");
        assert_eq!(summary(3_725), "1h 2m elapsed");
    }

    #[test]
    fn view_progress_tracks_minute() {
        let mut sw = Stopwatch::new();
        sw.toggle(t0());
        for i in 0..90 {
            sw.tick(t0() + Duration::seconds(i + 1));
        }
        let view = sw.view();
        assert_eq!(view.display, "00:01:30");
        assert!((view.progress - 0.5).abs() < f64::EPSILON);
    }
}
