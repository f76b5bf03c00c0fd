//! Alarm engine.
//!
//! ```text
//! Disarmed -> Armed -> Ringing -> Disarmed
//!               \__________________/  (cancel)
//! ```
//!
//! Firing takes the alarm out of `Armed`, so a stale target can never ring
//! twice. `Ringing` only lasts until the operator dismisses it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::setting::{AlarmSetting, Period};
use crate::clock::Zone;
use crate::events::Event;
use crate::storage::{Persisted, Restored};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmState {
    Disarmed,
    Armed,
    Ringing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Scheduled {
    setting: AlarmSetting,
    target: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Slot {
    #[default]
    Disarmed,
    Armed(Scheduled),
    Ringing(Scheduled),
}

#[derive(Debug, Clone, Default)]
pub struct AlarmEngine {
    slot: Slot,
}

/// Persisted form; only written while armed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmSnapshot {
    pub hour: u32,
    pub minute: u32,
    pub period: Period,
    pub timezone: Zone,
    pub target_instant: DateTime<Utc>,
}

/// Read-only projection for the render layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmView {
    pub state: AlarmState,
    pub target: Option<DateTime<Utc>>,
    /// `hh:mm AM` in the display zone, or `--:--`.
    pub display: String,
    /// Time left, e.g. `In 2h 5m`.
    pub countdown: String,
    /// `ALARM ON` / `ALARM OFF`.
    pub indicator: String,
}

impl AlarmEngine {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> AlarmState {
        match self.slot {
            Slot::Disarmed => AlarmState::Disarmed,
            Slot::Armed(_) => AlarmState::Armed,
            Slot::Ringing(_) => AlarmState::Ringing,
        }
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.slot, Slot::Armed(_))
    }

    pub fn target(&self) -> Option<DateTime<Utc>> {
        self.scheduled().map(|s| s.target)
    }

    pub fn setting(&self) -> Option<AlarmSetting> {
        self.scheduled().map(|s| s.setting)
    }

    /// Derived from `target - now` on every call; nothing here is stored.
    pub fn view(&self, now: DateTime<Utc>, display_zone: Zone) -> AlarmView {
        let Some(scheduled) = self.scheduled() else {
            return AlarmView {
                state: AlarmState::Disarmed,
                target: None,
                display: "--:--".to_string(),
                countdown: "No alarm set".to_string(),
                indicator: "ALARM OFF".to_string(),
            };
        };
        let countdown = match self.slot {
            Slot::Ringing(_) => "Ringing!".to_string(),
            _ => countdown_text((scheduled.target - now).num_seconds()),
        };
        AlarmView {
            state: self.state(),
            target: Some(scheduled.target),
            display: display_zone
                .local(scheduled.target)
                .format("%I:%M %p")
                .to_string(),
            countdown,
            indicator: "ALARM ON".to_string(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Schedule the next occurrence of `setting`, replacing any alarm.
    pub fn arm(&mut self, setting: AlarmSetting, now: DateTime<Utc>) -> Event {
        let target = setting.next_occurrence(now);
        self.slot = Slot::Armed(Scheduled { setting, target });
        tracing::info!(%setting, alarm_at = %target, "alarm armed");
        Event::AlarmArmed {
            target,
            timezone: setting.zone().name().to_string(),
            at: now,
        }
    }

    /// Compare against the clock. Rings at most once per arming.
    pub fn on_tick(&mut self, now: DateTime<Utc>) -> Option<Event> {
        match self.slot {
            Slot::Armed(scheduled) if now >= scheduled.target => {
                self.slot = Slot::Ringing(scheduled);
                tracing::info!(alarm_at = %scheduled.target, "alarm ringing");
                Some(Event::AlarmRinging {
                    target: scheduled.target,
                    at: now,
                })
            }
            _ => None,
        }
    }

    /// Disarm or dismiss. A no-op without an event when already disarmed.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.slot == Slot::Disarmed {
            return None;
        }
        self.slot = Slot::Disarmed;
        Some(Event::AlarmCleared { at: now })
    }

    fn scheduled(&self) -> Option<Scheduled> {
        match self.slot {
            Slot::Disarmed => None,
            Slot::Armed(s) | Slot::Ringing(s) => Some(s),
        }
    }
}

impl Persisted for AlarmEngine {
    const KEY: &'static str = "alarm";
    type Snapshot = AlarmSnapshot;

    fn to_snapshot(&self) -> Option<AlarmSnapshot> {
        match self.slot {
            Slot::Armed(Scheduled { setting, target }) => Some(AlarmSnapshot {
                hour: setting.hour(),
                minute: setting.minute(),
                period: setting.period(),
                timezone: setting.zone(),
                target_instant: target,
            }),
            _ => None,
        }
    }

    fn restore(snapshot: AlarmSnapshot, now: DateTime<Utc>) -> Option<Restored<Self>> {
        let setting =
            AlarmSetting::new(snapshot.hour, snapshot.minute, snapshot.period, snapshot.timezone)
                .ok()?;
        if snapshot.target_instant <= now {
            tracing::info!(alarm_at = %snapshot.target_instant, "stored alarm is in the past, clearing");
            return Some(Restored::fresh());
        }
        Some(Restored {
            engine: AlarmEngine {
                slot: Slot::Armed(Scheduled {
                    setting,
                    target: snapshot.target_instant,
                }),
            },
            events: Vec::new(),
        })
    }
}

fn countdown_text(secs_left: i64) -> String {
    if secs_left <= 0 {
        return "Ringing!".to_string();
    }
    let hours = secs_left / 3600;
    let minutes = (secs_left % 3600) / 60;
    let seconds = secs_left % 60;
    if hours > 0 {
        format!("In {hours}h {minutes}m")
    } else if minutes > 0 {
        format!("In {minutes}m {seconds}s")
    } else {
        format!("In {seconds}s")
    }
}
