//! The application core: three engines, their store, the clock, and the
//! operator's preferences.
//!
//! `Deck` is constructed once per process. Every command goes through it so
//! that the touched engine is persisted right after it changes. Ticks are
//! driven from outside: `tick_clock` once a second always, `tick_stopwatch`
//! and `tick_timer` once a second while the respective engine runs.

use serde::{Deserialize, Serialize};

use crate::alarm::{AlarmEngine, AlarmSetting, AlarmView, Period};
use crate::clock::{ClockView, TimeSource, Zone};
use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::preferences::Preferences;
use crate::stopwatch::{Stopwatch, StopwatchView};
use crate::storage::{load, save, Config, KvStore, Restored};
use crate::timer::{TimerEngine, TimerView};

/// Everything the render layer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckView {
    pub clock: ClockView,
    pub stopwatch: StopwatchView,
    pub timer: TimerView,
    pub alarm: AlarmView,
    pub dark_mode: bool,
    pub presets: Vec<u32>,
}

/// Any presentation that can draw a [`DeckView`].
pub trait Renderer {
    fn display(&mut self, view: &DeckView);
}

pub struct Deck<S: KvStore, C: TimeSource> {
    store: S,
    clock: C,
    config: Config,
    prefs: Preferences,
    stopwatch: Stopwatch,
    timer: TimerEngine,
    alarm: AlarmEngine,
    /// Raised while restoring; handed out by `drain_events`.
    pending: Vec<Event>,
}

impl<S: KvStore, C: TimeSource> Deck<S, C> {
    /// Restore every engine and preference from `store`.
    ///
    /// # Errors
    /// Fails only if the store itself fails; unreadable snapshots are
    /// discarded.
    pub fn open(store: S, clock: C, config: Config) -> Result<Self> {
        let now = clock.now();
        let prefs = Preferences::load(&store, &config)?;

        let mut pending = Vec::new();
        let Restored { engine: stopwatch, events } = load::<Stopwatch>(&store, now)?;
        pending.extend(events);
        let Restored { engine: timer, events } = load::<TimerEngine>(&store, now)?;
        pending.extend(events);
        let Restored { engine: alarm, events } = load::<AlarmEngine>(&store, now)?;
        pending.extend(events);

        Ok(Self {
            store,
            clock,
            config,
            prefs,
            stopwatch,
            timer,
            alarm,
            pending,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn stopwatch(&self) -> &Stopwatch {
        &self.stopwatch
    }

    pub fn timer(&self) -> &TimerEngine {
        &self.timer
    }

    pub fn alarm(&self) -> &AlarmEngine {
        &self.alarm
    }

    pub fn timezone(&self) -> Zone {
        self.prefs.timezone
    }

    pub fn dark_mode(&self) -> bool {
        self.prefs.dark_mode
    }

    /// Events raised while restoring (a timer that ran out while the
    /// process was gone). Each is handed out once.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.pending)
    }

    pub fn view(&self) -> DeckView {
        let now = self.clock.now();
        DeckView {
            clock: ClockView::at(now, self.prefs.timezone),
            stopwatch: self.stopwatch.view(),
            timer: self.timer.view(),
            alarm: self.alarm.view(now, self.prefs.timezone),
            dark_mode: self.prefs.dark_mode,
            presets: self.config.timer.presets.clone(),
        }
    }

    // ── Stopwatch ────────────────────────────────────────────────────

    pub fn stopwatch_toggle(&mut self) -> Result<Event> {
        let event = self.stopwatch.toggle(self.clock.now());
        save(&self.store, &self.stopwatch)?;
        Ok(event)
    }

    pub fn stopwatch_reset(&mut self) -> Result<Event> {
        let event = self.stopwatch.reset(self.clock.now());
        save(&self.store, &self.stopwatch)?;
        Ok(event)
    }

    /// Only records while the stopwatch runs.
    pub fn stopwatch_lap(&mut self) -> Result<Option<Event>> {
        let event = self.stopwatch.lap(self.clock.now());
        if event.is_some() {
            save(&self.store, &self.stopwatch)?;
        }
        Ok(event)
    }

    pub fn tick_stopwatch(&mut self) -> Result<()> {
        if self.stopwatch.tick(self.clock.now()) {
            save(&self.store, &self.stopwatch)?;
        }
        Ok(())
    }

    // ── Timer ────────────────────────────────────────────────────────

    /// The start/stop button. An empty `input` falls back to the duration
    /// already entered (for instance by a preset).
    pub fn timer_toggle(&mut self, input: &str) -> Result<Event> {
        let input = if input.trim().is_empty() {
            self.timer.input().to_string()
        } else {
            input.to_string()
        };
        let event = self.timer.toggle(&input, self.clock.now())?;
        save(&self.store, &self.timer)?;
        Ok(event)
    }

    pub fn timer_start(&mut self, minutes: u32) -> Result<Event> {
        let event = self.timer.start(minutes, self.clock.now())?;
        save(&self.store, &self.timer)?;
        Ok(event)
    }

    pub fn timer_stop(&mut self) -> Result<Option<Event>> {
        let event = self.timer.stop(self.clock.now());
        save(&self.store, &self.timer)?;
        Ok(event)
    }

    pub fn timer_resume(&mut self) -> Result<Option<Event>> {
        let event = self.timer.resume(self.clock.now());
        save(&self.store, &self.timer)?;
        Ok(event)
    }

    pub fn timer_preset(&mut self, minutes: u32) -> Result<()> {
        if minutes == 0 {
            return Err(ValidationError::InvalidDuration {
                input: minutes.to_string(),
            }
            .into());
        }
        self.timer.set_preset(minutes);
        save(&self.store, &self.timer)?;
        Ok(())
    }

    pub fn tick_timer(&mut self) -> Result<Option<Event>> {
        if !self.timer.is_running() {
            return Ok(None);
        }
        let event = self.timer.tick(self.clock.now());
        save(&self.store, &self.timer)?;
        Ok(event)
    }

    // ── Alarm ────────────────────────────────────────────────────────

    /// Arm for the next `hour:minute period` in the selected timezone.
    pub fn alarm_arm(&mut self, hour: u32, minute: u32, period: Period) -> Result<Event> {
        let setting = AlarmSetting::new(hour, minute, period, self.prefs.timezone)?;
        let event = self.alarm.arm(setting, self.clock.now());
        save(&self.store, &self.alarm)?;
        Ok(event)
    }

    /// Arm at the configured picker default (07:00 AM out of the box).
    pub fn alarm_arm_default(&mut self) -> Result<Event> {
        let setting = self.config.alarm_default(self.prefs.timezone)?;
        self.alarm_arm(setting.hour(), setting.minute(), setting.period())
    }

    pub fn alarm_cancel(&mut self) -> Result<Option<Event>> {
        let event = self.alarm.cancel(self.clock.now());
        save(&self.store, &self.alarm)?;
        Ok(event)
    }

    /// The clock's one-second tick: checks the alarm.
    pub fn tick_clock(&mut self) -> Result<Option<Event>> {
        let event = self.alarm.on_tick(self.clock.now());
        if event.is_some() {
            save(&self.store, &self.alarm)?;
        }
        Ok(event)
    }

    // ── Preferences ──────────────────────────────────────────────────

    pub fn set_timezone(&mut self, name: &str) -> Result<Event> {
        let zone: Zone = name.parse()?;
        self.prefs.set_timezone(&self.store, zone)?;
        Ok(Event::TimezoneChanged {
            timezone: zone.name().to_string(),
            at: self.clock.now(),
        })
    }

    pub fn toggle_dark_mode(&mut self) -> Result<Event> {
        let enabled = !self.prefs.dark_mode;
        self.prefs.set_dark_mode(&self.store, enabled)?;
        Ok(Event::ThemeChanged {
            dark_mode: enabled,
            at: self.clock.now(),
        })
    }
}
