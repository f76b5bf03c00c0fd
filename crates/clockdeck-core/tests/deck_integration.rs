//! Integration tests for the deck: commands, ticks, and restoring state
//! across process restarts through a shared store.

use std::rc::Rc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use clockdeck_core::storage::Restored;
use clockdeck_core::{
    AlarmState, Config, CoreError, Database, Deck, Event, KvStore, ManualClock, MemoryStore,
    Period, ValidationError,
};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 16, 6, 30, 0).unwrap()
}

fn utc_config() -> Config {
    let mut config = Config::default();
    config.clock.timezone = Some("UTC".into());
    config
}

/// Open a deck over a borrowed store, the way each process start does.
fn open<'a>(store: &'a MemoryStore, clock: &Rc<ManualClock>) -> Deck<&'a MemoryStore, Rc<ManualClock>> {
    Deck::open(store, Rc::clone(clock), utc_config()).unwrap()
}

fn tick_all<S: KvStore>(deck: &mut Deck<S, Rc<ManualClock>>, clock: &ManualClock, secs: i64) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..secs {
        clock.advance_secs(1);
        deck.tick_stopwatch().unwrap();
        events.extend(deck.tick_timer().unwrap());
        events.extend(deck.tick_clock().unwrap());
    }
    events
}

#[test]
fn test_fresh_deck_is_idle() {
    let store = MemoryStore::new();
    let clock = Rc::new(ManualClock::new(t0()));
    let mut deck = open(&store, &clock);

    assert!(deck.drain_events().is_empty());
    let view = deck.view();
    assert_eq!(view.clock.time, "06:30:00");
    assert_eq!(view.clock.date, "October 16, 2026");
    assert_eq!(view.clock.day, "Friday");
    assert_eq!(view.stopwatch.display, "00:00:00");
    assert_eq!(view.timer.display, "00:00:00");
    assert_eq!(view.alarm.indicator, "ALARM OFF");
    assert_eq!(view.presets, vec![1, 5, 10, 15, 30, 60]);
    assert!(store.is_empty());
}

#[test]
fn test_stopwatch_resumes_after_restart() {
    let store = MemoryStore::new();
    let clock = Rc::new(ManualClock::new(t0()));
    {
        let mut deck = open(&store, &clock);
        deck.stopwatch_toggle().unwrap();
        tick_all(&mut deck, &clock, 12);
        assert_eq!(deck.stopwatch().seconds(), 12);
    }

    // Closed for 30 seconds.
    clock.advance_secs(30);
    let deck = open(&store, &clock);
    assert!(deck.stopwatch().is_running());
    assert_eq!(deck.stopwatch().seconds(), 42);
}

#[test]
fn test_stopwatch_laps_survive_restart() {
    let store = MemoryStore::new();
    let clock = Rc::new(ManualClock::new(t0()));
    {
        let mut deck = open(&store, &clock);
        assert!(deck.stopwatch_lap().unwrap().is_none());
        deck.stopwatch_toggle().unwrap();
        tick_all(&mut deck, &clock, 7);
        let event = deck.stopwatch_lap().unwrap();
        assert!(matches!(event, Some(Event::StopwatchLap { lap: 1, seconds: 7, .. })));
    }

    clock.advance_secs(3);
    let mut deck = open(&store, &clock);
    assert_eq!(deck.stopwatch().laps(), &[7]);
    assert_eq!(deck.view().stopwatch.laps, vec!["Lap 1: 00:00:07"]);

    deck.stopwatch_reset().unwrap();
    assert!(deck.stopwatch().laps().is_empty());
    assert!(!store.contains("stopwatch"));
}

#[test]
fn test_stopped_stopwatch_ignores_downtime() {
    let store = MemoryStore::new();
    let clock = Rc::new(ManualClock::new(t0()));
    {
        let mut deck = open(&store, &clock);
        deck.stopwatch_toggle().unwrap();
        tick_all(&mut deck, &clock, 5);
        deck.stopwatch_toggle().unwrap();
    }
    clock.advance(Duration::hours(2));
    let deck = open(&store, &clock);
    assert!(!deck.stopwatch().is_running());
    assert_eq!(deck.stopwatch().seconds(), 5);
}

#[test]
fn test_stopwatch_reset_erases_snapshot() {
    let store = MemoryStore::new();
    let clock = Rc::new(ManualClock::new(t0()));
    let mut deck = open(&store, &clock);
    deck.stopwatch_toggle().unwrap();
    tick_all(&mut deck, &clock, 3);
    assert!(store.contains("stopwatch"));

    let event = deck.stopwatch_reset().unwrap();
    assert!(matches!(event, Event::StopwatchReset { .. }));
    assert!(!store.contains("stopwatch"));
}

#[test]
fn test_timer_finished_while_closed() {
    let store = MemoryStore::new();
    let clock = Rc::new(ManualClock::new(t0()));
    {
        let mut deck = open(&store, &clock);
        deck.timer_start(1).unwrap();
        tick_all(&mut deck, &clock, 10);
    }

    clock.advance(Duration::minutes(5));
    let mut deck = open(&store, &clock);
    let events = deck.drain_events();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], Event::TimerFinished { total_secs: 60, .. }));
    assert!(events[0].is_notification());
    assert!(deck.drain_events().is_empty());

    assert!(!deck.timer().is_running());
    assert_eq!(deck.timer().remaining_secs(), 0);
    assert!(!store.contains("timer"));
}

#[test]
fn test_timer_counts_down_and_finishes_once() {
    let store = MemoryStore::new();
    let clock = Rc::new(ManualClock::new(t0()));
    let mut deck = open(&store, &clock);
    deck.timer_toggle("1").unwrap();

    let events = tick_all(&mut deck, &clock, 75);
    let finished: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, Event::TimerFinished { .. }))
        .collect();
    assert_eq!(finished.len(), 1);
    assert_eq!(deck.timer().remaining_secs(), 0);
    assert!(!store.contains("timer"));
}

#[test]
fn test_timer_restarts_same_duration_after_finish() {
    let store = MemoryStore::new();
    let clock = Rc::new(ManualClock::new(t0()));
    let mut deck = open(&store, &clock);
    deck.timer_toggle("1").unwrap();
    tick_all(&mut deck, &clock, 60);
    assert_eq!(deck.timer().input(), "1");
    assert!(!store.contains("timer"));

    let event = deck.timer_toggle("").unwrap();
    assert!(matches!(event, Event::TimerStarted { total_secs: 60, .. }));
    assert!(deck.timer().is_running());
}

#[test]
fn test_timer_toggle_rejects_bad_input() {
    let store = MemoryStore::new();
    let clock = Rc::new(ManualClock::new(t0()));
    let mut deck = open(&store, &clock);

    let err = deck.timer_toggle("soon").unwrap_err();
    assert!(matches!(
        err,
        CoreError::Validation(ValidationError::InvalidDuration { .. })
    ));
    assert_eq!(err.to_string(), "Please enter a valid number of minutes.");
    assert!(!deck.timer().is_running());
    assert!(store.is_empty());
}

#[test]
fn test_timer_preset_survives_restart() {
    let store = MemoryStore::new();
    let clock = Rc::new(ManualClock::new(t0()));
    {
        let mut deck = open(&store, &clock);
        deck.timer_preset(15).unwrap();
        assert!(!deck.timer().is_running());
    }
    let mut deck = open(&store, &clock);
    assert_eq!(deck.timer().input(), "15");

    // An empty entry starts from the preset.
    let event = deck.timer_toggle("").unwrap();
    assert_eq!(
        event,
        Event::TimerStarted {
            total_secs: 900,
            at: t0()
        }
    );
}

#[test]
fn test_timer_zero_preset_rejected() {
    let store = MemoryStore::new();
    let clock = Rc::new(ManualClock::new(t0()));
    let mut deck = open(&store, &clock);
    assert!(deck.timer_preset(0).is_err());
    assert!(store.is_empty());
}

#[test]
fn test_paused_timer_resumes_after_restart() {
    let store = MemoryStore::new();
    let clock = Rc::new(ManualClock::new(t0()));
    {
        let mut deck = open(&store, &clock);
        deck.timer_start(2).unwrap();
        tick_all(&mut deck, &clock, 20);
        deck.timer_stop().unwrap();
    }
    clock.advance(Duration::hours(1));
    let mut deck = open(&store, &clock);
    assert_eq!(deck.timer().remaining_secs(), 100);
    let event = deck.timer_resume().unwrap();
    assert!(matches!(event, Some(Event::TimerResumed { remaining_secs: 100, .. })));
    assert!(deck.timer().is_running());
}

#[test]
fn test_alarm_rings_through_clock_tick() {
    let store = MemoryStore::new();
    let clock = Rc::new(ManualClock::new(t0()));
    let mut deck = open(&store, &clock);

    let event = deck.alarm_arm(6, 31, Period::Am).unwrap();
    assert!(matches!(event, Event::AlarmArmed { ref timezone, .. } if timezone == "UTC"));
    assert_eq!(deck.view().alarm.display, "06:31 AM");
    assert_eq!(deck.view().alarm.countdown, "In 1m 0s");

    let events = tick_all(&mut deck, &clock, 90);
    let ringing: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, Event::AlarmRinging { .. }))
        .collect();
    assert_eq!(ringing.len(), 1);
    assert_eq!(deck.alarm().state(), AlarmState::Ringing);
    assert!(!store.contains("alarm"));

    let cleared = deck.alarm_cancel().unwrap();
    assert!(matches!(cleared, Some(Event::AlarmCleared { .. })));
    assert_eq!(deck.alarm().state(), AlarmState::Disarmed);
    assert!(deck.alarm_cancel().unwrap().is_none());
}

#[test]
fn test_alarm_survives_restart() {
    let store = MemoryStore::new();
    let clock = Rc::new(ManualClock::new(t0()));
    {
        let mut deck = open(&store, &clock);
        deck.alarm_arm(8, 0, Period::Am).unwrap();
    }
    clock.advance(Duration::minutes(30));
    let deck = open(&store, &clock);
    assert!(deck.alarm().is_armed());
    assert_eq!(
        deck.alarm().target(),
        Some(Utc.with_ymd_and_hms(2026, 10, 16, 8, 0, 0).unwrap())
    );
}

#[test]
fn test_stale_alarm_cleared_on_restart() {
    let store = MemoryStore::new();
    let clock = Rc::new(ManualClock::new(t0()));
    {
        let mut deck = open(&store, &clock);
        deck.alarm_arm(7, 0, Period::Am).unwrap();
    }
    clock.advance(Duration::hours(3));
    let mut deck = open(&store, &clock);
    assert_eq!(deck.alarm().state(), AlarmState::Disarmed);
    assert!(deck.drain_events().is_empty());
    assert!(!store.contains("alarm"));
}

#[test]
fn test_alarm_uses_selected_timezone() {
    let store = MemoryStore::new();
    let clock = Rc::new(ManualClock::new(t0()));
    let mut deck = open(&store, &clock);
    deck.set_timezone("Asia/Tokyo").unwrap();

    // 06:30 UTC is 15:30 in Tokyo; 07:00 tomorrow there is 22:00 UTC today.
    deck.alarm_arm(7, 0, Period::Am).unwrap();
    assert_eq!(
        deck.alarm().target(),
        Some(Utc.with_ymd_and_hms(2026, 10, 16, 22, 0, 0).unwrap())
    );
    assert_eq!(deck.view().alarm.display, "07:00 AM");
}

#[test]
fn test_alarm_default_from_config() {
    let store = MemoryStore::new();
    let clock = Rc::new(ManualClock::new(t0()));
    let mut deck = open(&store, &clock);
    deck.alarm_arm_default().unwrap();
    assert_eq!(
        deck.alarm().target(),
        Some(Utc.with_ymd_and_hms(2026, 10, 16, 7, 0, 0).unwrap())
    );
}

#[test]
fn test_invalid_alarm_time_rejected() {
    let store = MemoryStore::new();
    let clock = Rc::new(ManualClock::new(t0()));
    let mut deck = open(&store, &clock);
    assert!(deck.alarm_arm(13, 0, Period::Pm).is_err());
    assert!(deck.alarm_arm(0, 0, Period::Am).is_err());
    assert!(deck.alarm_arm(12, 60, Period::Am).is_err());
    assert_eq!(deck.alarm().state(), AlarmState::Disarmed);
}

#[test]
fn test_preferences_persist() {
    let store = MemoryStore::new();
    let clock = Rc::new(ManualClock::new(t0()));
    {
        let mut deck = open(&store, &clock);
        let event = deck.toggle_dark_mode().unwrap();
        assert!(matches!(event, Event::ThemeChanged { dark_mode: true, .. }));
        deck.set_timezone("Europe/London").unwrap();
    }
    let deck = open(&store, &clock);
    assert!(deck.dark_mode());
    assert_eq!(deck.timezone().name(), "Europe/London");
    assert_eq!(deck.view().clock.timezone, "Europe/London");
    // 06:30 UTC is 07:30 BST in October.
    assert_eq!(deck.view().clock.time, "07:30:00");
}

#[test]
fn test_unknown_timezone_rejected() {
    let store = MemoryStore::new();
    let clock = Rc::new(ManualClock::new(t0()));
    let mut deck = open(&store, &clock);
    let err = deck.set_timezone("Mars/Olympus").unwrap_err();
    assert_eq!(err.to_string(), "Unknown timezone: Mars/Olympus");
    assert_eq!(deck.timezone().name(), "UTC");
}

#[test]
fn test_corrupt_snapshots_are_discarded() {
    let store = MemoryStore::new();
    store.set("stopwatch", "garbage").unwrap();
    store
        .set(
            "timer",
            r#"{"remaining":900,"total":60,"running":true,"saved_at":"2026-10-16T06:00:00Z"}"#,
        )
        .unwrap();
    store.set("alarm", r#"{"hour":99}"#).unwrap();

    let clock = Rc::new(ManualClock::new(t0()));
    let mut deck = open(&store, &clock);
    assert!(deck.drain_events().is_empty());
    assert_eq!(deck.stopwatch().seconds(), 0);
    assert!(deck.timer().countdown().is_none());
    assert_eq!(deck.alarm().state(), AlarmState::Disarmed);
    assert!(store.is_empty());
}

#[test]
fn test_restore_from_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clockdeck.db");
    let clock = Rc::new(ManualClock::new(t0()));
    {
        let db = Database::open_at(&path).unwrap();
        let mut deck = Deck::open(&db, Rc::clone(&clock), utc_config()).unwrap();
        deck.timer_start(5).unwrap();
        deck.stopwatch_toggle().unwrap();
        deck.alarm_arm(9, 15, Period::Pm).unwrap();
    }

    clock.advance_secs(61);
    let db = Database::open_at(&path).unwrap();
    let deck = Deck::open(&db, Rc::clone(&clock), utc_config()).unwrap();
    assert_eq!(deck.timer().remaining_secs(), 239);
    assert_eq!(deck.stopwatch().seconds(), 61);
    assert_eq!(
        deck.alarm().target(),
        Some(Utc.with_ymd_and_hms(2026, 10, 16, 21, 15, 0).unwrap())
    );
}

#[test]
fn test_load_returns_restore_events() {
    let store = MemoryStore::new();
    store
        .set(
            "timer",
            r#"{"remaining":5,"total":60,"running":true,"saved_at":"2026-10-16T06:29:00Z","input_value":"1"}"#,
        )
        .unwrap();
    let restored: Restored<clockdeck_core::TimerEngine> =
        clockdeck_core::storage::load(&store, t0()).unwrap();
    assert_eq!(restored.events.len(), 1);
    assert!(!store.contains("timer"));
}
