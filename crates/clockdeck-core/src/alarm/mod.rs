//! One-shot alarm.
//!
//! An alarm is a 12-hour wall time in a timezone, resolved to the next
//! matching instant. Each clock tick compares "now" against that instant;
//! the alarm rings once and then needs re-arming.

mod engine;
mod setting;

pub use engine::{AlarmEngine, AlarmSnapshot, AlarmState, AlarmView};
pub use setting::{AlarmSetting, Period};
