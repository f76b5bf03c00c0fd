//! Time source and timezone handling.
//!
//! Engines never read the host clock themselves: every operation that needs
//! "now" takes it as an argument, and the application obtains it from a
//! [`TimeSource`]. Tests drive a [`ManualClock`] instead.

mod source;
mod zone;

pub use source::{ManualClock, SystemClock, TimeSource};
pub use zone::{zone_listing, ClockView, Zone};
