//! Plumbing shared by the stopwatch and timer counters.

use serde::{Deserialize, Serialize};

/// Whether a counter's one-second tick is active.
///
/// The host's scheduling handle is never used as this flag: the application
/// creates its ticker on entry to `Running` and drops it on the way out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    #[default]
    Idle,
    Running,
}

impl RunState {
    pub fn is_running(self) -> bool {
        self == RunState::Running
    }
}

/// `HH:MM:SS`; hours keep counting past 99.
pub fn hms(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hms_pads_each_field() {
        assert_eq!(hms(0), "00:00:00");
        assert_eq!(hms(61), "00:01:01");
        assert_eq!(hms(3600 * 5 + 7), "05:00:07");
        assert_eq!(hms(3600 * 120), "120:00:00");
    }
}
