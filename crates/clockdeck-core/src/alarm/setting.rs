use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Zone;
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "AM")]
    Am,
    #[serde(rename = "PM")]
    Pm,
}

impl FromStr for Period {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AM" => Ok(Period::Am),
            "PM" => Ok(Period::Pm),
            _ => Err(ValidationError::InvalidPeriod(s.to_string())),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Period::Am => "AM",
            Period::Pm => "PM",
        })
    }
}

/// A 12-hour wall time in a zone, as picked by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmSetting {
    hour: u32,
    minute: u32,
    period: Period,
    zone: Zone,
}

impl AlarmSetting {
    /// # Errors
    /// `hour` must be 1-12 and `minute` 0-59.
    pub fn new(hour: u32, minute: u32, period: Period, zone: Zone) -> Result<Self, ValidationError> {
        if !(1..=12).contains(&hour) || minute > 59 {
            return Err(ValidationError::InvalidAlarmTime { hour, minute });
        }
        Ok(Self {
            hour,
            minute,
            period,
            zone,
        })
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    /// 12 AM is 0, 12 PM is 12.
    pub fn hour24(&self) -> u32 {
        match (self.period, self.hour) {
            (Period::Am, 12) => 0,
            (Period::Am, h) => h,
            (Period::Pm, 12) => 12,
            (Period::Pm, h) => h + 12,
        }
    }

    /// The first instant strictly after `now` showing this wall time in the
    /// setting's zone: today's if still ahead, otherwise tomorrow's.
    pub fn next_occurrence(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let time = NaiveTime::from_hms_opt(self.hour24(), self.minute, 0).unwrap_or_default();
        let today = self.zone.local(now).date_naive();
        let target = self.zone.resolve(today.and_time(time));
        if target > now {
            return target;
        }
        match today.succ_opt() {
            Some(tomorrow) => self.zone.resolve(tomorrow.and_time(time)),
            None => target,
        }
    }
}

impl fmt::Display for AlarmSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02} {} {}", self.hour, self.minute, self.period, self.zone)
    }
}
