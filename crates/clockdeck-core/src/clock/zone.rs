use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A validated IANA timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Zone(Tz);

impl Zone {
    pub fn utc() -> Self {
        Zone(Tz::UTC)
    }

    /// The host's configured timezone, or UTC when it cannot be determined.
    pub fn detect() -> Self {
        match iana_time_zone::get_timezone() {
            Ok(name) => name.parse().unwrap_or_else(|_| {
                tracing::debug!(%name, "host timezone not in tz database, using UTC");
                Zone::utc()
            }),
            Err(e) => {
                tracing::debug!(error = %e, "could not detect host timezone, using UTC");
                Zone::utc()
            }
        }
    }

    /// Every known zone, in tz database order.
    pub fn all() -> impl Iterator<Item = Zone> {
        chrono_tz::TZ_VARIANTS.iter().copied().map(Zone)
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    pub fn tz(&self) -> Tz {
        self.0
    }

    pub fn local(&self, at: DateTime<Utc>) -> DateTime<Tz> {
        at.with_timezone(&self.0)
    }

    /// Map a wall-clock time in this zone to an instant.
    ///
    /// Ambiguous times (clocks going back) take the earlier instant. Times
    /// skipped by a DST jump resolve to the first wall time after the gap.
    pub fn resolve(&self, local: NaiveDateTime) -> DateTime<Utc> {
        match self.0.from_local_datetime(&local) {
            LocalResult::Single(dt) => dt.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
            LocalResult::None => {
                let mut probe = local;
                for _ in 0..24 * 60 {
                    probe += Duration::minutes(1);
                    if let Some(dt) = self.0.from_local_datetime(&probe).earliest() {
                        return dt.with_timezone(&Utc);
                    }
                }
                Utc.from_utc_datetime(&local)
            }
        }
    }
}

impl Default for Zone {
    fn default() -> Self {
        Zone::utc()
    }
}

impl FromStr for Zone {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        name.parse::<Tz>()
            .map(Zone)
            .map_err(|_| ValidationError::UnknownTimezone(name.to_string()))
    }
}

impl TryFrom<String> for Zone {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Zone> for String {
    fn from(zone: Zone) -> Self {
        zone.name().to_string()
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the clock face shows for one instant in one zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockView {
    /// `HH:MM:SS`, 24-hour.
    pub time: String,
    /// e.g. `October 16, 2026`.
    pub date: String,
    /// e.g. `Friday`.
    pub day: String,
    pub timezone: String,
}

impl ClockView {
    pub fn at(now: DateTime<Utc>, zone: Zone) -> Self {
        let local = zone.local(now);
        Self {
            time: local.format("%H:%M:%S").to_string(),
            date: local.format("%B %-d, %Y").to_string(),
            day: local.format("%A").to_string(),
            timezone: zone.name().to_string(),
        }
    }
}

/// Every zone paired with its current wall time.
pub fn zone_listing(now: DateTime<Utc>) -> Vec<(&'static str, String)> {
    Zone::all()
        .map(|zone| (zone.name(), zone.local(now).format("%H:%M:%S").to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn naive(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn parses_known_zone() {
        let zone: Zone = "Europe/Paris".parse().unwrap();
        assert_eq!(zone.name(), "Europe/Paris");
    }

    #[test]
    fn rejects_unknown_zone() {
        let err = "Mars/Olympus".parse::<Zone>().unwrap_err();
        assert_eq!(err, ValidationError::UnknownTimezone("Mars/Olympus".into()));
    }

    #[test]
    fn clock_view_formats_in_zone() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 5, 9).unwrap();
        let zone: Zone = "Asia/Tokyo".parse().unwrap();
        let view = ClockView::at(now, zone);
        assert_eq!(view.time, "21:05:09");
        assert_eq!(view.date, "October 16, 2026");
        assert_eq!(view.day, "Friday");
        assert_eq!(view.timezone, "Asia/Tokyo");
    }

    #[test]
    fn resolve_skips_dst_gap() {
        // 2026-03-08 02:30 does not exist in New York.
        let zone: Zone = "America/New_York".parse().unwrap();
        let at = zone.resolve(naive(2026, 3, 8, 2, 30));
        assert_eq!(at, Utc.with_ymd_and_hms(2026, 3, 8, 7, 0, 0).unwrap());
    }

    #[test]
    fn resolve_takes_earliest_when_ambiguous() {
        // 2026-11-01 01:30 happens twice in New York; first is EDT (UTC-4).
        let zone: Zone = "America/New_York".parse().unwrap();
        let at = zone.resolve(naive(2026, 11, 1, 1, 30));
        assert_eq!(at, Utc.with_ymd_and_hms(2026, 11, 1, 5, 30, 0).unwrap());
    }

    #[test]
    fn serde_uses_zone_name() {
        let zone: Zone = "Europe/Berlin".parse().unwrap();
        let json = serde_json::to_string(&zone).unwrap();
        assert_eq!(json, "\"Europe/Berlin\"");
        assert!(serde_json::from_str::<Zone>("\"Nowhere/Land\"").is_err());
    }

    #[test]
    fn listing_covers_utc() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap();
        let listing = zone_listing(now);
        assert!(listing.iter().any(|(name, time)| *name == "UTC" && time == "08:00:00"));
    }
}
