//! Daily cutoff time and its resolution to a concrete instant.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A user-supplied cutoff time of day.
///
/// Serialized as its `HH:MM` string, so deserializing goes through the same
/// range checks as parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Schedule {
    time: NaiveTime,
}

impl Schedule {
    /// Create a schedule, rejecting hours above 23 and minutes above 59.
    pub fn new(hour: u8, minute: u8) -> Result<Self, ValidationError> {
        if hour > 23 {
            return Err(ValidationError::OutOfRange {
                field: "hour",
                value: hour.into(),
                max: 23,
            });
        }
        let time = NaiveTime::from_hms_opt(hour.into(), minute.into(), 0).ok_or(
            ValidationError::OutOfRange {
                field: "minute",
                value: minute.into(),
                max: 59,
            },
        )?;
        Ok(Self { time })
    }

    pub fn hour(&self) -> u8 {
        // Bounded to 0..=23 by `new`.
        self.time.hour() as u8
    }

    pub fn minute(&self) -> u8 {
        self.time.minute() as u8
    }

    /// Wall-clock time of day with zero seconds.
    pub fn time_of_day(&self) -> NaiveTime {
        self.time
    }

    /// Next instant strictly after `now` whose wall-clock time is this schedule.
    ///
    /// Tries today's date first and rolls forward exactly one calendar day
    /// when today's occurrence is not in the future. Calendar arithmetic is
    /// done on the naive date, so the result keeps the same time of day
    /// across a DST change.
    pub fn next_occurrence<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DateTime<Tz> {
        let tz = now.timezone();
        let today = now.date_naive();
        let candidate = self.on_date(&tz, today);
        if candidate > *now {
            return candidate;
        }
        match today.succ_opt() {
            Some(tomorrow) => self.on_date(&tz, tomorrow),
            None => candidate,
        }
    }

    fn on_date<Tz: TimeZone>(&self, tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
        let naive = date.and_time(self.time_of_day());
        // Repeated wall-clock times take the earlier instant; skipped ones
        // move past the gap.
        if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
            return dt;
        }
        let shifted = naive + Duration::hours(1);
        tz.from_local_datetime(&shifted)
            .earliest()
            .unwrap_or_else(|| tz.from_utc_datetime(&naive))
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl TryFrom<String> for Schedule {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Schedule> for String {
    fn from(schedule: Schedule) -> Self {
        schedule.to_string()
    }
}

impl FromStr for Schedule {
    type Err = ValidationError;

    /// Parse `HH:MM` (a single-digit hour is accepted).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidTime {
            input: s.to_string(),
        };
        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(invalid());
        }
        let hour: u8 = h.parse().map_err(|_| invalid())?;
        let minute: u8 = m.parse().map_err(|_| invalid())?;
        Self::new(hour, minute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Timelike, Utc};

    #[test]
    fn parse_and_display() {
        let s: Schedule = "17:00".parse().unwrap();
        assert_eq!((s.hour(), s.minute()), (17, 0));
        assert_eq!(s.to_string(), "17:00");
        assert_eq!("9:05".parse::<Schedule>().unwrap().to_string(), "09:05");
    }

    #[test]
    fn parse_rejects_garbage() {
        for bad in ["", "17", "17:0", "1700", "aa:bb", "24:00", "12:60", "-1:00", "123:00"] {
            assert!(bad.parse::<Schedule>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn new_reports_out_of_range_field() {
        assert_eq!(
            Schedule::new(24, 0),
            Err(ValidationError::OutOfRange {
                field: "hour",
                value: 24,
                max: 23
            })
        );
        assert!(matches!(
            Schedule::new(0, 60),
            Err(ValidationError::OutOfRange { field: "minute", .. })
        ));
    }

    #[test]
    fn serde_goes_through_range_checks() {
        let s: Schedule = serde_json::from_str(r#""21:30""#).unwrap();
        assert_eq!(s, Schedule::new(21, 30).unwrap());
        assert_eq!(serde_json::to_string(&s).unwrap(), r#""21:30""#);

        assert!(serde_json::from_str::<Schedule>(r#""24:75""#).is_err());
        assert!(serde_json::from_str::<Schedule>(r#"{"hour":24,"minute":75}"#).is_err());
    }

    #[test]
    fn later_today_resolves_to_today() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 8, 30, 0).unwrap();
        let target = Schedule::new(17, 0).unwrap().next_occurrence(&now);
        assert_eq!(target, Utc.with_ymd_and_hms(2026, 10, 16, 17, 0, 0).unwrap());
    }

    #[test]
    fn exact_match_rolls_to_tomorrow() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 17, 0, 0).unwrap();
        let target = Schedule::new(17, 0).unwrap().next_occurrence(&now);
        assert_eq!(target, Utc.with_ymd_and_hms(2026, 10, 17, 17, 0, 0).unwrap());
    }

    #[test]
    fn rolls_over_month_and_year_end() {
        let now = Utc.with_ymd_and_hms(2026, 12, 31, 23, 59, 30).unwrap();
        let target = Schedule::new(0, 0).unwrap().next_occurrence(&now);
        assert_eq!(target, Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn resolves_in_callers_time_zone() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        // 2026-10-16 23:00 in Tokyo is 14:00 UTC.
        let now = tokyo.with_ymd_and_hms(2026, 10, 16, 23, 0, 0).unwrap();
        let target = Schedule::new(22, 0).unwrap().next_occurrence(&now);
        assert_eq!(target.date_naive(), NaiveDate::from_ymd_opt(2026, 10, 17).unwrap());
        assert_eq!((target.hour(), target.minute(), target.second()), (22, 0, 0));
        assert_eq!(target.with_timezone(&Utc).hour(), 13);
    }

    mod dst {
        use super::*;
        use chrono_tz::America::New_York;

        #[test]
        fn skipped_time_moves_past_the_gap() {
            // Clocks jump from 02:00 EST to 03:00 EDT.
            let now = New_York.with_ymd_and_hms(2026, 3, 8, 0, 0, 0).unwrap();
            let target = Schedule::new(2, 30).unwrap().next_occurrence(&now);
            assert_eq!((target.hour(), target.minute()), (3, 30));
            assert_eq!(
                target.with_timezone(&Utc),
                Utc.with_ymd_and_hms(2026, 3, 8, 7, 30, 0).unwrap()
            );
        }

        #[test]
        fn repeated_time_takes_earlier_instant() {
            // 01:00-02:00 happens twice; the first pass is still EDT (-04:00).
            let now = New_York.with_ymd_and_hms(2026, 11, 1, 0, 0, 0).unwrap();
            let target = Schedule::new(1, 30).unwrap().next_occurrence(&now);
            assert_eq!(
                target.with_timezone(&Utc),
                Utc.with_ymd_and_hms(2026, 11, 1, 5, 30, 0).unwrap()
            );
        }

        #[test]
        fn rollover_across_spring_forward_keeps_wall_clock() {
            let now = New_York.with_ymd_and_hms(2026, 3, 7, 18, 0, 0).unwrap();
            let target = Schedule::new(17, 0).unwrap().next_occurrence(&now);
            assert_eq!(target.date_naive(), NaiveDate::from_ymd_opt(2026, 3, 8).unwrap());
            assert_eq!((target.hour(), target.minute()), (17, 0));
            assert_eq!(target.clone() - now, Duration::hours(22));
        }
    }
}
