//! Wall-clock values: times of day, intervals and break windows

use chrono::{NaiveTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ValidationError;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Accepts `H:MM` and `HH:MM`, 00:00 to 23:59
static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]?[0-9]|2[0-3]):([0-5][0-9])$").expect("valid time pattern"));

// ---------------------------------------------------------------------------
// TimeOfDay
// ---------------------------------------------------------------------------

/// A wall-clock time with minute precision, no date or timezone
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    minutes: u16,
}

impl TimeOfDay {
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self {
                minutes: (hour * 60 + minute) as u16,
            })
        } else {
            None
        }
    }

    /// Truncates seconds; legacy `TIME` columns may carry them
    pub fn from_naive_time(time: NaiveTime) -> Self {
        Self {
            minutes: (time.hour() * 60 + time.minute()) as u16,
        }
    }

    pub fn hour(&self) -> u32 {
        u32::from(self.minutes) / 60
    }

    pub fn minute(&self) -> u32 {
        u32::from(self.minutes) % 60
    }

    pub fn minutes_since_midnight(&self) -> u32 {
        u32::from(self.minutes)
    }
}

impl std::str::FromStr for TimeOfDay {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_error = || ValidationError::TimeParse {
            value: s.to_string(),
        };
        let captures = TIME_RE.captures(s).ok_or_else(parse_error)?;
        let hour = captures[1].parse::<u32>().map_err(|_| parse_error())?;
        let minute = captures[2].parse::<u32>().map_err(|_| parse_error())?;
        TimeOfDay::from_hm(hour, minute).ok_or_else(parse_error)
    }
}

impl std::fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

// ---------------------------------------------------------------------------
// Interval
// ---------------------------------------------------------------------------

/// Half-open time range `[start, end)` within one day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    start: TimeOfDay,
    end: TimeOfDay,
}

impl Interval {
    /// Fails with `InvalidInterval` unless `start < end`
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Result<Self, ValidationError> {
        if start < end {
            Ok(Self { start, end })
        } else {
            Err(ValidationError::InvalidInterval { start, end })
        }
    }

    pub fn start(&self) -> TimeOfDay {
        self.start
    }

    pub fn end(&self) -> TimeOfDay {
        self.end
    }

    /// Intervals that merely touch (`a.end == b.start`) do not overlap
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// BreakWindow
// ---------------------------------------------------------------------------

/// A break starting at `start` and lasting `duration_minutes`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BreakWindow {
    start: TimeOfDay,
    duration_minutes: u32,
}

impl BreakWindow {
    /// Fails with `NonPositiveDuration` for zero or negative durations
    pub fn new(start: TimeOfDay, duration_minutes: i64) -> Result<Self, ValidationError> {
        if duration_minutes <= 0 {
            return Err(ValidationError::NonPositiveDuration {
                minutes: duration_minutes,
            });
        }
        // Anything longer than a day can never fit in one
        let duration_minutes = u32::try_from(duration_minutes)
            .unwrap_or(u32::MAX)
            .min(MINUTES_PER_DAY);
        Ok(Self {
            start,
            duration_minutes,
        })
    }

    pub fn start(&self) -> TimeOfDay {
        self.start
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// Minutes since midnight at which the break ends; may exceed one day
    pub fn end_minutes(&self) -> u32 {
        self.start.minutes_since_midnight() + self.duration_minutes
    }

    /// The break end as a time of day, `None` when it reaches midnight
    pub fn end(&self) -> Option<TimeOfDay> {
        let end = self.end_minutes();
        TimeOfDay::from_hm(end / 60, end % 60)
    }

    /// Whether the whole break lies within `hours`
    pub fn is_within(&self, hours: &Interval) -> bool {
        hours.start() <= self.start
            && self.end_minutes() <= hours.end().minutes_since_midnight()
    }
}

impl std::fmt::Display for BreakWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (+{} min)", self.start, self.duration_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimeOfDay {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(t("08:00").minutes_since_midnight(), 480);
        assert_eq!(t("8:05").to_string(), "08:05");
        assert_eq!(t("23:59").to_string(), "23:59");
        assert_eq!(t("0:00").to_string(), "00:00");
    }

    #[test]
    fn test_parse_time_rejects_malformed() {
        for bad in ["24:00", "12:60", "1200", "12:0", "12:00:00", " 12:00", "", "ab:cd"] {
            assert_eq!(
                bad.parse::<TimeOfDay>(),
                Err(ValidationError::TimeParse { value: bad.to_string() }),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_from_naive_time_truncates_seconds() {
        let time = NaiveTime::from_hms_opt(9, 15, 42).unwrap();
        assert_eq!(TimeOfDay::from_naive_time(time), t("09:15"));
    }

    #[test]
    fn test_interval_requires_start_before_end() {
        assert!(Interval::new(t("08:00"), t("17:00")).is_ok());
        assert_eq!(
            Interval::new(t("17:00"), t("17:00")),
            Err(ValidationError::InvalidInterval { start: t("17:00"), end: t("17:00") })
        );
        assert!(Interval::new(t("17:00"), t("08:00")).is_err());
    }

    #[test]
    fn test_interval_overlap() {
        let a = Interval::new(t("08:00"), t("12:00")).unwrap();
        let b = Interval::new(t("11:00"), t("13:00")).unwrap();
        let c = Interval::new(t("12:00"), t("13:00")).unwrap();
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        assert!(!c.overlaps(&a));
    }

    #[test]
    fn test_break_duration_must_be_positive() {
        assert_eq!(
            BreakWindow::new(t("12:00"), 0),
            Err(ValidationError::NonPositiveDuration { minutes: 0 })
        );
        assert!(BreakWindow::new(t("12:00"), -15).is_err());
    }

    #[test]
    fn test_break_end() {
        let lunch = BreakWindow::new(t("12:00"), 30).unwrap();
        assert_eq!(lunch.end(), Some(t("12:30")));

        let late = BreakWindow::new(t("23:30"), 45).unwrap();
        assert_eq!(late.end(), None);
        assert_eq!(late.end_minutes(), 23 * 60 + 30 + 45);
    }

    #[test]
    fn test_break_within_hours() {
        let hours = Interval::new(t("08:00"), t("17:00")).unwrap();
        assert!(BreakWindow::new(t("08:00"), 30).unwrap().is_within(&hours));
        assert!(BreakWindow::new(t("16:30"), 30).unwrap().is_within(&hours));
        assert!(!BreakWindow::new(t("16:45"), 30).unwrap().is_within(&hours));
        assert!(!BreakWindow::new(t("07:45"), 30).unwrap().is_within(&hours));
    }

    mod properties {
        use super::*;
        use crate::models::strategies::{at, time_of_day};
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_display_parses_back(time in time_of_day()) {
                prop_assert_eq!(time.to_string().parse::<TimeOfDay>(), Ok(time));
            }

            #[test]
            fn prop_interval_requires_start_before_end(start in time_of_day(), end in time_of_day()) {
                prop_assert_eq!(Interval::new(start, end).is_ok(), start < end);
            }

            #[test]
            fn prop_break_within_iff_both_bounds_hold(
                work_start in 0u32..1440,
                work_len in 1u32..600,
                break_start in 0u32..1440,
                minutes in 1i64..600,
            ) {
                let work_end = (work_start + work_len).min(1439);
                prop_assume!(work_start < work_end);
                let hours = Interval::new(at(work_start), at(work_end)).unwrap();
                let window = BreakWindow::new(at(break_start), minutes).unwrap();

                let expected = work_start <= break_start && i64::from(break_start) + minutes <= i64::from(work_end);
                prop_assert_eq!(window.is_within(&hours), expected);
            }
        }
    }
}
