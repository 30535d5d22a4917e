//! Weekly device schedules (work hours, breaks, extra hours)
//!
//! Every [`Schedule`] value is produced by [`build_schedule`], so holding one
//! means all invariants below already hold:
//!
//! - each active day has `work_start < work_end` and a positive break that
//!   lies entirely inside the work hours;
//! - extra-hours intervals of a day are sorted, pairwise disjoint and never
//!   overlap that day's regular work hours (which contain the break).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::time::{BreakWindow, Interval, TimeOfDay};
use super::weekday::WeekDay;
use crate::error::ValidationError;

pub const DEFAULT_VERSION: &str = "1.0";
pub const DEFAULT_SOURCE: &str = "api";

/// Extra-hours intervals per weekday, sorted by start
pub type ExtraHoursSet = BTreeMap<WeekDay, Vec<Interval>>;

/// Extra-hours `(start, end)` pairs per weekday, before validation
pub type RawExtraHours = BTreeMap<WeekDay, Vec<(TimeOfDay, TimeOfDay)>>;

// ---------------------------------------------------------------------------
// DaySchedule
// ---------------------------------------------------------------------------

/// Regular hours of one weekday, before validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayInput {
    pub work_start: TimeOfDay,
    pub work_end: TimeOfDay,
    pub break_start: TimeOfDay,
    pub break_minutes: i64,
}

/// Validated work hours and break window of one weekday
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySchedule {
    work_hours: Interval,
    break_window: BreakWindow,
}

impl DaySchedule {
    pub fn work_hours(&self) -> Interval {
        self.work_hours
    }

    pub fn break_window(&self) -> BreakWindow {
        self.break_window
    }

    /// Whether `extra` would double-book regular time. The break lies inside
    /// the work hours, so checking the work hours covers it.
    pub fn conflicts_with(&self, extra: &Interval) -> bool {
        extra.overlaps(&self.work_hours)
    }
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleMetadata {
    pub version: String,
    pub source: String,
}

impl Default for ScheduleMetadata {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            source: DEFAULT_SOURCE.to_string(),
        }
    }
}

/// A device's full week; weekdays absent from `days` are not worked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    days: BTreeMap<WeekDay, DaySchedule>,
    extra_hours: ExtraHoursSet,
    metadata: ScheduleMetadata,
}

impl Schedule {
    /// Active days in Monday to Sunday order
    pub fn days(&self) -> &BTreeMap<WeekDay, DaySchedule> {
        &self.days
    }

    pub fn extra_hours(&self) -> &ExtraHoursSet {
        &self.extra_hours
    }

    pub fn metadata(&self) -> &ScheduleMetadata {
        &self.metadata
    }

    pub fn is_work_day(&self, day: WeekDay) -> bool {
        self.days.contains_key(&day)
    }
}

/// Persisted unit: one schedule per device name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceScheduleRecord {
    pub device_name: String,
    pub schedule: Schedule,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Rules left open to deployment configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// Accept extra hours on a weekday without regular hours (overtime-only days)
    pub allow_extra_hours_on_inactive_days: bool,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Work hours or extra hours, `start < end`
pub fn validate_interval(start: TimeOfDay, end: TimeOfDay) -> Result<Interval, ValidationError> {
    Interval::new(start, end)
}

/// Validate one weekday's work hours and break
pub fn validate_day_schedule(day: WeekDay, input: &DayInput) -> Result<DaySchedule, ValidationError> {
    let work_hours = validate_interval(input.work_start, input.work_end)?;
    let break_window = BreakWindow::new(input.break_start, input.break_minutes)?;

    if !break_window.is_within(&work_hours) {
        return Err(ValidationError::BreakOutsideWorkHours {
            day,
            break_window,
            work_hours,
        });
    }

    Ok(DaySchedule {
        work_hours,
        break_window,
    })
}

/// Validate extra hours against the regular days they extend.
///
/// Weekdays with an empty list are dropped; intervals come back sorted.
pub fn validate_extra_hours(
    raw: &RawExtraHours,
    days: &BTreeMap<WeekDay, DaySchedule>,
    policy: ValidationPolicy,
) -> Result<ExtraHoursSet, ValidationError> {
    let mut set = ExtraHoursSet::new();

    for (&day, blocks) in raw {
        if blocks.is_empty() {
            continue;
        }

        let regular = days.get(&day);
        if regular.is_none() && !policy.allow_extra_hours_on_inactive_days {
            return Err(ValidationError::ExtraHoursForUnknownDay(day));
        }

        let mut intervals = blocks
            .iter()
            .map(|&(start, end)| validate_interval(start, end))
            .collect::<Result<Vec<_>, _>>()?;
        intervals.sort_by_key(|interval| (interval.start(), interval.end()));

        for pair in intervals.windows(2) {
            if pair[0].end() > pair[1].start() {
                return Err(ValidationError::OverlappingExtraHours {
                    day,
                    first: pair[0],
                    second: pair[1],
                });
            }
        }

        if let Some(regular) = regular {
            if let Some(extra) = intervals.iter().find(|extra| regular.conflicts_with(extra)) {
                return Err(ValidationError::ExtraHoursConflictWithWorkHours {
                    day,
                    extra: *extra,
                    work_hours: regular.work_hours(),
                });
            }
        }

        set.insert(day, intervals);
    }

    Ok(set)
}

/// Assemble a validated schedule.
///
/// Days are checked Monday to Sunday and the first failure is returned;
/// extra hours are checked only once every day is valid.
pub fn build_schedule(
    days: &BTreeMap<WeekDay, DayInput>,
    extra_hours: &RawExtraHours,
    metadata: ScheduleMetadata,
    policy: ValidationPolicy,
) -> Result<Schedule, ValidationError> {
    if days.is_empty() {
        return Err(ValidationError::NoActiveDays);
    }

    let days = days
        .iter()
        .map(|(&day, input)| validate_day_schedule(day, input).map(|valid| (day, valid)))
        .collect::<Result<BTreeMap<_, _>, _>>()?;

    let extra_hours = validate_extra_hours(extra_hours, &days, policy)?;

    Ok(Schedule {
        days,
        extra_hours,
        metadata,
    })
}

/// Regular hours of `day`, `None` when the device does not work that day
pub fn by_day(schedule: &Schedule, day: WeekDay) -> Option<&DaySchedule> {
    schedule.days.get(&day)
}

/// Trimmed device name; blank names are rejected
pub fn validate_device_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyDeviceName);
    }
    Ok(trimmed.to_string())
}
