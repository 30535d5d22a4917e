//! Schedule data model

pub mod schedule;
pub mod time;
pub mod weekday;

#[cfg(test)]
pub(crate) mod strategies;

// Re-export commonly used types
pub use schedule::{
    DayInput, DaySchedule, DeviceScheduleRecord, ExtraHoursSet, RawExtraHours, Schedule,
    ScheduleMetadata, ValidationPolicy,
};
pub use time::{BreakWindow, Interval, TimeOfDay};
pub use weekday::WeekDay;
