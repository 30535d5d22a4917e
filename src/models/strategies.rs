//! proptest generators for valid schedules

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;

use super::{
    schedule::build_schedule, DayInput, DeviceScheduleRecord, RawExtraHours, Schedule, ScheduleMetadata,
    TimeOfDay, ValidationPolicy, WeekDay,
};

const MINUTES_PER_DAY: u32 = 24 * 60;

pub fn at(minutes: u32) -> TimeOfDay {
    TimeOfDay::from_hm(minutes / 60, minutes % 60).unwrap()
}

pub fn time_of_day() -> impl Strategy<Value = TimeOfDay> {
    (0..MINUTES_PER_DAY).prop_map(at)
}

/// Work hours ending by 20:38 with a break inside them
pub fn day_input() -> impl Strategy<Value = DayInput> {
    (0u32..1000, 60u32..240)
        .prop_flat_map(|(start, len)| (Just(start), Just(len), 0..len))
        .prop_flat_map(|(start, len, offset)| {
            (Just(start), Just(len), Just(offset), 1..=i64::from(len - offset))
        })
        .prop_map(|(start, len, offset, minutes)| DayInput {
            work_start: at(start),
            work_end: at(start + len),
            break_start: at(start + offset),
            break_minutes: minutes,
        })
}

/// A day plus disjoint extra hours after its work end
pub fn day_with_extra_hours() -> impl Strategy<Value = (DayInput, Vec<(TimeOfDay, TimeOfDay)>)> {
    day_input().prop_flat_map(|input| {
        let after = input.work_end.minutes_since_midnight();
        let cuts = proptest::collection::vec(after..MINUTES_PER_DAY, 0..6);
        (Just(input), cuts).prop_map(|(input, mut cuts)| {
            cuts.sort_unstable();
            cuts.dedup();
            let blocks = cuts.chunks_exact(2).map(|pair| (at(pair[0]), at(pair[1]))).collect();
            (input, blocks)
        })
    })
}

pub fn metadata() -> impl Strategy<Value = ScheduleMetadata> {
    ("[1-3]\\.[0-9]", "[a-z]{1,8}").prop_map(|(version, source)| ScheduleMetadata { version, source })
}

pub fn schedule() -> impl Strategy<Value = Schedule> {
    (
        proptest::collection::vec(proptest::option::of(day_with_extra_hours()), 7),
        metadata(),
    )
        .prop_filter("at least one working day", |(week, _)| week.iter().any(Option::is_some))
        .prop_map(|(week, metadata)| {
            let mut days = BTreeMap::new();
            let mut extra_hours = RawExtraHours::new();
            for (day, entry) in WeekDay::ALL.into_iter().zip(week) {
                if let Some((input, blocks)) = entry {
                    days.insert(day, input);
                    extra_hours.insert(day, blocks);
                }
            }
            build_schedule(&days, &extra_hours, metadata, ValidationPolicy::default()).unwrap()
        })
}

fn timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..4_000_000_000).prop_map(|secs| Utc.timestamp_opt(secs, 0).unwrap())
}

pub fn record() -> impl Strategy<Value = DeviceScheduleRecord> {
    ("[A-Za-z][A-Za-z0-9-]{0,11}", schedule(), timestamp(), 0i64..1_000_000).prop_map(
        |(device_name, schedule, created_at, later)| DeviceScheduleRecord {
            device_name,
            schedule,
            created_at,
            updated_at: created_at + chrono::Duration::seconds(later),
        },
    )
}
