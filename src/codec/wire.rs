//! Wire representation: the JSON exchanged with API clients
//!
//! ```json
//! {
//!   "deviceName": "Rep1",
//!   "schedule": {
//!     "monday": { "workHours": { "start": "08:00", "end": "17:00" },
//!                 "break": { "start": "12:00", "durationMinutes": 30 } }
//!   },
//!   "extraHours": { "monday": [ { "start": "17:00", "end": "18:00" } ] },
//!   "metadata": { "version": "1.0", "source": "api" }
//! }
//! ```
//!
//! The same day and interval objects make up the stored day document.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::ValidationError,
    models::{
        schedule::{build_schedule, DEFAULT_SOURCE, DEFAULT_VERSION},
        DayInput, DeviceScheduleRecord, Interval, RawExtraHours, Schedule, ScheduleMetadata,
        TimeOfDay, ValidationPolicy, WeekDay,
    },
};

/// Day key to regular hours
pub type DayMapPayload = IndexMap<String, DaySchedulePayload>;

/// Day key to extra-hours intervals
pub type ExtraHoursPayload = IndexMap<String, Vec<IntervalPayload>>;

// ---------------------------------------------------------------------------
// Payload types
// ---------------------------------------------------------------------------

/// Time range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IntervalPayload {
    /// Start time (HH:MM)
    pub start: String,
    /// End time (HH:MM)
    pub end: String,
}

/// Break window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BreakPayload {
    /// Break start time (HH:MM)
    pub start: String,
    /// Break duration in minutes
    #[serde(alias = "duration_minutes")]
    pub duration_minutes: i64,
}

/// Regular hours of one weekday
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DaySchedulePayload {
    #[serde(rename = "workHours")]
    pub work_hours: IntervalPayload,
    #[serde(rename = "break")]
    pub break_time: BreakPayload,
}

/// Schedule metadata; timestamps are only present in responses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetadataPayload {
    /// Schedule version (default "1.0")
    pub version: Option<String>,
    /// Schedule source (default "api")
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Full weekly schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePayload {
    /// Regular hours keyed by weekday ("monday" .. "sunday")
    #[schema(value_type = Object)]
    pub schedule: DayMapPayload,
    /// Extra-hours intervals keyed by weekday
    #[schema(value_type = Option<Object>)]
    pub extra_hours: Option<ExtraHoursPayload>,
    pub metadata: Option<MetadataPayload>,
}

/// Create or replace the schedule of a device
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertScheduleRequest {
    pub device_name: String,
    #[serde(flatten)]
    pub payload: SchedulePayload,
}

/// Replace the schedule of a device named in the path.
///
/// `deviceName` is optional here; when given it must match the path.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceScheduleRequest {
    #[serde(default)]
    pub device_name: Option<String>,
    #[serde(flatten)]
    pub payload: SchedulePayload,
}

/// Stored schedule of a device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub device_name: String,
    #[serde(flatten)]
    pub payload: SchedulePayload,
}

/// Delete confirmation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ScheduleDeleteResponse {
    pub message: String,
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Parse a wire payload and validate it into a schedule
pub fn decode_wire(payload: &SchedulePayload, policy: ValidationPolicy) -> Result<Schedule, ValidationError> {
    let days = decode_days(&payload.schedule)?;
    let extra_hours = decode_extra_hours(payload.extra_hours.as_ref())?;
    let metadata = decode_metadata(payload.metadata.as_ref());
    build_schedule(&days, &extra_hours, metadata, policy)
}

/// Map weekday keys, rejecting unknown and repeated days
fn by_weekday<T>(map: &IndexMap<String, T>) -> Result<BTreeMap<WeekDay, &T>, ValidationError> {
    let mut out = BTreeMap::new();
    for (key, value) in map {
        let day: WeekDay = key.parse()?;
        if out.insert(day, value).is_some() {
            return Err(ValidationError::DuplicateWeekDay(day));
        }
    }
    Ok(out)
}

/// Times are parsed day by day, Monday first
pub(crate) fn decode_days(map: &DayMapPayload) -> Result<BTreeMap<WeekDay, DayInput>, ValidationError> {
    by_weekday(map)?
        .into_iter()
        .map(|(day, payload)| {
            let input = DayInput {
                work_start: payload.work_hours.start.parse()?,
                work_end: payload.work_hours.end.parse()?,
                break_start: payload.break_time.start.parse()?,
                break_minutes: payload.break_time.duration_minutes,
            };
            Ok::<_, ValidationError>((day, input))
        })
        .collect()
}

pub(crate) fn decode_extra_hours(map: Option<&ExtraHoursPayload>) -> Result<RawExtraHours, ValidationError> {
    let Some(map) = map else {
        return Ok(RawExtraHours::new());
    };

    by_weekday(map)?
        .into_iter()
        .map(|(day, blocks)| {
            let blocks = blocks
                .iter()
                .map(|block| Ok((block.start.parse::<TimeOfDay>()?, block.end.parse::<TimeOfDay>()?)))
                .collect::<Result<Vec<_>, ValidationError>>()?;
            Ok::<_, ValidationError>((day, blocks))
        })
        .collect()
}

fn decode_metadata(metadata: Option<&MetadataPayload>) -> ScheduleMetadata {
    ScheduleMetadata {
        version: field_or(metadata.and_then(|m| m.version.as_deref()), DEFAULT_VERSION),
        source: field_or(metadata.and_then(|m| m.source.as_deref()), DEFAULT_SOURCE),
    }
}

/// Blank metadata fields fall back to their default
fn field_or(value: Option<&str>, default: &str) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

fn encode_interval(interval: &Interval) -> IntervalPayload {
    IntervalPayload {
        start: interval.start().to_string(),
        end: interval.end().to_string(),
    }
}

/// Day map in Monday to Sunday order
pub(crate) fn encode_days(schedule: &Schedule) -> DayMapPayload {
    schedule
        .days()
        .iter()
        .map(|(day, regular)| {
            let payload = DaySchedulePayload {
                work_hours: encode_interval(&regular.work_hours()),
                break_time: BreakPayload {
                    start: regular.break_window().start().to_string(),
                    duration_minutes: i64::from(regular.break_window().duration_minutes()),
                },
            };
            (day.as_str().to_string(), payload)
        })
        .collect()
}

/// `None` when the schedule has no extra hours
pub(crate) fn encode_extra_hours(schedule: &Schedule) -> Option<ExtraHoursPayload> {
    if schedule.extra_hours().is_empty() {
        return None;
    }

    Some(
        schedule
            .extra_hours()
            .iter()
            .map(|(day, intervals)| {
                (
                    day.as_str().to_string(),
                    intervals.iter().map(encode_interval).collect(),
                )
            })
            .collect(),
    )
}

/// Deterministic wire form of a schedule
pub fn encode_wire(schedule: &Schedule) -> SchedulePayload {
    SchedulePayload {
        schedule: encode_days(schedule),
        extra_hours: encode_extra_hours(schedule),
        metadata: Some(MetadataPayload {
            version: Some(schedule.metadata().version.clone()),
            source: Some(schedule.metadata().source.clone()),
            created_at: None,
            updated_at: None,
        }),
    }
}

/// Wire form of a stored record, timestamps included
pub fn encode_response(record: &DeviceScheduleRecord) -> ScheduleResponse {
    let mut payload = encode_wire(&record.schedule);
    if let Some(metadata) = payload.metadata.as_mut() {
        metadata.created_at = Some(record.created_at);
        metadata.updated_at = Some(record.updated_at);
    }

    ScheduleResponse {
        device_name: record.device_name.clone(),
        payload,
    }
}
