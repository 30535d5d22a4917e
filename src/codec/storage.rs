//! Storage representation: one `schedules` row per device
//!
//! Rows written today carry the per-day `day_schedules` document. Rows from
//! the first schema generation instead hold one set of work hours and one
//! break shared by every day listed in `active_days`; those columns are only
//! read, never written.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use sqlx::{types::Json, FromRow};

use super::wire::{decode_days, decode_extra_hours, encode_days, encode_extra_hours, DayMapPayload, ExtraHoursPayload};
use crate::{
    error::ValidationError,
    models::{
        schedule::build_schedule, DayInput, DeviceScheduleRecord, ScheduleMetadata, TimeOfDay,
        ValidationPolicy, WeekDay,
    },
};

/// What to do with rows still in the flat layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegacyRowPolicy {
    /// Copy the shared hours and break onto every active day
    #[default]
    Migrate,
    /// Refuse to read them
    Reject,
}

/// A `schedules` row
#[derive(Debug, Clone, FromRow)]
pub struct ScheduleRow {
    pub device_name: String,
    pub day_schedules: Option<Json<Value>>,
    pub extra_hours: Option<Json<Value>>,
    pub active_days: Option<Vec<String>>,
    pub work_start_time: Option<NaiveTime>,
    pub work_end_time: Option<NaiveTime>,
    pub break_start_time: Option<NaiveTime>,
    pub break_duration: Option<i32>,
    pub version: String,
    pub source: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Flat weekly layout of the first schema generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyFlatShape {
    pub active_days: Vec<String>,
    pub work_start: NaiveTime,
    pub work_end: NaiveTime,
    pub break_start: NaiveTime,
    pub break_minutes: i32,
}

/// Layout a row was written in
#[derive(Debug, Clone, PartialEq)]
pub enum StoredShape<'a> {
    LegacyFlat(LegacyFlatShape),
    PerDay(&'a Value),
}

impl ScheduleRow {
    /// Classify the row; the per-day document wins when both are present
    pub fn shape(&self) -> Result<StoredShape<'_>, ValidationError> {
        if let Some(Json(days)) = &self.day_schedules {
            return Ok(StoredShape::PerDay(days));
        }

        match (
            &self.active_days,
            self.work_start_time,
            self.work_end_time,
            self.break_start_time,
            self.break_duration,
        ) {
            (Some(active_days), Some(work_start), Some(work_end), Some(break_start), Some(break_minutes)) => {
                Ok(StoredShape::LegacyFlat(LegacyFlatShape {
                    active_days: active_days.clone(),
                    work_start,
                    work_end,
                    break_start,
                    break_minutes,
                }))
            }
            _ => Err(ValidationError::UnrecognizedStorageShape {
                device_name: self.device_name.clone(),
            }),
        }
    }

    /// Whether the stored day map has an entry for `day`
    pub fn works_on(&self, day: WeekDay) -> bool {
        match self.shape() {
            Ok(StoredShape::PerDay(days)) => days.get(day.as_str()).is_some(),
            Ok(StoredShape::LegacyFlat(legacy)) => legacy
                .active_days
                .iter()
                .any(|d| d.trim().eq_ignore_ascii_case(day.as_str())),
            Err(_) => false,
        }
    }
}

impl LegacyFlatShape {
    /// One identical day per active weekday; repeated weekdays collapse
    fn expand(&self) -> Result<BTreeMap<WeekDay, DayInput>, ValidationError> {
        let input = DayInput {
            work_start: TimeOfDay::from_naive_time(self.work_start),
            work_end: TimeOfDay::from_naive_time(self.work_end),
            break_start: TimeOfDay::from_naive_time(self.break_start),
            break_minutes: i64::from(self.break_minutes),
        };

        self.active_days
            .iter()
            .map(|day| Ok::<_, ValidationError>((day.parse::<WeekDay>()?, input)))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Row for `record`; the store decides the timestamps it actually persists.
///
/// The documents are the wire day map and extra-hours map, serialized as is.
pub fn encode_storage(record: &DeviceScheduleRecord) -> Result<ScheduleRow, serde_json::Error> {
    let metadata = record.schedule.metadata();
    let day_schedules = serde_json::to_value(encode_days(&record.schedule))?;
    let extra_hours = encode_extra_hours(&record.schedule)
        .map(serde_json::to_value)
        .transpose()?;

    Ok(ScheduleRow {
        device_name: record.device_name.clone(),
        day_schedules: Some(Json(day_schedules)),
        extra_hours: extra_hours.map(Json),
        active_days: None,
        work_start_time: None,
        work_end_time: None,
        break_start_time: None,
        break_duration: None,
        version: metadata.version.clone(),
        source: metadata.source.clone(),
        created_at: record.created_at,
        updated_at: record.updated_at,
    })
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

fn malformed(e: serde_json::Error) -> ValidationError {
    ValidationError::MalformedDocument(e.to_string())
}

/// Rebuild a record from a row.
///
/// Rows were validated when written, so extra hours on days without regular
/// hours are accepted here whatever the current write policy says.
pub fn decode_storage(row: &ScheduleRow, legacy_rows: LegacyRowPolicy) -> Result<DeviceScheduleRecord, ValidationError> {
    let days = match row.shape()? {
        StoredShape::PerDay(document) => {
            let payload: DayMapPayload = serde_json::from_value(document.clone()).map_err(malformed)?;
            decode_days(&payload)?
        }
        StoredShape::LegacyFlat(legacy) => match legacy_rows {
            LegacyRowPolicy::Migrate => legacy.expand()?,
            LegacyRowPolicy::Reject => {
                return Err(ValidationError::LegacyShapeRejected {
                    device_name: row.device_name.clone(),
                })
            }
        },
    };

    let extra_hours: Option<ExtraHoursPayload> = match &row.extra_hours {
        Some(Json(document)) => serde_json::from_value(document.clone()).map_err(malformed)?,
        None => None,
    };
    let extra_hours = decode_extra_hours(extra_hours.as_ref())?;

    let metadata = ScheduleMetadata {
        version: row.version.clone(),
        source: row.source.clone(),
    };
    let stored_policy = ValidationPolicy {
        allow_extra_hours_on_inactive_days: true,
    };
    let schedule = build_schedule(&days, &extra_hours, metadata, stored_policy)?;

    Ok(DeviceScheduleRecord {
        device_name: row.device_name.clone(),
        schedule,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}
