//! Device schedule service
//!
//! Every write goes wire payload -> validated schedule -> storage row ->
//! store, and every read decodes the stored row back before it is rendered.

use std::sync::Arc;

use chrono::Utc;

use crate::{
    codec::{
        decode_storage, decode_wire, encode_response, encode_storage, LegacyRowPolicy, ReplaceScheduleRequest,
        ScheduleDeleteResponse, SchedulePayload, ScheduleResponse, ScheduleRow, UpsertScheduleRequest,
    },
    config::ScheduleConfig,
    error::{AppError, AppResult},
    models::{schedule::validate_device_name, DeviceScheduleRecord, ValidationPolicy, WeekDay},
    repository::ScheduleStore,
};

#[derive(Clone)]
pub struct SchedulesService {
    store: Arc<dyn ScheduleStore>,
    validation: ValidationPolicy,
    legacy_rows: LegacyRowPolicy,
}

impl SchedulesService {
    pub fn new(store: Arc<dyn ScheduleStore>, config: &ScheduleConfig) -> Self {
        Self {
            store,
            validation: config.validation_policy(),
            legacy_rows: config.legacy_rows,
        }
    }

    /// Check the storage backend
    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }

    /// Create or replace the schedule of `request.device_name`
    pub async fn upsert(&self, request: UpsertScheduleRequest) -> AppResult<ScheduleResponse> {
        let device_name = validate_device_name(&request.device_name)?;
        self.save(device_name, &request.payload).await
    }

    /// Replace the schedule of a device that already has one
    ///
    /// A `deviceName` in the body is optional but must name the same device
    /// as the path once both are trimmed.
    pub async fn replace(&self, device_name: &str, request: ReplaceScheduleRequest) -> AppResult<ScheduleResponse> {
        let device_name = validate_device_name(device_name)?;
        if self.store.find_by_device_name(&device_name).await?.is_none() {
            return Err(not_found(&device_name));
        }

        if let Some(body_name) = request.device_name.as_deref() {
            if validate_device_name(body_name)? != device_name {
                return Err(AppError::BadRequest(format!(
                    "Device name in body ({}) does not match the URL ({})",
                    body_name.trim(),
                    device_name
                )));
            }
        }

        self.save(device_name, &request.payload).await
    }

    /// Get the schedule of a device
    pub async fn get(&self, device_name: &str) -> AppResult<ScheduleResponse> {
        let device_name = validate_device_name(device_name)?;
        let row = self
            .store
            .find_by_device_name(&device_name)
            .await?
            .ok_or_else(|| not_found(&device_name))?;
        self.render(&row)
    }

    /// All stored schedules
    pub async fn list(&self) -> AppResult<Vec<ScheduleResponse>> {
        let rows = self.store.find_all().await?;
        rows.iter().map(|row| self.render(row)).collect()
    }

    /// Schedules of the devices working on `day`
    pub async fn by_day(&self, day: &str) -> AppResult<Vec<ScheduleResponse>> {
        let day: WeekDay = day.parse()?;
        let rows = self.store.find_by_day(day).await?;
        rows.iter().map(|row| self.render(row)).collect()
    }

    /// Delete the schedule of a device
    pub async fn delete(&self, device_name: &str) -> AppResult<ScheduleDeleteResponse> {
        let device_name = validate_device_name(device_name)?;
        if !self.store.delete(&device_name).await? {
            return Err(not_found(&device_name));
        }

        tracing::info!("Deleted schedule for device {}", device_name);
        Ok(ScheduleDeleteResponse {
            message: format!("Schedule for device {} deleted", device_name),
        })
    }

    async fn save(&self, device_name: String, payload: &SchedulePayload) -> AppResult<ScheduleResponse> {
        let schedule = decode_wire(payload, self.validation)?;

        let now = Utc::now();
        let record = DeviceScheduleRecord {
            device_name,
            schedule,
            created_at: now,
            updated_at: now,
        };

        let row = encode_storage(&record).map_err(|e| AppError::Internal(format!("Failed to encode schedule: {}", e)))?;
        let stored = self.store.upsert(row).await?;
        tracing::info!(
            "Saved schedule for device {} ({} active days)",
            stored.device_name,
            record.schedule.days().len()
        );
        self.render(&stored)
    }

    fn render(&self, row: &ScheduleRow) -> AppResult<ScheduleResponse> {
        let record = decode_storage(row, self.legacy_rows).map_err(|source| AppError::StoredRecord {
            device_name: row.device_name.clone(),
            source,
        })?;
        Ok(encode_response(&record))
    }
}

fn not_found(device_name: &str) -> AppError {
    AppError::NotFound(format!("Schedule for device {} not found", device_name))
}
