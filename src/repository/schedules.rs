//! PostgreSQL-backed schedule store

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::ScheduleStore;
use crate::{
    codec::ScheduleRow,
    error::{AppError, AppResult},
    models::WeekDay,
};

const SELECT_COLUMNS: &str = r#"
    device_name, day_schedules, extra_hours, active_days,
    work_start_time, work_end_time, break_start_time, break_duration,
    version, source, created_at, updated_at
"#;

/// Schedule store over the `schedules` table
#[derive(Clone)]
pub struct PgScheduleStore {
    pool: Pool<Postgres>,
}

impl PgScheduleStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Unique violations surface as a conflict on the device name
fn map_write_error(err: sqlx::Error, device_name: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            AppError::DuplicateDevice(device_name.to_string())
        }
        _ => AppError::Database(err),
    }
}

#[async_trait]
impl ScheduleStore for PgScheduleStore {
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_by_device_name(&self, device_name: &str) -> AppResult<Option<ScheduleRow>> {
        let row = sqlx::query_as::<_, ScheduleRow>(&format!(
            "SELECT {} FROM schedules WHERE device_name = $1",
            SELECT_COLUMNS
        ))
        .bind(device_name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn find_all(&self) -> AppResult<Vec<ScheduleRow>> {
        let rows = sqlx::query_as::<_, ScheduleRow>(&format!(
            "SELECT {} FROM schedules ORDER BY created_at DESC, device_name",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_by_day(&self, day: WeekDay) -> AppResult<Vec<ScheduleRow>> {
        // Legacy rows keep their days in active_days, possibly capitalised
        let rows = sqlx::query_as::<_, ScheduleRow>(&format!(
            r#"
            SELECT {} FROM schedules
            WHERE day_schedules ? $1
               OR (day_schedules IS NULL
                   AND EXISTS (SELECT 1 FROM unnest(active_days) d WHERE lower(trim(d)) = $1))
            ORDER BY device_name
            "#,
            SELECT_COLUMNS
        ))
        .bind(day.as_str())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn upsert(&self, row: ScheduleRow) -> AppResult<ScheduleRow> {
        tracing::debug!("Upserting schedule row for device {}", row.device_name);

        // Writing the per-day document retires any legacy columns
        sqlx::query_as::<_, ScheduleRow>(&format!(
            r#"
            INSERT INTO schedules (device_name, day_schedules, extra_hours, version, source, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            ON CONFLICT (device_name) DO UPDATE SET
                day_schedules = EXCLUDED.day_schedules,
                extra_hours = EXCLUDED.extra_hours,
                active_days = NULL,
                work_start_time = NULL,
                work_end_time = NULL,
                break_start_time = NULL,
                break_duration = NULL,
                version = EXCLUDED.version,
                source = EXCLUDED.source,
                updated_at = GREATEST(NOW(), schedules.updated_at + INTERVAL '1 microsecond')
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(&row.device_name)
        .bind(&row.day_schedules)
        .bind(&row.extra_hours)
        .bind(&row.version)
        .bind(&row.source)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, &row.device_name))
    }

    async fn delete(&self, device_name: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM schedules WHERE device_name = $1")
            .bind(device_name)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
