//! In-memory schedule store
//!
//! Used when `storage.backend = "memory"` and by the test suites. Rows are
//! kept exactly as the codec hands them over, so legacy rows can be seeded
//! with [`InMemoryScheduleStore::insert_raw`].

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use super::ScheduleStore;
use crate::{codec::ScheduleRow, error::AppResult, models::WeekDay};

#[derive(Clone, Default)]
pub struct InMemoryScheduleStore {
    rows: Arc<RwLock<HashMap<String, ScheduleRow>>>,
}

impl InMemoryScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a row untouched, timestamps included
    pub async fn insert_raw(&self, row: ScheduleRow) {
        self.rows.write().await.insert(row.device_name.clone(), row);
    }
}

#[async_trait]
impl ScheduleStore for InMemoryScheduleStore {
    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn find_by_device_name(&self, device_name: &str) -> AppResult<Option<ScheduleRow>> {
        Ok(self.rows.read().await.get(device_name).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<ScheduleRow>> {
        let mut rows: Vec<ScheduleRow> = self.rows.read().await.values().cloned().collect();
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.device_name.cmp(&b.device_name))
        });
        Ok(rows)
    }

    async fn find_by_day(&self, day: WeekDay) -> AppResult<Vec<ScheduleRow>> {
        let mut rows: Vec<ScheduleRow> = self
            .rows
            .read()
            .await
            .values()
            .filter(|row| row.works_on(day))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.device_name.cmp(&b.device_name));
        Ok(rows)
    }

    async fn upsert(&self, mut row: ScheduleRow) -> AppResult<ScheduleRow> {
        let mut rows = self.rows.write().await;
        let now = Utc::now();

        match rows.get(&row.device_name) {
            Some(previous) => {
                row.created_at = previous.created_at;
                row.updated_at = now.max(previous.updated_at + Duration::microseconds(1));
            }
            None => {
                row.created_at = now;
                row.updated_at = now;
            }
        }

        // Same as the SQL upsert: the per-day document replaces the flat columns
        row.active_days = None;
        row.work_start_time = None;
        row.work_end_time = None;
        row.break_start_time = None;
        row.break_duration = None;

        rows.insert(row.device_name.clone(), row.clone());
        Ok(row)
    }

    async fn delete(&self, device_name: &str) -> AppResult<bool> {
        Ok(self.rows.write().await.remove(device_name).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use serde_json::json;
    use sqlx::types::Json;

    fn per_day_row(device_name: &str, days: &[&str]) -> ScheduleRow {
        let document: serde_json::Map<String, serde_json::Value> = days
            .iter()
            .map(|day| {
                (
                    day.to_string(),
                    json!({
                        "workHours": { "start": "08:00", "end": "17:00" },
                        "break": { "start": "12:00", "durationMinutes": 60 }
                    }),
                )
            })
            .collect();

        ScheduleRow {
            device_name: device_name.to_string(),
            day_schedules: Some(Json(serde_json::Value::Object(document))),
            extra_hours: None,
            active_days: None,
            work_start_time: None,
            work_end_time: None,
            break_start_time: None,
            break_duration: None,
            version: "1.0".to_string(),
            source: "api".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn legacy_row(device_name: &str, days: &[&str]) -> ScheduleRow {
        ScheduleRow {
            day_schedules: None,
            active_days: Some(days.iter().map(|d| d.to_string()).collect()),
            work_start_time: NaiveTime::from_hms_opt(8, 0, 0),
            work_end_time: NaiveTime::from_hms_opt(16, 0, 0),
            break_start_time: NaiveTime::from_hms_opt(12, 0, 0),
            break_duration: Some(30),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            ..per_day_row(device_name, &[])
        }
    }

    #[tokio::test]
    async fn test_upsert_then_find() {
        let store = InMemoryScheduleStore::new();
        store.upsert(per_day_row("Rep1", &["monday"])).await.unwrap();

        let found = store.find_by_device_name("Rep1").await.unwrap();
        assert!(found.is_some());
        assert!(store.find_by_device_name("Rep2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_replace_keeps_created_at_and_advances_updated_at() {
        let store = InMemoryScheduleStore::new();
        let first = store.upsert(per_day_row("Rep1", &["monday"])).await.unwrap();
        let second = store
            .upsert(per_day_row("Rep1", &["monday", "tuesday"]))
            .await
            .unwrap();

        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at > first.updated_at);
        assert_eq!(store.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_day_covers_both_shapes() {
        let store = InMemoryScheduleStore::new();
        store.upsert(per_day_row("Rep2", &["monday", "friday"])).await.unwrap();
        store.upsert(per_day_row("Rep3", &["tuesday"])).await.unwrap();
        store.insert_raw(legacy_row("Rep1", &["Monday", "Wednesday"])).await;

        let monday: Vec<String> = store
            .find_by_day(WeekDay::Monday)
            .await
            .unwrap()
            .into_iter()
            .map(|row| row.device_name)
            .collect();
        assert_eq!(monday, vec!["Rep1", "Rep2"]);

        let sunday = store.find_by_day(WeekDay::Sunday).await.unwrap();
        assert!(sunday.is_empty());
    }

    #[tokio::test]
    async fn test_upsert_clears_legacy_columns() {
        let store = InMemoryScheduleStore::new();
        let legacy = legacy_row("Rep1", &["monday"]);
        let created_at = legacy.created_at;
        store.insert_raw(legacy).await;

        let stored = store.upsert(per_day_row("Rep1", &["monday"])).await.unwrap();
        assert_eq!(stored.created_at, created_at);
        assert!(stored.active_days.is_none());
        assert!(stored.work_start_time.is_none());
        assert!(stored.break_duration.is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let store = InMemoryScheduleStore::new();
        store.upsert(per_day_row("Rep1", &["monday"])).await.unwrap();

        assert!(store.delete("Rep1").await.unwrap());
        assert!(!store.delete("Rep1").await.unwrap());
        assert!(store.find_all().await.unwrap().is_empty());
    }
}
