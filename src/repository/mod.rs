//! Repository layer for schedule persistence
//!
//! Both backends deal in [`ScheduleRow`], the storage shape produced by the
//! codec. Validation never happens here.

pub mod memory;
pub mod schedules;

use async_trait::async_trait;

use crate::{codec::ScheduleRow, error::AppResult, models::WeekDay};

pub use memory::InMemoryScheduleStore;
pub use schedules::PgScheduleStore;

/// Storage backend for device schedules
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Check that the backend can serve requests
    async fn ping(&self) -> AppResult<()>;

    /// Fetch the row stored for a device, if any
    async fn find_by_device_name(&self, device_name: &str) -> AppResult<Option<ScheduleRow>>;

    /// All rows, most recently created first
    async fn find_all(&self) -> AppResult<Vec<ScheduleRow>>;

    /// Rows that declare `day` as an active day, in either storage shape
    async fn find_by_day(&self, day: WeekDay) -> AppResult<Vec<ScheduleRow>>;

    /// Insert or replace the row for `row.device_name`.
    ///
    /// The original `created_at` survives a replace and `updated_at` is
    /// set by the store. Returns the row as stored.
    async fn upsert(&self, row: ScheduleRow) -> AppResult<ScheduleRow>;

    /// Remove the row for a device. Returns `false` when nothing was stored.
    async fn delete(&self, device_name: &str) -> AppResult<bool>;
}
