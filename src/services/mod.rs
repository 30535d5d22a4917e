//! Business logic services

pub mod schedules;

use std::sync::Arc;

use crate::{config::ScheduleConfig, repository::ScheduleStore};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub schedules: schedules::SchedulesService,
}

impl Services {
    /// Create all services on top of the given store
    pub fn new(store: Arc<dyn ScheduleStore>, schedule_config: &ScheduleConfig) -> Self {
        Self {
            schedules: schedules::SchedulesService::new(store, schedule_config),
        }
    }
}
