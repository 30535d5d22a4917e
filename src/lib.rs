//! Shifts server
//!
//! Stores and serves the weekly work schedule of each device: regular hours
//! and a break per weekday, plus optional extra-hours intervals, exposed as a
//! REST JSON API.

use std::sync::Arc;

pub mod api;
pub mod codec;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
