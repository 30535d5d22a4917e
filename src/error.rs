//! Error types for the shifts server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::models::{
    time::{BreakWindow, Interval, TimeOfDay},
    weekday::WeekDay,
};

/// Generic error codes carried in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthorized = 2,
    DbFailure = 3,
    NoSuchSchedule = 4,
    Duplicate = 5,
    BadValue = 6,
}

// ---------------------------------------------------------------------------
// ValidationError
// ---------------------------------------------------------------------------

/// Why a schedule (or its stored form) was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid time '{value}' (use HH:MM)")]
    TimeParse { value: String },

    #[error("Unknown weekday '{0}'")]
    UnknownWeekDay(String),

    #[error("Weekday {0} is given more than once")]
    DuplicateWeekDay(WeekDay),

    #[error("Interval start {start} must be before end {end}")]
    InvalidInterval { start: TimeOfDay, end: TimeOfDay },

    #[error("Break duration must be positive, got {minutes} minutes")]
    NonPositiveDuration { minutes: i64 },

    #[error("Break {break_window} on {day} falls outside work hours {work_hours}")]
    BreakOutsideWorkHours {
        day: WeekDay,
        break_window: BreakWindow,
        work_hours: Interval,
    },

    #[error("Overlapping extra hours on {day}: {first} and {second}")]
    OverlappingExtraHours {
        day: WeekDay,
        first: Interval,
        second: Interval,
    },

    #[error("Extra hours {extra} on {day} overlap work hours {work_hours}")]
    ExtraHoursConflictWithWorkHours {
        day: WeekDay,
        extra: Interval,
        work_hours: Interval,
    },

    #[error("Extra hours given for {0}, which has no regular schedule")]
    ExtraHoursForUnknownDay(WeekDay),

    #[error("At least one active day is required")]
    NoActiveDays,

    #[error("Device name cannot be empty")]
    EmptyDeviceName,

    #[error("Schedule for device '{device_name}' uses the retired flat layout")]
    LegacyShapeRejected { device_name: String },

    #[error("Schedule for device '{device_name}' matches no known storage layout")]
    UnrecognizedStorageShape { device_name: String },

    #[error("Malformed stored schedule document: {0}")]
    MalformedDocument(String),
}

impl ValidationError {
    /// Stable tag reported to API clients
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::TimeParse { .. } => "TimeParseError",
            ValidationError::UnknownWeekDay(_) => "UnknownWeekDay",
            ValidationError::DuplicateWeekDay(_) => "DuplicateWeekDay",
            ValidationError::InvalidInterval { .. } => "InvalidInterval",
            ValidationError::NonPositiveDuration { .. } => "NonPositiveDuration",
            ValidationError::BreakOutsideWorkHours { .. } => "BreakOutsideWorkHours",
            ValidationError::OverlappingExtraHours { .. } => "OverlappingExtraHours",
            ValidationError::ExtraHoursConflictWithWorkHours { .. } => "ExtraHoursConflictWithWorkHours",
            ValidationError::ExtraHoursForUnknownDay(_) => "ExtraHoursForUnknownDay",
            ValidationError::NoActiveDays => "NoActiveDays",
            ValidationError::EmptyDeviceName => "EmptyDeviceName",
            ValidationError::LegacyShapeRejected { .. } => "LegacyShapeRejected",
            ValidationError::UnrecognizedStorageShape { .. } => "UnrecognizedStorageShape",
            ValidationError::MalformedDocument(_) => "MalformedDocument",
        }
    }
}

// ---------------------------------------------------------------------------
// AppError
// ---------------------------------------------------------------------------

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Stored schedule for device '{device_name}' is unreadable: {source}")]
    StoredRecord {
        device_name: String,
        source: ValidationError,
    },

    #[error("Device '{0}' already has a schedule")]
    DuplicateDevice(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request body that is not JSON or does not fit the payload shape
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    /// Error tag, e.g. `BreakOutsideWorkHours` or `NoSuchSchedule`
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error, message) = match &self {
            AppError::Authentication(msg) => (
                StatusCode::UNAUTHORIZED,
                ErrorCode::NotAuthorized,
                None,
                msg.clone(),
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorCode::NoSuchSchedule,
                None,
                msg.clone(),
            ),
            AppError::Validation(e) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::BadValue,
                Some(e.kind()),
                e.to_string(),
            ),
            AppError::StoredRecord { source, .. } => {
                tracing::error!("{}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    Some(source.kind()),
                    self.to_string(),
                )
            }
            AppError::DuplicateDevice(_) => (
                StatusCode::CONFLICT,
                ErrorCode::Duplicate,
                None,
                self.to_string(),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    None,
                    "Database error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::BadValue,
                None,
                msg.clone(),
            ),
            AppError::InvalidPayload(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::BadValue,
                Some("InvalidPayload"),
                msg.clone(),
            ),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    None,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: error.map(str::to_string).unwrap_or_else(|| format!("{:?}", code)),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
