//! Device schedule API endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    codec::{ReplaceScheduleRequest, ScheduleDeleteResponse, ScheduleResponse, UpsertScheduleRequest},
    error::AppResult,
    AppState,
};

use super::{ApiJson, ApiKey};

/// Create or replace the schedule of a device
#[utoipa::path(
    post,
    path = "/schedules",
    tag = "schedules",
    security(("api_key" = [])),
    request_body = UpsertScheduleRequest,
    responses(
        (status = 200, description = "Schedule stored", body = ScheduleResponse),
        (status = 400, description = "Invalid schedule or malformed body", body = crate::error::ErrorResponse),
        (status = 401, description = "Missing or invalid API key", body = crate::error::ErrorResponse),
        (status = 409, description = "Device name conflict", body = crate::error::ErrorResponse)
    )
)]
pub async fn upsert_schedule(
    State(state): State<AppState>,
    _key: ApiKey,
    ApiJson(request): ApiJson<UpsertScheduleRequest>,
) -> AppResult<Json<ScheduleResponse>> {
    let schedule = state.services.schedules.upsert(request).await?;
    Ok(Json(schedule))
}

/// Replace the whole schedule of an existing device
#[utoipa::path(
    put,
    path = "/schedules/{device_name}",
    tag = "schedules",
    security(("api_key" = [])),
    params(("device_name" = String, Path, description = "Device name")),
    request_body = ReplaceScheduleRequest,
    responses(
        (status = 200, description = "Schedule replaced", body = ScheduleResponse),
        (status = 400, description = "Invalid schedule or device name mismatch", body = crate::error::ErrorResponse),
        (status = 404, description = "No schedule for this device", body = crate::error::ErrorResponse)
    )
)]
pub async fn replace_schedule(
    State(state): State<AppState>,
    _key: ApiKey,
    Path(device_name): Path<String>,
    ApiJson(request): ApiJson<ReplaceScheduleRequest>,
) -> AppResult<Json<ScheduleResponse>> {
    let schedule = state.services.schedules.replace(&device_name, request).await?;
    Ok(Json(schedule))
}

/// List all schedules
#[utoipa::path(
    get,
    path = "/schedules",
    tag = "schedules",
    security(("api_key" = [])),
    responses(
        (status = 200, description = "All schedules", body = Vec<ScheduleResponse>)
    )
)]
pub async fn list_schedules(
    State(state): State<AppState>,
    _key: ApiKey,
) -> AppResult<Json<Vec<ScheduleResponse>>> {
    let schedules = state.services.schedules.list().await?;
    Ok(Json(schedules))
}

/// List the schedules of devices working on a weekday
#[utoipa::path(
    get,
    path = "/schedules/by-day/{day}",
    tag = "schedules",
    security(("api_key" = [])),
    params(("day" = String, Path, description = "Weekday, e.g. monday")),
    responses(
        (status = 200, description = "Schedules active on that day", body = Vec<ScheduleResponse>),
        (status = 400, description = "Unknown weekday", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_schedules_by_day(
    State(state): State<AppState>,
    _key: ApiKey,
    Path(day): Path<String>,
) -> AppResult<Json<Vec<ScheduleResponse>>> {
    let schedules = state.services.schedules.by_day(&day).await?;
    Ok(Json(schedules))
}

/// Get the schedule of a device
#[utoipa::path(
    get,
    path = "/schedules/{device_name}",
    tag = "schedules",
    security(("api_key" = [])),
    params(("device_name" = String, Path, description = "Device name")),
    responses(
        (status = 200, description = "Schedule", body = ScheduleResponse),
        (status = 404, description = "No schedule for this device", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_schedule(
    State(state): State<AppState>,
    _key: ApiKey,
    Path(device_name): Path<String>,
) -> AppResult<Json<ScheduleResponse>> {
    let schedule = state.services.schedules.get(&device_name).await?;
    Ok(Json(schedule))
}

/// Delete the schedule of a device
#[utoipa::path(
    delete,
    path = "/schedules/{device_name}",
    tag = "schedules",
    security(("api_key" = [])),
    params(("device_name" = String, Path, description = "Device name")),
    responses(
        (status = 200, description = "Schedule deleted", body = ScheduleDeleteResponse),
        (status = 404, description = "No schedule for this device", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_schedule(
    State(state): State<AppState>,
    _key: ApiKey,
    Path(device_name): Path<String>,
) -> AppResult<Json<ScheduleDeleteResponse>> {
    let deleted = state.services.schedules.delete(&device_name).await?;
    Ok(Json(deleted))
}
