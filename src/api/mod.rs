//! API handlers for the shifts REST endpoints

pub mod health;
pub mod openapi;
pub mod schedules;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Request},
    http::{request::Parts, HeaderName},
    routing::get,
    Json, Router,
};
use serde::de::DeserializeOwned;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, AppState};

/// Header carrying the shared API key
pub const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");

/// Extractor guarding routes behind the configured API key
pub struct ApiKey;

#[async_trait]
impl FromRequestParts<AppState> for ApiKey {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let expected = state
            .config
            .auth
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| AppError::Internal("API key is not configured".to_string()))?;

        let provided = parts
            .headers
            .get(&API_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing X-API-Key header".to_string()))?;

        if provided != expected {
            return Err(AppError::Authentication("Invalid API key".to_string()));
        }

        Ok(ApiKey)
    }
}

/// JSON body extractor answering malformed bodies with an `InvalidPayload` error
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::InvalidPayload(rejection.body_text()))?;
        Ok(ApiJson(value))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Schedules
        .route(
            "/schedules",
            get(schedules::list_schedules).post(schedules::upsert_schedule),
        )
        .route("/schedules/by-day/:day", get(schedules::list_schedules_by_day))
        .route(
            "/schedules/:device_name",
            get(schedules::get_schedule)
                .put(schedules::replace_schedule)
                .delete(schedules::delete_schedule),
        )
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CompressionLayer::new())
        .layer(cors)
}
