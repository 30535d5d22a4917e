//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{health, schedules};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Shifts API",
        version = "1.0.0",
        description = "Weekly work schedules of devices",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Schedules
        schedules::upsert_schedule,
        schedules::replace_schedule,
        schedules::list_schedules,
        schedules::list_schedules_by_day,
        schedules::get_schedule,
        schedules::delete_schedule,
    ),
    components(
        schemas(
            // Schedules
            crate::codec::wire::UpsertScheduleRequest,
            crate::codec::wire::SchedulePayload,
            crate::codec::wire::ReplaceScheduleRequest,
            crate::codec::wire::ScheduleResponse,
            crate::codec::wire::ScheduleDeleteResponse,
            crate::codec::wire::DaySchedulePayload,
            crate::codec::wire::IntervalPayload,
            crate::codec::wire::BreakPayload,
            crate::codec::wire::MetadataPayload,
            crate::models::WeekDay,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "schedules", description = "Device schedule management")
    )
)]
pub struct ApiDoc;

/// Declares the `X-API-Key` header scheme used by the schedule routes
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-API-Key"))),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_schedule_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/schedules"));
        assert!(doc.paths.paths.contains_key("/schedules/{device_name}"));
        assert!(doc.paths.paths.contains_key("/schedules/by-day/{day}"));

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("api_key"));
    }
}
