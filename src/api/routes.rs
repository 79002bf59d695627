//! Application route configuration.

use std::time::Duration;

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{auth_routes, profile_routes, user_routes};
use super::openapi::ApiDoc;
use super::AppState;
use crate::config::{API_PREFIX, REQUEST_TIMEOUT_SECONDS};

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .merge(auth_routes())
        .merge(user_routes())
        .merge(profile_routes());

    Router::new()
        .nest(API_PREFIX, api)
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Global middleware
        .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECONDS)))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    services: ServiceHealth,
}

/// Individual service health status
#[derive(Serialize)]
struct ServiceHealth {
    database: ServiceStatus,
}

/// Service status
#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
}

/// Health check endpoint with database connectivity check
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let healthy = match state.database.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            false
        }
    };

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" },
        services: ServiceHealth {
            database: ServiceStatus {
                status: if healthy { "healthy" } else { "unhealthy" },
            },
        },
    };

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
