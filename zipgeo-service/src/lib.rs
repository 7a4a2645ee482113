//! Zipgeo Service Library
//!
//! HTTP handlers, router and types for the zipcode lookup service.
//! This library is used by both the zipgeo-service binary and integration tests.

pub mod handlers;
pub mod observer;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use zipgeo::{SnapshotSource, ZipGeoService};

/// Application state shared across handlers.
pub struct AppState {
    /// Lookup service.
    pub zipgeo_service: ZipGeoService<SnapshotSource>,
    /// Version stamped on every response.
    pub version: String,
}

impl AppState {
    /// Wrap a lookup service, stamping responses with this build's version.
    pub fn new(zipgeo_service: ZipGeoService<SnapshotSource>) -> Self {
        Self {
            zipgeo_service,
            version: zipgeo::version::service_version(),
        }
    }
}

/// OpenAPI documentation for the zipgeo service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Zipgeo Service",
        version = "0.1.0",
        description = "Resolve US zipcodes to latitude/longitude.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    paths(
        handlers::get_zipgeo,
        handlers::post_zipgeo,
        handlers::health_check,
    ),
    components(
        schemas(
            handlers::ZipGeoRequest,
            handlers::ZipGeoResponse,
            handlers::ErrorResponse,
            handlers::HealthResponse,
        )
    ),
    tags(
        (name = "zipgeo", description = "Zipcode lookup endpoints"),
        (name = "system", description = "System and health endpoints")
    )
)]
pub struct ApiDoc;

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route(
            "/zipgeo",
            get(handlers::get_zipgeo).post(handlers::post_zipgeo),
        )
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

// Re-export commonly used types for convenience
pub use handlers::{ErrorResponse, HealthResponse, ZipGeoRequest, ZipGeoResponse};
pub use observer::TracingObserver;
