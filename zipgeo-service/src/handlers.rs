//! HTTP request handlers for the zipcode lookup service.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use zipgeo::{ErrorKind, ZipGeo, ZipGeoError};

use crate::AppState;

/// Zipcode lookup request, as a query string or JSON body.
#[derive(Debug, Deserialize, Serialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ZipGeoRequest {
    /// US zipcode, e.g. "30019". Must be a base-10 integer; leading zeros
    /// are significant.
    pub zipcode: String,
}

/// Successful lookup response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ZipGeoResponse {
    /// Zipcode as an integer.
    pub zipcode: i64,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Service version.
    pub version: String,
}

impl From<ZipGeo> for ZipGeoResponse {
    fn from(geo: ZipGeo) -> Self {
        Self {
            zipcode: geo.zipcode,
            latitude: geo.latitude,
            longitude: geo.longitude,
            version: geo.version,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
    /// Error kind, e.g. "not_found".
    pub kind: String,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Get coordinates for a zipcode.
///
/// # Returns
///
/// - `200 OK` with coordinates on success
/// - `400 Bad Request` if the zipcode is not an integer
/// - `404 Not Found` if the dataset has no record for the zipcode
/// - `500 Internal Server Error` on read failures or corrupt records
/// - `503 Service Unavailable` if the dataset cannot be opened
#[utoipa::path(
    get,
    path = "/zipgeo",
    tag = "zipgeo",
    params(ZipGeoRequest),
    responses(
        (status = 200, description = "Coordinates found", body = ZipGeoResponse),
        (status = 400, description = "Zipcode is not an integer", body = ErrorResponse),
        (status = 404, description = "Unknown zipcode", body = ErrorResponse),
        (status = 500, description = "Read failure or corrupt record", body = ErrorResponse),
        (status = 503, description = "Dataset unavailable", body = ErrorResponse)
    )
)]
#[axum::debug_handler]
pub async fn get_zipgeo(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ZipGeoRequest>,
) -> Response {
    resolve(state, query.zipcode).await
}

/// Get coordinates for a zipcode given in a JSON body.
///
/// Same semantics as `GET /zipgeo`.
#[utoipa::path(
    post,
    path = "/zipgeo",
    tag = "zipgeo",
    request_body = ZipGeoRequest,
    responses(
        (status = 200, description = "Coordinates found", body = ZipGeoResponse),
        (status = 400, description = "Zipcode is not an integer", body = ErrorResponse),
        (status = 404, description = "Unknown zipcode", body = ErrorResponse),
        (status = 500, description = "Read failure or corrupt record", body = ErrorResponse),
        (status = 503, description = "Dataset unavailable", body = ErrorResponse)
    )
)]
pub async fn post_zipgeo(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ZipGeoRequest>,
) -> Response {
    resolve(state, request.zipcode).await
}

/// Run the lookup on the blocking pool and stamp the version on success.
async fn resolve(state: Arc<AppState>, zipcode: String) -> Response {
    tracing::debug!(zipcode = %zipcode, "Zipcode query");

    let task_state = Arc::clone(&state);
    let task_zipcode = zipcode.clone();
    let result =
        tokio::task::spawn_blocking(move || task_state.zipgeo_service.resolve(&task_zipcode))
            .await;

    match result {
        Ok(Ok(geo)) => {
            let geo = geo.with_version(state.version.clone());
            (StatusCode::OK, Json(ZipGeoResponse::from(geo))).into_response()
        }
        Ok(Err(e)) => error_response(e),
        Err(e) => {
            tracing::error!(zipcode = %zipcode, error = %e, "Lookup task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "lookup task failed".to_string(),
                    kind: "internal".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// HTTP status for each lookup error kind.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::DatasetUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::LookupFailed | ErrorKind::MalformedRecord => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Create an error response for lookup failures.
fn error_response(e: ZipGeoError) -> Response {
    let kind = e.kind();
    (
        status_for(kind),
        Json(ErrorResponse {
            error: e.to_string(),
            kind: kind.as_str().to_string(),
        }),
    )
        .into_response()
}

/// Health check endpoint.
///
/// Returns service status and version.
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses((status = 200, description = "Service is healthy", body = HealthResponse))
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
    })
}
