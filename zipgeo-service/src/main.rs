//! Zipgeo Service - HTTP microservice for zipcode coordinate lookups.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `ZIPGEO_DATASET` | Path to the snapshot file | `zipgeo.db` |
//! | `ZIPGEO_PRELOAD` | Load the snapshot once at startup | false |
//! | `ZIPGEO_PORT` | HTTP server port | 8080 |
//! | `RUST_LOG` | Log level (e.g., "info", "debug") | "info" |
//!
//! ## Endpoints
//!
//! - `GET /zipgeo?zipcode=X` - Get coordinates for a zipcode
//! - `POST /zipgeo` - Same, with a `{"zipcode": "X"}` body
//! - `GET /health` - Health check
//! - `GET /docs` - OpenAPI documentation (Swagger UI)

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zipgeo::{ConfigError, DatasetSource, ZipGeoServiceBuilder};
use zipgeo_service::{router, AppState, TracingObserver};

/// Snapshot used when `ZIPGEO_DATASET` is not set.
const DEFAULT_DATASET: &str = "zipgeo.db";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zipgeo_service=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load port from environment (service-specific config)
    let port: u16 = std::env::var("ZIPGEO_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);

    // The library handles ZIPGEO_DATASET and ZIPGEO_PRELOAD
    let builder = match ZipGeoServiceBuilder::from_env() {
        Ok(builder) => builder,
        Err(ConfigError::MissingVar(var)) => {
            tracing::warn!(
                var = var,
                default = DEFAULT_DATASET,
                "Dataset path not set, using default"
            );
            ZipGeoServiceBuilder::new(DEFAULT_DATASET)
        }
        Err(e) => return Err(e.into()),
    };

    let zipgeo_service = builder.observer(Arc::new(TracingObserver)).build()?;
    let state = Arc::new(AppState::new(zipgeo_service));

    tracing::info!(
        dataset = %state.zipgeo_service.source().describe(),
        version = %state.version,
        port = port,
        "Starting zipgeo service"
    );

    let app = router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
