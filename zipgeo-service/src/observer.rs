//! Lookup observer that emits `tracing` events.

use zipgeo::{ErrorKind, LookupObserver, ZipGeo, ZipGeoError};

/// Logs every resolve outcome as a structured event.
///
/// Caller mistakes (bad input, unknown zipcode) are logged at `info`; dataset
/// problems at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl LookupObserver for TracingObserver {
    fn on_resolved(&self, zipcode: &str, geo: &ZipGeo) {
        tracing::info!(
            zipcode = zipcode,
            latitude = geo.latitude,
            longitude = geo.longitude,
            "Zipcode resolved"
        );
    }

    fn on_failed(&self, zipcode: &str, error: &ZipGeoError) {
        let kind = error.kind();
        match kind {
            ErrorKind::InvalidInput | ErrorKind::NotFound => {
                tracing::info!(zipcode = zipcode, kind = %kind, error = %error, "Zipcode lookup failed")
            }
            _ => {
                tracing::warn!(zipcode = zipcode, kind = %kind, error = %error, "Zipcode lookup failed")
            }
        }
    }
}
