//! Zipcode lookup service.
//!
//! This module provides [`ZipGeoService`], which resolves a zipcode string to
//! a [`ZipGeo`] by reading the `zip:<zipcode>` record from a dataset.
//!
//! ```ignore
//! use zipgeo::ZipGeoServiceBuilder;
//!
//! let service = ZipGeoServiceBuilder::new("/data/zipgeo.db").build()?;
//! let geo = service.resolve("30019")?;
//! println!("{}, {}", geo.latitude, geo.longitude);
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::dataset::{Dataset, DatasetSource};
use crate::error::{ConfigError, Result, ZipGeoError};
use crate::key::zip_key;
use crate::record::{decode_lat_long, ZipGeo};
use crate::snapshot::SnapshotSource;

/// Environment variable holding the snapshot path.
pub const DATASET_ENV: &str = "ZIPGEO_DATASET";

/// Environment variable enabling preloading.
pub const PRELOAD_ENV: &str = "ZIPGEO_PRELOAD";

/// Hook notified of every resolve outcome.
///
/// Observers annotate lookups (tracing, metrics, request metadata); they
/// cannot change the result. Both methods default to doing nothing.
pub trait LookupObserver: Send + Sync {
    /// Called after a successful resolve.
    fn on_resolved(&self, _zipcode: &str, _geo: &ZipGeo) {}

    /// Called after a failed resolve.
    fn on_failed(&self, _zipcode: &str, _error: &ZipGeoError) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl LookupObserver for NoopObserver {}

/// Zipcode to latitude/longitude lookup over a read-only dataset.
///
/// Every call to [`resolve`](Self::resolve) opens its own dataset handle and
/// releases it before returning. The service holds no mutable state, so
/// concurrent resolves need no locking.
///
/// # Example
///
/// ```
/// use zipgeo::{MemoryDataset, SharedSource, ZipGeoService};
///
/// let dataset = MemoryDataset::from_entries([("zip:30019", "33.9526,-83.7479")]);
/// let service = ZipGeoService::new(SharedSource::new(dataset));
///
/// let geo = service.resolve("30019").unwrap();
/// assert_eq!(geo.zipcode, 30019);
/// assert_eq!(geo.latitude, 33.9526);
/// assert_eq!(geo.longitude, -83.7479);
/// assert_eq!(geo.version, "");
/// ```
pub struct ZipGeoService<S> {
    source: S,
    observer: Arc<dyn LookupObserver>,
}

impl<S: DatasetSource> ZipGeoService<S> {
    /// Create a service reading from `source`, with no observer.
    pub fn new(source: S) -> Self {
        Self {
            source,
            observer: Arc::new(NoopObserver),
        }
    }

    /// Replace the observer.
    pub fn with_observer(mut self, observer: Arc<dyn LookupObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Resolve `zipcode` to its coordinates.
    ///
    /// The zipcode must parse as a base-10 integer; it is not trimmed. The
    /// dataset key is built from the string as given, so `"00501"` reads
    /// `zip:00501` while the result carries `zipcode: 501`.
    ///
    /// The returned `version` is empty; callers stamp it.
    ///
    /// # Errors
    ///
    /// - [`ZipGeoError::InvalidInput`] - not an integer (the dataset is not opened)
    /// - [`ZipGeoError::DatasetUnavailable`] - the dataset cannot be opened
    /// - [`ZipGeoError::NotFound`] - no record for the zipcode
    /// - [`ZipGeoError::LookupFailed`] - the read failed
    /// - [`ZipGeoError::MalformedRecord`] - the record is not a `<lat>,<lon>` pair
    pub fn resolve(&self, zipcode: &str) -> Result<ZipGeo> {
        let result = self.lookup(zipcode);
        match &result {
            Ok(geo) => self.observer.on_resolved(zipcode, geo),
            Err(e) => self.observer.on_failed(zipcode, e),
        }
        result
    }

    fn lookup(&self, zipcode: &str) -> Result<ZipGeo> {
        let zip: i64 = zipcode
            .parse()
            .map_err(|source| ZipGeoError::InvalidInput {
                zipcode: zipcode.to_string(),
                source,
            })?;

        let dataset = self
            .source
            .open()
            .map_err(|source| ZipGeoError::DatasetUnavailable { source })?;

        let key = zip_key(zipcode);
        let value = match dataset.get(&key) {
            Ok(Some(value)) => value,
            Ok(None) => {
                return Err(ZipGeoError::NotFound {
                    zipcode: zipcode.to_string(),
                })
            }
            Err(source) => return Err(ZipGeoError::LookupFailed { key, source }),
        };

        let (latitude, longitude) =
            decode_lat_long(&value).map_err(|field| ZipGeoError::MalformedRecord {
                zipcode: zipcode.to_string(),
                field,
                value: value.clone(),
            })?;

        Ok(ZipGeo {
            zipcode: zip,
            latitude,
            longitude,
            version: String::new(),
        })
    }

    /// Returns the dataset source.
    pub fn source(&self) -> &S {
        &self.source
    }
}

impl ZipGeoService<SnapshotSource> {
    /// Create a builder for a snapshot-file backed service.
    pub fn builder<P: AsRef<Path>>(dataset_path: P) -> ZipGeoServiceBuilder {
        ZipGeoServiceBuilder::new(dataset_path)
    }
}

/// Builder for a [`ZipGeoService`] backed by a snapshot file.
///
/// # Example
///
/// ```ignore
/// use zipgeo::ZipGeoServiceBuilder;
///
/// let service = ZipGeoServiceBuilder::new("/data/zipgeo.db")
///     .preload(true)
///     .build()?;
/// ```
pub struct ZipGeoServiceBuilder {
    dataset_path: PathBuf,
    preload: bool,
    observer: Option<Arc<dyn LookupObserver>>,
}

impl ZipGeoServiceBuilder {
    /// Create a new builder reading the snapshot at `dataset_path`.
    pub fn new<P: AsRef<Path>>(dataset_path: P) -> Self {
        Self {
            dataset_path: dataset_path.as_ref().to_path_buf(),
            preload: false,
            observer: None,
        }
    }

    /// Create a builder configured from environment variables.
    ///
    /// # Environment Variables
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `ZIPGEO_DATASET` | Path to the snapshot file | Required |
    /// | `ZIPGEO_PRELOAD` | `true`/`1` to load the snapshot once at build time | false |
    ///
    /// # Errors
    ///
    /// Returns an error if `ZIPGEO_DATASET` is not set or `ZIPGEO_PRELOAD`
    /// is not a boolean.
    pub fn from_env() -> std::result::Result<Self, ConfigError> {
        let dataset_path =
            std::env::var(DATASET_ENV).map_err(|_| ConfigError::MissingVar(DATASET_ENV))?;

        let preload = match std::env::var(PRELOAD_ENV) {
            Ok(value) => parse_bool(&value).ok_or(ConfigError::InvalidVar {
                name: PRELOAD_ENV,
                value,
            })?,
            Err(_) => false,
        };

        Ok(Self::new(dataset_path).preload(preload))
    }

    /// Set the snapshot path.
    pub fn dataset_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.dataset_path = path.as_ref().to_path_buf();
        self
    }

    /// Load the snapshot once at build time instead of on every lookup.
    ///
    /// Default is `false`.
    pub fn preload(mut self, preload: bool) -> Self {
        self.preload = preload;
        self
    }

    /// Set the lookup observer.
    pub fn observer(mut self, observer: Arc<dyn LookupObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Build the [`ZipGeoService`].
    ///
    /// # Errors
    ///
    /// Returns [`ZipGeoError::DatasetUnavailable`] if preloading is enabled and
    /// the snapshot cannot be loaded. Without preloading, a missing snapshot
    /// only surfaces on lookup.
    pub fn build(self) -> Result<ZipGeoService<SnapshotSource>> {
        let source = if self.preload {
            SnapshotSource::preloaded(&self.dataset_path)
                .map_err(|source| ZipGeoError::DatasetUnavailable { source })?
        } else {
            SnapshotSource::new(&self.dataset_path)
        };

        let service = ZipGeoService::new(source);
        Ok(match self.observer {
            Some(observer) => service.with_observer(observer),
            None => service,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
