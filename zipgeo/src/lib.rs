//! # zipgeo - Zipcode Coordinate Lookup
//!
//! Resolves US zipcodes to latitude/longitude by exact-key lookup in a
//! read-only, precomputed dataset.
//!
//! ## Features
//!
//! - **Exact**: one key, one record; no fuzzy matching
//! - **Read-only**: the dataset is never written
//! - **Isolated**: every lookup opens its own dataset handle
//! - **Typed errors**: callers branch on [`ErrorKind`], not message text
//!
//! ## Quick Start
//!
//! ```ignore
//! use zipgeo::ZipGeoServiceBuilder;
//!
//! let service = ZipGeoServiceBuilder::new("/data/zipgeo.db").build()?;
//! let geo = service.resolve("30019")?;
//! println!("{}, {}", geo.latitude, geo.longitude); // 33.9526, -83.7479
//! ```
//!
//! ## Dataset Format
//!
//! Records are stored under `zip:<zipcode>` with a `"<lat>,<lon>"` value, in
//! a command-log snapshot file (see [`snapshot`]). The zipcode part of the
//! key is the string exactly as requested, so `"00501"` and `"501"` are
//! different records.

pub mod dataset;
pub mod error;
pub mod key;
pub mod record;
pub mod service;
pub mod snapshot;
pub mod version;

// Re-export main types at crate root for convenience
pub use dataset::{Dataset, DatasetSource, MemoryDataset, SharedSource};
pub use error::{ConfigError, DatasetError, ErrorKind, RecordField, Result, ZipGeoError};
pub use record::ZipGeo;
pub use service::{LookupObserver, NoopObserver, ZipGeoService, ZipGeoServiceBuilder};
pub use snapshot::SnapshotSource;
