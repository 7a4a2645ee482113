//! Read-only key-value dataset access.
//!
//! A [`DatasetSource`] hands out a [`Dataset`] handle for each lookup. The
//! handle is released when it goes out of scope, on every exit path.
//!
//! [`MemoryDataset`] is the in-memory backend. It is built from entries or by
//! replaying a snapshot (see [`crate::snapshot`]), and is never mutated after
//! construction.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::DatasetError;

/// Read-only access to `key -> value` records.
pub trait Dataset {
    /// Exact-key read. `Ok(None)` means the key is not present.
    fn get(&self, key: &str) -> Result<Option<String>, DatasetError>;
}

impl<D: Dataset + ?Sized> Dataset for Arc<D> {
    fn get(&self, key: &str) -> Result<Option<String>, DatasetError> {
        (**self).get(key)
    }
}

/// Opens dataset handles.
///
/// Sources are shared across concurrent lookups, so they must be
/// `Send + Sync`. Each call to [`open`](DatasetSource::open) returns a handle
/// owned by that lookup alone.
pub trait DatasetSource: Send + Sync {
    /// Handle type returned by [`open`](DatasetSource::open).
    type Dataset: Dataset;

    /// Open or attach to the dataset.
    fn open(&self) -> Result<Self::Dataset, DatasetError>;

    /// Human-readable description for logs.
    fn describe(&self) -> String;
}

/// An immutable, `HashMap`-backed dataset.
///
/// # Example
///
/// ```
/// use zipgeo::{Dataset, MemoryDataset};
///
/// let dataset = MemoryDataset::from_entries([("zip:30019", "33.9526,-83.7479")]);
/// assert_eq!(dataset.get("zip:30019").unwrap().as_deref(), Some("33.9526,-83.7479"));
/// assert_eq!(dataset.get("zip:12345").unwrap(), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryDataset {
    entries: HashMap<String, String>,
}

impl MemoryDataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dataset from `(key, value)` pairs. Later pairs win.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub(crate) fn from_map(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the dataset holds no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all records in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Dataset for MemoryDataset {
    fn get(&self, key: &str) -> Result<Option<String>, DatasetError> {
        Ok(self.entries.get(key).cloned())
    }
}

/// A source that hands out a shared, already-loaded dataset.
///
/// Useful for embedding and tests; the production file-backed source is
/// [`SnapshotSource`](crate::snapshot::SnapshotSource).
#[derive(Debug, Clone)]
pub struct SharedSource {
    dataset: Arc<MemoryDataset>,
}

impl SharedSource {
    /// Wrap a loaded dataset.
    pub fn new(dataset: MemoryDataset) -> Self {
        Self {
            dataset: Arc::new(dataset),
        }
    }

    /// Returns the underlying dataset.
    pub fn dataset(&self) -> &MemoryDataset {
        &self.dataset
    }
}

impl DatasetSource for SharedSource {
    type Dataset = Arc<MemoryDataset>;

    fn open(&self) -> Result<Self::Dataset, DatasetError> {
        Ok(Arc::clone(&self.dataset))
    }

    fn describe(&self) -> String {
        format!("in-memory dataset ({} records)", self.dataset.len())
    }
}
