//! Error types for the zipgeo library.

use std::fmt;
use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while resolving a zipcode.
#[derive(Error, Debug)]
pub enum ZipGeoError {
    /// The zipcode is not a base-10 integer.
    #[error("problem parsing the zipcode {zipcode:?}: {source}")]
    InvalidInput {
        zipcode: String,
        #[source]
        source: ParseIntError,
    },

    /// The dataset could not be opened or loaded.
    #[error("dataset unavailable: {source}")]
    DatasetUnavailable {
        #[source]
        source: DatasetError,
    },

    /// No record exists for the zipcode.
    #[error("no coordinates found for zipcode {zipcode}")]
    NotFound { zipcode: String },

    /// The read itself failed for a reason other than a missing key.
    #[error("problem reading key {key}: {source}")]
    LookupFailed {
        key: String,
        #[source]
        source: DatasetError,
    },

    /// The stored record does not hold a `<lat>,<lon>` pair.
    #[error("malformed record for zipcode {zipcode}: bad {field} in {value:?}")]
    MalformedRecord {
        zipcode: String,
        field: RecordField,
        value: String,
    },
}

impl ZipGeoError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ZipGeoError::InvalidInput { .. } => ErrorKind::InvalidInput,
            ZipGeoError::DatasetUnavailable { .. } => ErrorKind::DatasetUnavailable,
            ZipGeoError::NotFound { .. } => ErrorKind::NotFound,
            ZipGeoError::LookupFailed { .. } => ErrorKind::LookupFailed,
            ZipGeoError::MalformedRecord { .. } => ErrorKind::MalformedRecord,
        }
    }
}

/// Coarse classification of [`ZipGeoError`], for callers that branch on the
/// failure cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller supplied a zipcode that is not an integer.
    InvalidInput,
    /// Backing store could not be opened.
    DatasetUnavailable,
    /// Unknown zipcode.
    NotFound,
    /// Storage-layer read failure.
    LookupFailed,
    /// Data-integrity problem in the dataset.
    MalformedRecord,
}

impl ErrorKind {
    /// Stable snake_case name, used in API responses and CSV output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::DatasetUnavailable => "dataset_unavailable",
            ErrorKind::NotFound => "not_found",
            ErrorKind::LookupFailed => "lookup_failed",
            ErrorKind::MalformedRecord => "malformed_record",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The part of a `<lat>,<lon>` record that failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    /// The value did not split into exactly two comma-separated fields.
    Layout,
    /// The first field is not a float.
    Latitude,
    /// The second field is not a float.
    Longitude,
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecordField::Layout => "layout",
            RecordField::Latitude => "latitude",
            RecordField::Longitude => "longitude",
        })
    }
}

/// Errors raised by dataset backends.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// The snapshot file could not be opened or mapped.
    #[error("cannot open dataset {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot is not a valid command log.
    #[error("corrupt snapshot at byte {offset}: {reason}")]
    Corrupt { offset: usize, reason: String },

    /// Backend-specific failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Errors in environment-driven configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("{0} environment variable not set")]
    MissingVar(&'static str),

    /// A variable is set to a value that cannot be interpreted.
    #[error("invalid value {value:?} for {name}")]
    InvalidVar { name: &'static str, value: String },
}

/// Result type alias using [`ZipGeoError`].
pub type Result<T> = std::result::Result<T, ZipGeoError>;
