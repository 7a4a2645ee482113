//! Zipcode coordinate records.
//!
//! This module provides [`ZipGeo`], the lookup result, and [`decode_lat_long`]
//! for turning a stored `"<lat>,<lon>"` value into coordinates.

use crate::error::RecordField;

/// A zipcode resolved to latitude and longitude.
///
/// With the `serde` feature enabled this serializes with the field names
/// `zipcode`, `latitude`, `longitude` and `version`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZipGeo {
    /// US zipcode, as parsed from the request.
    pub zipcode: i64,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Service version. Left empty by the lookup; filled in by the caller.
    pub version: String,
}

impl ZipGeo {
    /// Returns this result stamped with `version`.
    ///
    /// # Example
    ///
    /// ```
    /// use zipgeo::ZipGeo;
    ///
    /// let geo = ZipGeo { zipcode: 30019, latitude: 33.9526, longitude: -83.7479, version: String::new() };
    /// assert_eq!(geo.with_version("1.2.0.abc123").version, "1.2.0.abc123");
    /// ```
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }
}

/// Decode a stored `"<lat>,<lon>"` value.
///
/// The value must split on `,` into exactly two parts, each a float. No
/// whitespace trimming is done. A number too large for `f64` is rejected;
/// only a literal `inf`/`infinity` decodes to an infinite coordinate.
///
/// # Errors
///
/// Returns the [`RecordField`] that failed: [`RecordField::Layout`] when the
/// value does not have exactly two fields, otherwise the field that is not
/// a valid float.
///
/// # Examples
///
/// ```
/// use zipgeo::record::decode_lat_long;
/// use zipgeo::RecordField;
///
/// assert_eq!(decode_lat_long("33.9526,-83.7479"), Ok((33.9526, -83.7479)));
/// assert_eq!(decode_lat_long("33.9"), Err(RecordField::Layout));
/// assert_eq!(decode_lat_long("x,1"), Err(RecordField::Latitude));
/// ```
pub fn decode_lat_long(value: &str) -> std::result::Result<(f64, f64), RecordField> {
    let mut fields = value.split(',');
    let (lat, lon) = match (fields.next(), fields.next(), fields.next()) {
        (Some(lat), Some(lon), None) => (lat, lon),
        _ => return Err(RecordField::Layout),
    };

    let latitude = parse_coordinate(lat, RecordField::Latitude)?;
    let longitude = parse_coordinate(lon, RecordField::Longitude)?;

    Ok((latitude, longitude))
}

fn parse_coordinate(text: &str, field: RecordField) -> std::result::Result<f64, RecordField> {
    let value: f64 = text.parse().map_err(|_| field)?;
    // Out-of-range literals such as `1e400` parse to infinity
    if value.is_infinite() && !is_infinity_literal(text) {
        return Err(field);
    }
    Ok(value)
}

fn is_infinity_literal(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_valid() {
        assert_eq!(decode_lat_long("33.94,-83.99"), Ok((33.94, -83.99)));
        assert_eq!(decode_lat_long("0,0"), Ok((0.0, 0.0)));
        assert_eq!(decode_lat_long("-14.27,-170.7"), Ok((-14.27, -170.7)));
    }

    #[test]
    fn test_decode_wrong_field_count() {
        assert_eq!(decode_lat_long(""), Err(RecordField::Layout));
        assert_eq!(decode_lat_long("33.9"), Err(RecordField::Layout));
        assert_eq!(decode_lat_long("1,2,3"), Err(RecordField::Layout));
        assert_eq!(decode_lat_long("1,2,"), Err(RecordField::Layout));
    }

    #[test]
    fn test_decode_bad_numbers() {
        assert_eq!(
            decode_lat_long("not-a-number,5.0"),
            Err(RecordField::Latitude)
        );
        assert_eq!(decode_lat_long("5.0,"), Err(RecordField::Longitude));
        // Whitespace is not trimmed
        assert_eq!(decode_lat_long("5.0, 6.0"), Err(RecordField::Longitude));
        // Out of f64 range
        assert_eq!(decode_lat_long("1e400,5"), Err(RecordField::Latitude));
        assert_eq!(decode_lat_long("5,-1e400"), Err(RecordField::Longitude));
    }

    #[test]
    fn test_decode_infinity_literal() {
        assert_eq!(
            decode_lat_long("inf,-Infinity"),
            Ok((f64::INFINITY, f64::NEG_INFINITY))
        );
    }

    #[test]
    fn test_default_is_blank() {
        let geo = ZipGeo::default();
        assert_eq!(geo.zipcode, 0);
        assert!(geo.version.is_empty());
    }
}
