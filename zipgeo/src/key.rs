//! Storage key utilities.
//!
//! Every record lives under a composite key built from an entity-type prefix
//! and one or more parts, joined with `:`.
//!
//! # Key Format
//!
//! `{entity_type}:{part}[:{part}...]`
//!
//! Zipcode records use the `zip` entity type, so the coordinates for
//! `30019` live under `zip:30019`.

/// Entity type of zipcode coordinate records.
pub const ZIP_ENTITY: &str = "zip";

/// Separator between the entity type and the key parts.
pub const KEY_SEPARATOR: char = ':';

/// Build a storage key from an entity type and its parts.
///
/// # Examples
///
/// ```
/// use zipgeo::key::get_key;
///
/// assert_eq!(get_key("zip", &["30019"]), "zip:30019");
/// assert_eq!(get_key("zip", &["00501"]), "zip:00501");
/// assert_eq!(get_key("county", &["GA", "gwinnett"]), "county:GA:gwinnett");
/// assert_eq!(get_key("zip", &[]), "zip");
/// ```
pub fn get_key(entity_type: &str, parts: &[&str]) -> String {
    let mut key = String::with_capacity(
        entity_type.len() + parts.iter().map(|p| p.len() + 1).sum::<usize>(),
    );
    key.push_str(entity_type);
    for part in parts {
        key.push(KEY_SEPARATOR);
        key.push_str(part);
    }
    key
}

/// Build the key holding the coordinates for `zipcode`.
///
/// The zipcode is used verbatim, so leading zeros are preserved.
///
/// # Examples
///
/// ```
/// use zipgeo::key::zip_key;
///
/// assert_eq!(zip_key("00501"), "zip:00501");
/// ```
pub fn zip_key(zipcode: &str) -> String {
    get_key(ZIP_ENTITY, &[zipcode])
}

/// Extract the entity type of a key.
///
/// Keys without a separator are their own entity type.
///
/// # Examples
///
/// ```
/// use zipgeo::key::entity_type;
///
/// assert_eq!(entity_type("zip:30019"), "zip");
/// assert_eq!(entity_type("county:GA:gwinnett"), "county");
/// assert_eq!(entity_type("version"), "version");
/// ```
pub fn entity_type(key: &str) -> &str {
    key.split_once(KEY_SEPARATOR)
        .map(|(prefix, _)| prefix)
        .unwrap_or(key)
}
