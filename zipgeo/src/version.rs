//! Service version stamp.
//!
//! The version is `<build_version>.<commit_id>`, both parts baked in at compile
//! time from `ZIPGEO_BUILD_VERSION` and `ZIPGEO_COMMIT_ID`. An unstamped build
//! reports `Unknown.`.

/// Build version, or `"Unknown"` if not set at compile time.
pub const BUILD_VERSION: &str = match option_env!("ZIPGEO_BUILD_VERSION") {
    Some(v) => v,
    None => "Unknown",
};

/// Commit identifier, or empty if not set at compile time.
pub const COMMIT_ID: &str = match option_env!("ZIPGEO_COMMIT_ID") {
    Some(v) => v,
    None => "",
};

/// Join a build version and commit id with `.`.
///
/// # Examples
///
/// ```
/// use zipgeo::version::format_version;
///
/// assert_eq!(format_version("1.4.0", "9f2c1e7"), "1.4.0.9f2c1e7");
/// assert_eq!(format_version("Unknown", ""), "Unknown.");
/// ```
pub fn format_version(build_version: &str, commit_id: &str) -> String {
    format!("{}.{}", build_version, commit_id)
}

/// The version stamp of this build.
pub fn service_version() -> String {
    format_version(BUILD_VERSION, COMMIT_ID)
}
