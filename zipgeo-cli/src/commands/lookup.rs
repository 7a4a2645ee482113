use anyhow::{Context, Result};
use std::path::PathBuf;
use zipgeo::{DatasetSource, ZipGeo, ZipGeoService, ZipGeoServiceBuilder};

pub fn run(dataset: Option<PathBuf>, zipcode: String, json: bool) -> Result<()> {
    let path = super::dataset_path(dataset)?;
    let service = ZipGeoServiceBuilder::new(&path)
        .build()
        .context("Failed to create zipgeo service")?;

    println!("{}", lookup(&service, &zipcode, json)?);
    Ok(())
}

/// Resolve `zipcode` and render the line printed for it.
fn lookup<S: DatasetSource>(
    service: &ZipGeoService<S>,
    zipcode: &str,
    json: bool,
) -> Result<String> {
    let geo = service
        .resolve(zipcode)
        .with_context(|| format!("Failed to look up zipcode {}", zipcode))?
        .with_version(zipgeo::version::service_version());

    format_result(&geo, json)
}

fn format_result(geo: &ZipGeo, json: bool) -> Result<String> {
    if json {
        Ok(serde_json::to_string(geo)?)
    } else {
        Ok(format!("{},{}", geo.latitude, geo.longitude))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zipgeo::{ErrorKind, MemoryDataset, SharedSource, ZipGeoError};

    fn service() -> ZipGeoService<SharedSource> {
        ZipGeoService::new(SharedSource::new(MemoryDataset::from_entries([
            ("zip:30019", "33.9526,-83.7479"),
            ("zip:99998", "33.9"),
        ])))
    }

    #[test]
    fn test_lookup_text() {
        assert_eq!(
            lookup(&service(), "30019", false).unwrap(),
            "33.9526,-83.7479"
        );
    }

    #[test]
    fn test_lookup_json_carries_version() {
        let line = lookup(&service(), "30019", true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();

        assert_eq!(value["zipcode"], 30019);
        assert_eq!(value["latitude"], 33.9526);
        assert_eq!(value["longitude"], -83.7479);
        assert_eq!(value["version"], zipgeo::version::service_version());
    }

    #[test]
    fn test_lookup_errors_keep_context() {
        let err = lookup(&service(), "12345", false).unwrap_err();
        assert!(err.to_string().contains("12345"));
        let cause = err.downcast_ref::<ZipGeoError>().unwrap();
        assert_eq!(cause.kind(), ErrorKind::NotFound);

        let err = lookup(&service(), "99998", true).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ZipGeoError>().map(ZipGeoError::kind),
            Some(ErrorKind::MalformedRecord)
        );

        let err = lookup(&service(), "abc", false).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ZipGeoError>().map(ZipGeoError::kind),
            Some(ErrorKind::InvalidInput)
        );
    }

    #[test]
    fn test_format_result() {
        let geo = ZipGeo {
            zipcode: 501,
            latitude: 40.8154,
            longitude: -73.0451,
            version: "1.0.abc".to_string(),
        };

        assert_eq!(format_result(&geo, false).unwrap(), "40.8154,-73.0451");
        assert_eq!(
            format_result(&geo, true).unwrap(),
            r#"{"zipcode":501,"latitude":40.8154,"longitude":-73.0451,"version":"1.0.abc"}"#
        );
    }
}
