use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use zipgeo::{DatasetSource, ZipGeoService, ZipGeoServiceBuilder};

/// Counts of resolved and failed rows.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub resolved: u64,
    pub failed: u64,
}

pub fn run(
    dataset: Option<PathBuf>,
    input: PathBuf,
    output: Option<PathBuf>,
    zip_col: String,
) -> Result<()> {
    let path = super::dataset_path(dataset)?;

    // Every row hits the same snapshot, so load it once
    let service = ZipGeoServiceBuilder::new(&path)
        .preload(true)
        .build()
        .context("Failed to load dataset")?;

    let output_path = output.unwrap_or_else(|| default_output_path(&input));
    let summary = process_csv(&service, &input, &output_path, &zip_col)?;

    println!(
        "Resolved {} rows, {} failed. Output written to: {}",
        summary.resolved,
        summary.failed,
        output_path.display()
    );
    Ok(())
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{}_geo.csv", stem))
}

fn process_csv<S: DatasetSource>(
    service: &ZipGeoService<S>,
    input: &Path,
    output_path: &Path,
    zip_col: &str,
) -> Result<BatchSummary> {
    let file = File::open(input).context("Failed to open input file")?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    // Find column index
    let headers = reader.headers()?.clone();
    let zip_idx = headers
        .iter()
        .position(|h| h == zip_col)
        .with_context(|| format!("Column '{}' not found in CSV", zip_col))?;

    // Collect records for progress bar
    let records: Vec<_> = reader.records().collect::<Result<_, _>>()?;
    let total = records.len() as u64;

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )?
            .progress_chars("#>-"),
    );

    let output_file = File::create(output_path).context("Failed to create output file")?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(output_file));

    // Write header
    let mut new_headers: Vec<&str> = headers.iter().collect();
    new_headers.extend(["latitude", "longitude", "error"]);
    writer.write_record(&new_headers)?;

    let mut summary = BatchSummary::default();
    for record in records {
        let zipcode = record.get(zip_idx).context("Missing zipcode")?;

        let (latitude, longitude, error) = match service.resolve(zipcode) {
            Ok(geo) => {
                summary.resolved += 1;
                (geo.latitude.to_string(), geo.longitude.to_string(), "")
            }
            Err(e) => {
                summary.failed += 1;
                (String::new(), String::new(), e.kind().as_str())
            }
        };

        let mut new_record: Vec<&str> = record.iter().collect();
        new_record.extend([latitude.as_str(), longitude.as_str(), error]);
        writer.write_record(&new_record)?;

        pb.inc(1);
    }

    pb.finish_with_message("done");
    writer.flush()?;

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use zipgeo::{MemoryDataset, SharedSource};

    fn service() -> ZipGeoService<SharedSource> {
        ZipGeoService::new(SharedSource::new(MemoryDataset::from_entries([
            ("zip:30019", "33.9526,-83.7479"),
            ("zip:00501", "40.8154,-73.0451"),
            ("zip:99998", "33.9"),
        ])))
    }

    #[test]
    fn test_process_csv() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("stores.csv");
        std::fs::write(
            &input,
            "name,zipcode\nDacula,30019\nHoltsville,00501\nNowhere,12345\nBad,abc\nBroken,99998\n",
        )
        .unwrap();
        let output = default_output_path(&input);

        let summary = process_csv(&service(), &input, &output, "zipcode").unwrap();
        assert_eq!(
            summary,
            BatchSummary {
                resolved: 2,
                failed: 3
            }
        );

        let written = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines[0], "name,zipcode,latitude,longitude,error");
        assert_eq!(lines[1], "Dacula,30019,33.9526,-83.7479,");
        assert_eq!(lines[2], "Holtsville,00501,40.8154,-73.0451,");
        assert_eq!(lines[3], "Nowhere,12345,,,not_found");
        assert_eq!(lines[4], "Bad,abc,,,invalid_input");
        assert_eq!(lines[5], "Broken,99998,,,malformed_record");
    }

    #[test]
    fn test_missing_column() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("stores.csv");
        std::fs::write(&input, "name,zip\nDacula,30019\n").unwrap();

        let err = process_csv(&service(), &input, &temp_dir.path().join("out.csv"), "zipcode")
            .unwrap_err();
        assert!(err.to_string().contains("zipcode"));
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("/tmp/stores.csv")),
            PathBuf::from("/tmp/stores_geo.csv")
        );
    }
}
