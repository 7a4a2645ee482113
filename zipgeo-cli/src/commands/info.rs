use anyhow::{bail, Context, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;
use zipgeo::key::{entity_type, ZIP_ENTITY};
use zipgeo::record::decode_lat_long;
use zipgeo::MemoryDataset;

/// Aggregate view of a loaded dataset.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DatasetSummary {
    pub entries: usize,
    pub by_entity: BTreeMap<String, usize>,
    pub malformed_zip_records: usize,
}

pub fn run(dataset: Option<PathBuf>) -> Result<()> {
    let path = super::dataset_path(dataset)?;

    if !path.exists() {
        bail!("Dataset not found: {}", path.display());
    }

    let metadata = std::fs::metadata(&path)?;
    let dataset = MemoryDataset::from_snapshot_file(&path).context("Failed to load dataset")?;
    let summary = summarize(&dataset);

    println!("Dataset: {}", path.display());
    println!("File size: {}", format_size(metadata.len()));
    println!();
    println!("Entries: {}", summary.entries);
    for (entity, count) in &summary.by_entity {
        println!("  {}: {}", entity, count);
    }

    if summary.malformed_zip_records > 0 {
        println!();
        println!(
            "Malformed {} records: {}",
            ZIP_ENTITY, summary.malformed_zip_records
        );
    }

    Ok(())
}

fn summarize(dataset: &MemoryDataset) -> DatasetSummary {
    let mut summary = DatasetSummary {
        entries: dataset.len(),
        ..Default::default()
    };

    for (key, value) in dataset.iter() {
        let entity = entity_type(key);
        *summary.by_entity.entry(entity.to_string()).or_default() += 1;

        if entity == ZIP_ENTITY && decode_lat_long(value).is_err() {
            summary.malformed_zip_records += 1;
        }
    }

    summary
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
