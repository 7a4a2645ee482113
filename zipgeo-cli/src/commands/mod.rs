pub mod batch;
pub mod info;
pub mod lookup;

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Resolve the dataset path from `--dataset` or `ZIPGEO_DATASET`.
pub fn dataset_path(dataset: Option<PathBuf>) -> Result<PathBuf> {
    match dataset {
        Some(path) => Ok(path),
        None => std::env::var("ZIPGEO_DATASET").map(PathBuf::from).context(
            "ZIPGEO_DATASET environment variable not set. Use --dataset or set ZIPGEO_DATASET",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_path() {
        let orig = std::env::var("ZIPGEO_DATASET").ok();

        // Flag wins over the environment
        std::env::set_var("ZIPGEO_DATASET", "/from/env.db");
        assert_eq!(
            dataset_path(Some(PathBuf::from("/from/flag.db"))).unwrap(),
            PathBuf::from("/from/flag.db")
        );
        assert_eq!(dataset_path(None).unwrap(), PathBuf::from("/from/env.db"));

        std::env::remove_var("ZIPGEO_DATASET");
        let err = dataset_path(None).unwrap_err();
        assert!(err.to_string().contains("--dataset"));

        match orig {
            Some(v) => std::env::set_var("ZIPGEO_DATASET", v),
            None => std::env::remove_var("ZIPGEO_DATASET"),
        }
    }
}
