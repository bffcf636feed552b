use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::HarvestResult;

pub const REVIEWS_FILE: &str = "reviews.json";

/// Write the run result as pretty JSON into `dir`, creating it if needed.
pub fn write(dir: &Path, result: &HarvestResult) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let path = dir.join(REVIEWS_FILE);
    let contents = serde_json::to_string_pretty(result)?;
    fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ExtractionMode, RecordOutcome, ReviewRecord, SinkReport};

    #[test]
    fn result_is_written_as_readable_json() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested");
        let result = HarvestResult {
            url: "https://snappfood.ir/x".into(),
            timestamp: "2024-01-01T00:00:00Z".into(),
            mode: Some(ExtractionMode::Strict),
            items_found: 1,
            records: vec![ReviewRecord {
                title: "پیتزا".into(),
                author: "سارا".into(),
                rating: "5".into(),
                text: "عالی".into(),
                date: "امروز".into(),
            }],
            sinks: vec![SinkReport {
                sink: "wordpress".into(),
                outcomes: vec![RecordOutcome::Failed {
                    status: Some(500),
                    detail: "boom".into(),
                }],
            }],
        };

        let path = write(&out, &result).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("سارا"), "non-ASCII text should not be escaped");

        let back: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(back["mode"], "strict");
        assert_eq!(back["sinks"][0]["outcomes"][0]["outcome"], "failed");
        assert_eq!(back["sinks"][0]["outcomes"][0]["status"], 500);
    }
}
