use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::organization::count_info_files;
use super::{now_rfc3339, write_heading, write_row};

pub const BATCH_REPORT_FILE: &str = "batch_processing_report.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStatistics {
    pub total_extracted_movies: usize,
    pub total_organized_movies: usize,
    pub extraction_sources: Vec<String>,
    pub organization_types: Vec<String>,
}

/// Summary of a whole extract-and-organize run, built from what is on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub processing_date: String,
    pub config_path: String,
    pub output_path: String,
    /// Metadata file name to the number of movies in it.
    pub extracted_files: BTreeMap<String, usize>,
    /// Organized subdirectory to the number of placements below it.
    pub organized_files: BTreeMap<String, usize>,
    pub statistics: BatchStatistics,
}

impl BatchReport {
    pub fn build(output_directory: &Path, config_directory: &Path) -> Self {
        let extracted_files = count_metadata_files(&output_directory.join("metadata"));
        let organized_files = count_organized(&output_directory.join("organized"));

        let statistics = BatchStatistics {
            total_extracted_movies: extracted_files.values().sum(),
            total_organized_movies: organized_files.values().sum(),
            extraction_sources: extracted_files.keys().cloned().collect(),
            organization_types: organized_files.keys().cloned().collect(),
        };

        Self {
            processing_date: now_rfc3339(),
            config_path: config_directory.display().to_string(),
            output_path: output_directory.display().to_string(),
            extracted_files,
            organized_files,
            statistics,
        }
    }
}

fn count_metadata_files(metadata_directory: &Path) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    let Ok(entries) = std::fs::read_dir(metadata_directory) else {
        return counts;
    };

    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let parsed = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|content| {
                serde_json::from_str::<Vec<serde_json::Value>>(&content).map_err(|e| e.to_string())
            });
        match parsed {
            Ok(entries) => {
                counts.insert(entry.file_name().to_string_lossy().into_owned(), entries.len());
            }
            Err(e) => warn!("Not counting {}: {}", path.display(), e),
        }
    }

    counts
}

fn count_organized(organized_directory: &Path) -> BTreeMap<String, usize> {
    let Ok(entries) = std::fs::read_dir(organized_directory) else {
        return BTreeMap::new();
    };

    entries
        .filter_map(|e| e.ok())
        .filter(|entry| entry.path().is_dir())
        .map(|entry| {
            (
                entry.file_name().to_string_lossy().into_owned(),
                count_info_files(&entry.path()),
            )
        })
        .collect()
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_heading(f, "BATCH SUMMARY")?;
        writeln!(f, "Processed at: {}", self.processing_date)?;
        write_row(f, "Extracted movies", self.statistics.total_extracted_movies)?;
        write_row(f, "Organized placements", self.statistics.total_organized_movies)?;
        writeln!(
            f,
            "Sources: {}",
            self.statistics.extraction_sources.join(", ")
        )?;
        writeln!(
            f,
            "Organization types: {}",
            self.statistics.organization_types.join(", ")
        )
    }
}
