use std::collections::HashMap;
use std::path::PathBuf;

use crate::catalog::{MovieRecord, RawMovieRow};
use crate::error::RecordBuildError;
use crate::export::CopySummary;
use crate::report::ExtractionReport;
use crate::source::SourceSystem;

use super::error::PipelineWarning;

/// State of one source's extraction as it moves through the steps.
pub struct ExtractionContext {
    // Input
    pub system: SourceSystem,

    // Step 1 results
    pub rows: Vec<Result<RawMovieRow, RecordBuildError>>,
    pub genres: HashMap<String, Vec<String>>,

    // Step 2 result
    pub records: Vec<MovieRecord>,

    // Step 3 result, None when nothing was written
    pub metadata_path: Option<PathBuf>,

    // Step 4 result, None when image copying is off
    pub images: Option<CopySummary>,

    // Step 5 results
    pub report: Option<ExtractionReport>,
    pub report_path: Option<PathBuf>,

    // Non-fatal warnings
    pub warnings: Vec<PipelineWarning>,
}

impl ExtractionContext {
    pub fn new(system: SourceSystem) -> Self {
        Self {
            system,
            rows: Vec::new(),
            genres: HashMap::new(),
            records: Vec::new(),
            metadata_path: None,
            images: None,
            report: None,
            report_path: None,
            warnings: Vec::new(),
        }
    }

    pub fn dropped(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, PipelineWarning::RecordDropped { .. }))
            .count()
    }
}
