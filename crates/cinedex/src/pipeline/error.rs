use thiserror::Error;

use crate::error::{RecordBuildError, SourceError, StorageError};

/// Failures that end extraction of one source.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Reading source failed: {0}")]
    Source(#[from] SourceError),

    #[error("Writing output failed: {0}")]
    Storage(#[from] StorageError),
}

/// Problems that were logged and skipped while a source was extracted.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineWarning {
    RecordDropped {
        id: Option<String>,
        error: RecordBuildError,
    },
    ImageCopiesFailed {
        failed: usize,
    },
}

impl std::fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineWarning::RecordDropped { id: Some(id), error } => {
                write!(f, "dropped item {}: {}", id, error)
            }
            PipelineWarning::RecordDropped { id: None, error } => {
                write!(f, "dropped row: {}", error)
            }
            PipelineWarning::ImageCopiesFailed { failed } => {
                write!(f, "{} image copies failed", failed)
            }
        }
    }
}
