pub mod batch;
pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod organize;
pub mod pipeline;
pub mod report;
pub mod sanitize;
pub mod source;
pub mod storage;

pub use batch::{cleanup_temp_files, BatchOptions, BatchOutcome, BatchRunner};
pub use catalog::{ImageKind, ImageLocator, ImagePaths, MovieRecord};
pub use config::{default_config_path, load_config, Config};
pub use error::{
    CinedexError, ConfigError, MetadataLoadError, RecordBuildError, Result, SourceError,
    StorageError,
};
pub use export::{CopySummary, MetadataWriter};
pub use organize::{load_metadata, OrganizePass, OrganizedMovie, Organizer, PassOutcome};
pub use pipeline::{ExtractionPipeline, PipelineConfig, ProgressReporter, SourceOutcome};
pub use report::{BatchReport, ExtractionReport, OrganizationReport};
pub use source::{LibraryReader, SourceKind, SourceSelection, SourceSystem};
