use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CinedexError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Metadata load error: {0}")]
    MetadataLoad(#[from] MetadataLoadError),

    #[error("Extraction error: {0}")]
    Pipeline(#[from] crate::pipeline::PipelineError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },
}

/// Failures opening or querying a media server library database.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Library database not found: {0}")]
    DataSourceUnavailable(PathBuf),

    #[error("Failed to open library database '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Library query failed: {0}")]
    Query(#[from] rusqlite::Error),
}

/// A single library row that could not be turned into a movie record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordBuildError {
    #[error("Row has no item id")]
    MissingId,

    #[error("Unreadable column '{column}': {reason}")]
    Column { column: &'static str, reason: String },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to create directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy image from '{from}' to '{to}': {source}")]
    CopyFile {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize '{path}': {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum MetadataLoadError {
    #[error("Failed to read metadata file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Metadata file '{path}' is not a JSON array of movies: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, CinedexError>;
