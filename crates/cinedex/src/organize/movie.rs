use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::{ImageKind, ImagePaths, UNKNOWN_MOVIE};
use crate::error::MetadataLoadError;
use crate::source::{SourceKind, SourceSelection};

/// A movie record read back from an exported metadata document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizedMovie {
    #[serde(default = "unknown_movie")]
    pub name: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub images: ImagePaths,
    /// Which source produced the document this movie came from.
    #[serde(skip)]
    pub source_label: String,
}

fn unknown_movie() -> String {
    UNKNOWN_MOVIE.to_string()
}

impl OrganizedMovie {
    pub fn has_image(&self, kind: ImageKind) -> bool {
        self.images.has(kind)
    }

    pub fn label(&self) -> String {
        crate::sanitize::movie_label(&self.name, self.year)
    }
}

/// Path of the exported metadata document for `kind` under `input_directory`.
pub fn metadata_path(input_directory: &Path, kind: SourceKind) -> PathBuf {
    input_directory
        .join("metadata")
        .join(format!("{}_movies.json", kind.label()))
}

/// Reads one exported metadata document.
///
/// The document must be a JSON array. Entries that do not look like a
/// movie are skipped; the second value is how many were skipped.
pub fn load_file(
    path: &Path,
    source_label: &str,
) -> Result<(Vec<OrganizedMovie>, usize), MetadataLoadError> {
    let content = std::fs::read_to_string(path).map_err(|e| MetadataLoadError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    let entries: Vec<serde_json::Value> =
        serde_json::from_str(&content).map_err(|e| MetadataLoadError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

    let mut movies = Vec::with_capacity(entries.len());
    let mut skipped = 0;
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<OrganizedMovie>(entry) {
            Ok(mut movie) => {
                movie.source_label = source_label.to_string();
                movies.push(movie);
            }
            Err(e) => {
                warn!(
                    "Skipping entry {} of {}: {}",
                    index,
                    crate::sanitize::redact_path(path),
                    e
                );
                skipped += 1;
            }
        }
    }

    Ok((movies, skipped))
}

/// Everything loaded for one organization run.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub movies: Vec<OrganizedMovie>,
    /// Movies loaded per source, in load order.
    pub per_source: Vec<(SourceKind, usize)>,
    pub skipped_entries: usize,
    pub errors: Vec<MetadataLoadError>,
}

/// Loads the metadata documents of every selected source.
///
/// Sources without a document are skipped quietly; unreadable documents
/// are logged and recorded in [`LoadOutcome::errors`].
pub fn load_metadata(input_directory: &Path, selection: SourceSelection) -> LoadOutcome {
    let mut outcome = LoadOutcome::default();

    for kind in selection.kinds() {
        let path = metadata_path(input_directory, kind);
        if !path.is_file() {
            debug!("No {} metadata at {}", kind, path.display());
            continue;
        }

        match load_file(&path, kind.label()) {
            Ok((movies, skipped)) => {
                info!("Loaded {} {} movies", movies.len(), kind);
                outcome.per_source.push((kind, movies.len()));
                outcome.skipped_entries += skipped;
                outcome.movies.extend(movies);
            }
            Err(e) => {
                warn!("Skipping {} metadata: {}", kind, e);
                outcome.errors.push(e);
            }
        }
    }

    outcome
}
