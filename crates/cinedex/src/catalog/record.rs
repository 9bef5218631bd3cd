use serde::{Deserialize, Serialize};

use crate::error::RecordBuildError;

use super::images::{ImageKind, ImagePaths};

/// Placeholder used when a library item has no usable name.
pub const UNKNOWN_MOVIE: &str = "Unknown Movie";

/// Runtime ticks are 100ns units.
const TICKS_PER_SECOND: i64 = 10_000_000;

/// One `MediaItems` row as read from a library database, before defaulting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMovieRow {
    pub id: Option<String>,
    pub name: Option<String>,
    pub original_title: Option<String>,
    pub production_year: Option<i64>,
    pub overview: Option<String>,
    pub provider_ids: Option<String>,
    pub runtime_ticks: Option<i64>,
    pub community_rating: Option<f64>,
    pub path: Option<String>,
    pub guid: Option<Vec<u8>>,
}

/// Normalized metadata and image availability for one film.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    id: String,
    name: String,
    original_title: String,
    year: i32,
    overview: String,
    imdb_id: String,
    tmdb_id: String,
    genres: Vec<String>,
    #[serde(rename = "runtime")]
    runtime_seconds: i64,
    rating: f64,
    #[serde(rename = "metadata_hash")]
    content_hash: String,
    #[serde(rename = "file_path")]
    source_file_path: String,
    images: ImagePaths,
}

impl MovieRecord {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn original_title(&self) -> &str {
        &self.original_title
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn overview(&self) -> &str {
        &self.overview
    }

    pub fn imdb_id(&self) -> &str {
        &self.imdb_id
    }

    pub fn tmdb_id(&self) -> &str {
        &self.tmdb_id
    }

    pub fn genres(&self) -> &[String] {
        &self.genres
    }

    pub fn runtime_seconds(&self) -> i64 {
        self.runtime_seconds
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    pub fn source_file_path(&self) -> &str {
        &self.source_file_path
    }

    pub fn images(&self) -> &ImagePaths {
        &self.images
    }

    pub fn has_image(&self, kind: ImageKind) -> bool {
        self.images.has(kind)
    }
}

/// Lowercase hex of a GUID blob; empty when the row has no GUID.
pub fn content_hash(guid: Option<&[u8]>) -> String {
    match guid {
        Some(bytes) => bytes.iter().map(|b| format!("{:02x}", b)).collect(),
        None => String::new(),
    }
}

/// Looks up `provider` in a JSON-encoded `{provider: id}` map.
///
/// Missing keys, non-string values and malformed JSON all yield an empty
/// string.
pub fn provider_id(provider_ids: Option<&str>, provider: &str) -> String {
    let Some(raw) = provider_ids.filter(|s| !s.is_empty()) else {
        return String::new();
    };

    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(map)) => map
            .get(provider)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    }
}

pub fn runtime_seconds(ticks: Option<i64>) -> i64 {
    ticks
        .map(|t| t.div_euclid(TICKS_PER_SECOND))
        .unwrap_or(0)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Builds a [`MovieRecord`] from a raw row plus its located images and
/// genre list.
pub fn build_record(
    raw: RawMovieRow,
    images: ImagePaths,
    genres: Vec<String>,
) -> Result<MovieRecord, RecordBuildError> {
    let id = non_empty(raw.id).ok_or(RecordBuildError::MissingId)?;

    let year = match raw.production_year {
        Some(y) => i32::try_from(y).map_err(|_| RecordBuildError::Column {
            column: "ProductionYear",
            reason: format!("year {} out of range", y),
        })?,
        None => 0,
    };

    let name = non_empty(raw.name);
    let original_title = non_empty(raw.original_title)
        .or_else(|| name.clone())
        .unwrap_or_else(|| UNKNOWN_MOVIE.to_string());
    let name = name.unwrap_or_else(|| UNKNOWN_MOVIE.to_string());

    let imdb_id = provider_id(raw.provider_ids.as_deref(), "Imdb");
    let tmdb_id = provider_id(raw.provider_ids.as_deref(), "Tmdb");

    Ok(MovieRecord {
        id,
        name,
        original_title,
        year,
        overview: raw.overview.unwrap_or_default(),
        imdb_id,
        tmdb_id,
        genres,
        runtime_seconds: runtime_seconds(raw.runtime_ticks),
        rating: raw.community_rating.unwrap_or(0.0),
        content_hash: content_hash(raw.guid.as_deref()),
        source_file_path: raw.path.unwrap_or_default(),
        images,
    })
}
