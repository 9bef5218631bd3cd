//! Read-only access to an Emby/Jellyfin `library.db`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::{debug, info};
use rusqlite::types::ValueRef;
use rusqlite::{params_from_iter, Connection, OpenFlags, Row};

use crate::catalog::RawMovieRow;
use crate::error::{RecordBuildError, SourceError};

/// Name prefixes of items that are flagged as movies but are really TV
/// content.
pub const DEFAULT_EXCLUDED_PREFIXES: &[&str] = &["Episode", "BBC", "The Great"];

/// `MediaItems.type` value for movies.
const MOVIE_TYPE: i64 = 8;

const MOVIE_COLUMNS: &str = "Id, Name, OriginalTitle, ProductionYear, Overview, \
     ProviderIds, RunTimeTicks, CommunityRating, Path, guid";

const GENRE_QUERY: &str = "SELECT ig.ItemId, g.Name \
     FROM Genres g \
     JOIN ItemGenres ig ON g.Id = ig.GenreId";

/// A short-lived read-only connection to one library database.
///
/// Dropping the reader closes the connection.
pub struct LibraryReader {
    path: PathBuf,
    conn: Connection,
}

impl LibraryReader {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        if !path.is_file() {
            return Err(SourceError::DataSourceUnavailable(path.to_path_buf()));
        }

        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|e| SourceError::Open {
                path: path.to_path_buf(),
                source: e,
            })?;

        debug!("Opened library database {} (read-only)", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            conn,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Movie rows ordered by name.
    ///
    /// A row is a movie when `IsMovie = 1` or `type = 8`, and its name does
    /// not start with any of `excluded_prefixes` (a NULL name never does).
    /// Rows whose columns cannot be read come back as errors alongside the
    /// good rows.
    pub fn movies<S: AsRef<str>>(
        &self,
        excluded_prefixes: &[S],
    ) -> Result<Vec<Result<RawMovieRow, RecordBuildError>>, SourceError> {
        let mut sql = format!(
            "SELECT {} FROM MediaItems WHERE (IsMovie = 1 OR type = {})",
            MOVIE_COLUMNS, MOVIE_TYPE
        );
        if !excluded_prefixes.is_empty() {
            // NOT LIKE is NULL for a NULL name; such rows match no prefix.
            let clauses: Vec<String> = (1..=excluded_prefixes.len())
                .map(|i| format!("Name NOT LIKE ?{}", i))
                .collect();
            sql.push_str(&format!(
                " AND (Name IS NULL OR ({}))",
                clauses.join(" AND ")
            ));
        }
        sql.push_str(" ORDER BY Name");

        let patterns = excluded_prefixes
            .iter()
            .map(|p| format!("{}%", p.as_ref()));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(patterns))?;

        let mut movies = Vec::new();
        while let Some(row) = rows.next()? {
            movies.push(raw_movie_row(row));
        }

        info!(
            "Read {} movie rows from {}",
            movies.len(),
            self.path.display()
        );
        Ok(movies)
    }

    /// Genre names per item id, in join order.
    pub fn genres(&self) -> Result<HashMap<String, Vec<String>>, SourceError> {
        let mut stmt = self.conn.prepare(GENRE_QUERY)?;
        let mut rows = stmt.query([])?;

        let mut genres: HashMap<String, Vec<String>> = HashMap::new();
        while let Some(row) = rows.next()? {
            let item_id = text_value(row.get_ref(0)?);
            let name = text_value(row.get_ref(1)?);
            if let (Some(item_id), Some(name)) = (item_id, name) {
                genres.entry(item_id).or_default().push(name);
            }
        }

        Ok(genres)
    }
}

fn raw_movie_row(row: &Row<'_>) -> Result<RawMovieRow, RecordBuildError> {
    Ok(RawMovieRow {
        id: text_column(row, 0, "Id")?,
        name: text_column(row, 1, "Name")?,
        original_title: text_column(row, 2, "OriginalTitle")?,
        production_year: integer_column(row, 3, "ProductionYear")?,
        overview: text_column(row, 4, "Overview")?,
        provider_ids: text_column(row, 5, "ProviderIds")?,
        runtime_ticks: integer_column(row, 6, "RunTimeTicks")?,
        community_rating: real_column(row, 7, "CommunityRating")?,
        path: text_column(row, 8, "Path")?,
        guid: blob_column(row, 9, "guid")?,
    })
}

fn value_ref<'a>(
    row: &'a Row<'_>,
    idx: usize,
    column: &'static str,
) -> Result<ValueRef<'a>, RecordBuildError> {
    row.get_ref(idx).map_err(|e| RecordBuildError::Column {
        column,
        reason: e.to_string(),
    })
}

/// Text as-is; numbers are stringified so integer ids compare equal to
/// text ids from other tables.
fn text_value(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) => Some(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(_) => None,
    }
}

fn text_column(
    row: &Row<'_>,
    idx: usize,
    column: &'static str,
) -> Result<Option<String>, RecordBuildError> {
    match value_ref(row, idx, column)? {
        ValueRef::Blob(_) => Err(RecordBuildError::Column {
            column,
            reason: "expected text, found blob".to_string(),
        }),
        other => Ok(text_value(other)),
    }
}

fn integer_column(
    row: &Row<'_>,
    idx: usize,
    column: &'static str,
) -> Result<Option<i64>, RecordBuildError> {
    match value_ref(row, idx, column)? {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(i) => Ok(Some(i)),
        ValueRef::Real(f) => Ok(Some(f.floor() as i64)),
        ValueRef::Text(t) => {
            let text = String::from_utf8_lossy(t);
            text.trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|e| RecordBuildError::Column {
                    column,
                    reason: format!("'{}' is not an integer: {}", text, e),
                })
        }
        ValueRef::Blob(_) => Err(RecordBuildError::Column {
            column,
            reason: "expected integer, found blob".to_string(),
        }),
    }
}

fn real_column(
    row: &Row<'_>,
    idx: usize,
    column: &'static str,
) -> Result<Option<f64>, RecordBuildError> {
    match value_ref(row, idx, column)? {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(i) => Ok(Some(i as f64)),
        ValueRef::Real(f) => Ok(Some(f)),
        ValueRef::Text(t) => {
            let text = String::from_utf8_lossy(t);
            text.trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|e| RecordBuildError::Column {
                    column,
                    reason: format!("'{}' is not a number: {}", text, e),
                })
        }
        ValueRef::Blob(_) => Err(RecordBuildError::Column {
            column,
            reason: "expected number, found blob".to_string(),
        }),
    }
}

/// Only real blobs count as a GUID; anything else means "no GUID".
fn blob_column(
    row: &Row<'_>,
    idx: usize,
    column: &'static str,
) -> Result<Option<Vec<u8>>, RecordBuildError> {
    match value_ref(row, idx, column)? {
        ValueRef::Blob(b) if !b.is_empty() => Ok(Some(b.to_vec())),
        _ => Ok(None),
    }
}
