//! Test harness for isolated extraction and organization runs.
//!
//! The `TestHarness` struct owns a temporary directory laid out like a
//! media server host:
//! - `config/` holding seeded library databases and image caches
//! - `output/` receiving extraction, organization and batch output

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use assert_fs::prelude::*;
use assert_fs::TempDir;
use rusqlite::{params, Connection};

use cinedex::pipeline::{
    ExtractionContext, ExtractionPipeline, NoopProgress, PipelineConfig, SourceOutcome,
};
use cinedex::source::DEFAULT_EXCLUDED_PREFIXES;
use cinedex::{SourceSelection, SourceSystem};

use super::builders::MovieRow;

const SCHEMA: &str = "
    CREATE TABLE MediaItems (
        Id TEXT, Name TEXT, OriginalTitle TEXT, ProductionYear INTEGER, Overview TEXT,
        ProviderIds TEXT, RunTimeTicks INTEGER, CommunityRating REAL, Path TEXT, guid BLOB,
        IsMovie INTEGER, type INTEGER
    );
    CREATE TABLE Genres (Id INTEGER PRIMARY KEY, Name TEXT);
    CREATE TABLE ItemGenres (ItemId TEXT, GenreId INTEGER);
";

/// Test harness providing an isolated media server layout.
pub struct TestHarness {
    temp_dir: TempDir,
    /// Directory holding `emby-config/` and `config/`.
    pub config_dir: PathBuf,
    /// Extraction output directory.
    pub output_dir: PathBuf,
}

impl TestHarness {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config_dir = temp_dir.path().join("config");
        let output_dir = temp_dir.path().join("output");
        std::fs::create_dir_all(&config_dir).expect("Failed to create config dir");

        Self {
            temp_dir,
            config_dir,
            output_dir,
        }
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn organized_dir(&self) -> PathBuf {
        self.output_dir.join("organized")
    }

    /// Creates the library database of `system` and the cached images of
    /// every row.
    pub fn seed_library(&self, system: &SourceSystem, rows: &[MovieRow]) {
        let db_path = system.database_path(&self.config_dir);
        std::fs::create_dir_all(db_path.parent().unwrap()).expect("Failed to create data dir");

        let conn = Connection::open(&db_path).expect("Failed to create library database");
        conn.execute_batch(SCHEMA).expect("Failed to create schema");

        let mut genre_ids: HashMap<String, i64> = HashMap::new();
        for row in rows {
            conn.execute(
                "INSERT INTO MediaItems VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                params![
                    row.id,
                    row.name,
                    row.original_title,
                    row.year,
                    row.overview,
                    row.provider_ids,
                    row.runtime_ticks,
                    row.rating,
                    row.path,
                    row.guid,
                    row.is_movie,
                    row.item_type,
                ],
            )
            .expect("Failed to insert row");

            for genre in &row.genres {
                let next_id = genre_ids.len() as i64 + 1;
                let genre_id = *genre_ids.entry(genre.clone()).or_insert_with(|| {
                    conn.execute(
                        "INSERT INTO Genres (Id, Name) VALUES (?1, ?2)",
                        params![next_id, genre],
                    )
                    .expect("Failed to insert genre");
                    next_id
                });
                conn.execute(
                    "INSERT INTO ItemGenres VALUES (?1, ?2)",
                    params![row.id, genre_id],
                )
                .expect("Failed to link genre");
            }

            self.write_cached_images(system, row);
        }
    }

    fn write_cached_images(&self, system: &SourceSystem, row: &MovieRow) {
        let hash = row.hash();
        if hash.len() < 2 || row.images.is_empty() {
            return;
        }
        let root = self
            .temp_dir
            .child("config")
            .child(&system.metadata_root)
            .child(&hash[..2])
            .child(&hash);
        for kind in &row.images {
            root.child(kind.cache_filename())
                .write_binary(format!("{}:{}", hash, kind).as_bytes())
                .expect("Failed to write cached image");
        }
    }

    pub fn pipeline_config(&self, copy_images: bool, generate_report: bool) -> PipelineConfig {
        PipelineConfig {
            config_directory: self.config_dir.clone(),
            output_directory: self.output_dir.clone(),
            copy_images,
            generate_report,
            excluded_prefixes: DEFAULT_EXCLUDED_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }

    /// Extracts the selected default sources with images and reports on.
    pub fn extract(&self, selection: SourceSelection) -> Vec<(SourceOutcome, ExtractionContext)> {
        ExtractionPipeline::new(self.pipeline_config(true, true))
            .run_all(&SourceSystem::defaults(), selection, &NoopProgress)
            .expect("Extraction failed")
    }

    pub fn read_json(&self, relative_path: &str) -> serde_json::Value {
        let path = self.output_dir.join(relative_path);
        let content = std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("Failed to read {:?}: {}", path, e));
        serde_json::from_str(&content).expect("Output is not valid JSON")
    }

    pub fn assert_output_exists(&self, relative_path: &str) {
        let path = self.output_dir.join(relative_path);
        assert!(
            path.exists(),
            "Expected output file does not exist: {:?}",
            path
        );
    }

    pub fn assert_output_missing(&self, relative_path: &str) {
        let path = self.output_dir.join(relative_path);
        assert!(!path.exists(), "Unexpected output: {:?}", path);
    }

    /// All files in the output directory (recursively), relative to it.
    pub fn list_outputs(&self) -> Vec<PathBuf> {
        walkdir::WalkDir::new(&self.output_dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| {
                e.path()
                    .strip_prefix(&self.output_dir)
                    .ok()
                    .map(|p| p.to_path_buf())
            })
            .collect()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
