use tracing::{debug, info, info_span, warn};

use crate::catalog::{build_record, content_hash, ImagePaths};
use crate::export::MetadataWriter;
use crate::report::ExtractionReport;
use crate::source::{LibraryReader, SourceKind, SourceSelection, SourceSystem};

use super::config::PipelineConfig;
use super::context::ExtractionContext;
use super::error::{PipelineError, PipelineWarning};
use super::progress::{ProgressEvent, ProgressReporter};

/// How one source's extraction ended.
#[derive(Debug)]
pub struct SourceOutcome {
    pub kind: SourceKind,
    pub built: usize,
    pub dropped: usize,
    /// Set when the source was skipped or its output could not be written.
    pub error: Option<PipelineError>,
}

impl SourceOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Reads library databases and writes their movies into the output tree.
pub struct ExtractionPipeline {
    config: PipelineConfig,
    writer: MetadataWriter,
}

impl ExtractionPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        let writer = MetadataWriter::new(&config.output_directory);
        Self { config, writer }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Creates the output skeleton. Fails when the output directory is
    /// unusable.
    pub fn prepare(&self) -> Result<(), PipelineError> {
        self.writer.prepare()?;
        Ok(())
    }

    /// Prepares the output tree, then extracts every selected source in
    /// order. A failing source never stops the next one.
    pub fn run_all(
        &self,
        systems: &[SourceSystem],
        selection: SourceSelection,
        progress: &dyn ProgressReporter,
    ) -> Result<Vec<(SourceOutcome, ExtractionContext)>, PipelineError> {
        self.prepare()?;

        Ok(systems
            .iter()
            .filter(|system| selection.includes(system.kind))
            .map(|system| self.run(ExtractionContext::new(system.clone()), progress))
            .collect())
    }

    /// Run the full extraction for a single source.
    pub fn run(
        &self,
        mut ctx: ExtractionContext,
        progress: &dyn ProgressReporter,
    ) -> (SourceOutcome, ExtractionContext) {
        let kind = ctx.system.kind;
        let _pipeline_span = info_span!("extraction", source = %kind).entered();

        // Step 1: Read rows and genres
        {
            let _step = info_span!("read_source").entered();
            progress.report(ProgressEvent::Phase {
                message: format!("Reading {} library...", kind),
            });
            if let Err(e) = self.step_read_source(&mut ctx) {
                warn!("Skipping {}: {}", kind, e);
                return Self::failed(kind, e, ctx, progress);
            }
        }

        // Step 2: Build records
        {
            let _step = info_span!("build_records").entered();
            self.step_build_records(&mut ctx, progress);
        }

        // Step 3: Write metadata
        {
            let _step = info_span!("write_metadata").entered();
            if let Err(e) = self.step_write_metadata(&mut ctx, progress) {
                return Self::failed(kind, e, ctx, progress);
            }
        }

        // Step 4: Copy images
        if self.config.copy_images && !ctx.records.is_empty() {
            let _step = info_span!("copy_images").entered();
            progress.report(ProgressEvent::Phase {
                message: format!("Copying {} images...", kind),
            });
            self.step_copy_images(&mut ctx);
        }

        // Step 5: Report
        {
            let _step = info_span!("report").entered();
            if let Err(e) = self.step_report(&mut ctx) {
                return Self::failed(kind, e, ctx, progress);
            }
        }

        let outcome = SourceOutcome {
            kind,
            built: ctx.records.len(),
            dropped: ctx.dropped(),
            error: None,
        };

        progress.report(ProgressEvent::Completed {
            summary: format!(
                "{}: {} movies extracted, {} dropped",
                kind, outcome.built, outcome.dropped
            ),
        });

        (outcome, ctx)
    }

    fn failed(
        kind: SourceKind,
        error: PipelineError,
        ctx: ExtractionContext,
        progress: &dyn ProgressReporter,
    ) -> (SourceOutcome, ExtractionContext) {
        progress.report(ProgressEvent::Warning {
            message: format!("{}: {}", kind, error),
        });
        let outcome = SourceOutcome {
            kind,
            built: ctx.records.len(),
            dropped: ctx.dropped(),
            error: Some(error),
        };
        (outcome, ctx)
    }

    fn step_read_source(&self, ctx: &mut ExtractionContext) -> Result<(), PipelineError> {
        let database = ctx.system.database_path(&self.config.config_directory);
        let reader = LibraryReader::open(&database)?;

        ctx.rows = reader.movies(&self.config.excluded_prefixes)?;

        // Missing genre tables leave every movie without genres.
        ctx.genres = match reader.genres() {
            Ok(genres) => genres,
            Err(e) => {
                warn!("Genres unavailable for {}: {}", ctx.system.kind, e);
                Default::default()
            }
        };

        debug!("Read {} rows from {}", ctx.rows.len(), database.display());
        Ok(())
    }

    fn step_build_records(&self, ctx: &mut ExtractionContext, progress: &dyn ProgressReporter) {
        let locator = ctx.system.image_locator(&self.config.config_directory);
        let rows = std::mem::take(&mut ctx.rows);

        for row in rows {
            let raw = match row {
                Ok(raw) => raw,
                Err(error) => {
                    Self::drop_row(ctx, None, error, progress);
                    continue;
                }
            };

            let hash = content_hash(raw.guid.as_deref());
            let images = if hash.is_empty() {
                ImagePaths::default()
            } else {
                locator.locate(&hash)
            };
            let genres = raw
                .id
                .as_ref()
                .and_then(|id| ctx.genres.get(id))
                .cloned()
                .unwrap_or_default();
            let id = raw.id.clone();

            match build_record(raw, images, genres) {
                Ok(record) => ctx.records.push(record),
                Err(error) => Self::drop_row(ctx, id, error, progress),
            }
        }
    }

    fn drop_row(
        ctx: &mut ExtractionContext,
        id: Option<String>,
        error: crate::error::RecordBuildError,
        progress: &dyn ProgressReporter,
    ) {
        let warning = PipelineWarning::RecordDropped { id, error };
        warn!("{}: {}", ctx.system.kind, warning);
        progress.report(ProgressEvent::Warning {
            message: format!("{}: {}", ctx.system.kind, warning),
        });
        ctx.warnings.push(warning);
    }

    fn step_write_metadata(
        &self,
        ctx: &mut ExtractionContext,
        progress: &dyn ProgressReporter,
    ) -> Result<(), PipelineError> {
        let label = ctx.system.kind.label();
        if ctx.records.is_empty() {
            info!("No {} movies found, nothing written", label);
            return Ok(());
        }

        progress.report(ProgressEvent::Phase {
            message: format!("Saving {} {} movies...", ctx.records.len(), label),
        });
        ctx.metadata_path = Some(self.writer.write_metadata(&ctx.records, label)?);
        Ok(())
    }

    fn step_copy_images(&self, ctx: &mut ExtractionContext) {
        let summary = self
            .writer
            .copy_images(&ctx.records, ctx.system.kind.label());
        if summary.failed > 0 {
            ctx.warnings.push(PipelineWarning::ImageCopiesFailed {
                failed: summary.failed,
            });
        }
        ctx.images = Some(summary);
    }

    fn step_report(&self, ctx: &mut ExtractionContext) -> Result<(), PipelineError> {
        let report = ExtractionReport::build(&ctx.records, ctx.system.kind.label());
        if self.config.generate_report && !ctx.records.is_empty() {
            ctx.report_path = Some(self.writer.write_report(&report)?);
        }
        ctx.report = Some(report);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::progress::{NoopProgress, RecordingProgress};
    use crate::error::SourceError;
    use rusqlite::{params, Connection};
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const GUID: [u8; 4] = [0xAB, 0xCD, 0x01, 0x02];

    fn test_config(config_dir: &Path, output_dir: &Path) -> PipelineConfig {
        PipelineConfig {
            config_directory: config_dir.to_path_buf(),
            output_directory: output_dir.to_path_buf(),
            copy_images: true,
            generate_report: true,
            excluded_prefixes: vec!["Episode".to_string()],
        }
    }

    fn seed_library(config_dir: &Path) {
        let db = config_dir.join("emby-config/data/library.db");
        std::fs::create_dir_all(db.parent().unwrap()).unwrap();
        let conn = Connection::open(&db).unwrap();
        conn.execute_batch(
            "CREATE TABLE MediaItems (Id TEXT, Name TEXT, OriginalTitle TEXT, \
                 ProductionYear INTEGER, Overview TEXT, ProviderIds TEXT, RunTimeTicks INTEGER, \
                 CommunityRating REAL, Path TEXT, guid BLOB, IsMovie INTEGER, type INTEGER);
             CREATE TABLE Genres (Id INTEGER, Name TEXT);
             CREATE TABLE ItemGenres (ItemId TEXT, GenreId INTEGER);
             INSERT INTO Genres VALUES (1, 'Drama');
             INSERT INTO ItemGenres VALUES ('1', 1);",
        )
        .unwrap();
        conn.execute(
            "INSERT INTO MediaItems VALUES ('1', 'Heat', NULL, 1995, NULL, NULL, NULL, 8.3, NULL, ?1, 1, 8)",
            params![GUID.to_vec()],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO MediaItems VALUES (NULL, 'No Id', NULL, 2000, NULL, NULL, NULL, NULL, NULL, NULL, 1, 8)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO MediaItems VALUES ('3', 'Episode 4', NULL, 2001, NULL, NULL, NULL, NULL, NULL, NULL, 1, 8)",
            [],
        )
        .unwrap();

        let cache = config_dir.join("emby-config/metadata/library/ab/abcd0102");
        std::fs::create_dir_all(&cache).unwrap();
        std::fs::write(cache.join("poster.jpg"), b"poster").unwrap();
    }

    fn setup_dirs() -> (TempDir, PathBuf, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let config_dir = tmp.path().join("config");
        let output = tmp.path().join("output");
        std::fs::create_dir_all(&config_dir).unwrap();
        (tmp, config_dir, output)
    }

    #[test]
    fn test_full_extraction() {
        let (_tmp, config_dir, output) = setup_dirs();
        seed_library(&config_dir);
        let pipeline = ExtractionPipeline::new(test_config(&config_dir, &output));
        let progress = RecordingProgress::new();

        let results = pipeline
            .run_all(&SourceSystem::defaults(), SourceSelection::Emby, &progress)
            .unwrap();

        assert_eq!(results.len(), 1);
        let (outcome, ctx) = &results[0];
        assert!(outcome.succeeded(), "{:?}", outcome.error);
        assert_eq!(outcome.built, 1);
        assert_eq!(outcome.dropped, 1);
        assert_eq!(progress.warnings(), 1);

        let record = &ctx.records[0];
        assert_eq!(record.name(), "Heat");
        assert_eq!(record.genres(), ["Drama".to_string()]);
        assert_eq!(record.content_hash(), "abcd0102");
        assert!(record.has_image(crate::catalog::ImageKind::Poster));

        assert!(output.join("metadata/emby_movies.json").is_file());
        assert!(output.join("reports/emby_report.json").is_file());
        assert!(output.join("posters/emby/Heat (1995)_poster.jpg").is_file());
        assert_eq!(ctx.images.unwrap().copied, 1);
    }

    #[test]
    fn test_missing_database_skips_source() {
        let (_tmp, config_dir, output) = setup_dirs();
        let pipeline = ExtractionPipeline::new(test_config(&config_dir, &output));

        let results = pipeline
            .run_all(&SourceSystem::defaults(), SourceSelection::Both, &NoopProgress)
            .unwrap();

        assert_eq!(results.len(), 2);
        for (outcome, _) in &results {
            assert!(matches!(
                outcome.error,
                Some(PipelineError::Source(SourceError::DataSourceUnavailable(_)))
            ));
        }
        assert!(output.join("metadata").is_dir());
        assert!(!output.join("metadata/emby_movies.json").exists());
    }

    #[test]
    fn test_reports_and_images_are_optional() {
        let (_tmp, config_dir, output) = setup_dirs();
        seed_library(&config_dir);
        let mut config = test_config(&config_dir, &output);
        config.copy_images = false;
        config.generate_report = false;
        let pipeline = ExtractionPipeline::new(config);

        let results = pipeline
            .run_all(&SourceSystem::defaults(), SourceSelection::Emby, &NoopProgress)
            .unwrap();

        let (_, ctx) = &results[0];
        assert!(ctx.images.is_none());
        assert!(ctx.report_path.is_none());
        assert_eq!(ctx.report.as_ref().unwrap().total_movies, 1);
        assert!(!output.join("reports/emby_report.json").exists());
        assert!(!output.join("posters/emby").exists());
    }

    #[test]
    fn test_unusable_output_directory() {
        let (tmp, config_dir, _) = setup_dirs();
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, "").unwrap();
        let pipeline = ExtractionPipeline::new(test_config(&config_dir, &blocker));

        let result = pipeline.run_all(&SourceSystem::defaults(), SourceSelection::Both, &NoopProgress);
        assert!(matches!(result, Err(PipelineError::Storage(_))));
    }
}
