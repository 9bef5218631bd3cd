//! One-shot extract, organize and summarize run over a whole output tree.

use std::path::{Path, PathBuf};

use glob::Pattern;
use tracing::{debug, info, info_span, warn};
use walkdir::WalkDir;

use crate::error::Result;
use crate::organize::{load_metadata, OrganizePass, Organizer, PassOutcome};
use crate::pipeline::{
    ExtractionContext, ExtractionPipeline, PipelineConfig, ProgressEvent, ProgressReporter,
    SourceOutcome,
};
use crate::report::{BatchReport, OrganizationReport, BATCH_REPORT_FILE};
use crate::source::{SourceSelection, SourceSystem};
use crate::storage::FileStorage;

/// File name patterns removed by [`cleanup_temp_files`].
pub const TEMP_FILE_PATTERNS: &[&str] = &["*.tmp", "*.temp", "*.log"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    pub selection: SourceSelection,
    pub copy_images: bool,
    /// All six passes when set, otherwise by-name, by-year and by-genre.
    pub full_organization: bool,
    pub cleanup: bool,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            selection: SourceSelection::Both,
            copy_images: true,
            full_organization: true,
            cleanup: false,
        }
    }
}

impl BatchOptions {
    pub fn passes(&self) -> &'static [OrganizePass] {
        if self.full_organization {
            &OrganizePass::ALL
        } else {
            &OrganizePass::BASIC
        }
    }
}

pub struct BatchOutcome {
    pub extraction: Vec<(SourceOutcome, ExtractionContext)>,
    pub passes: Vec<PassOutcome>,
    pub organization: OrganizationReport,
    pub report: BatchReport,
    pub report_path: PathBuf,
    /// Files removed by cleanup, None when cleanup was off.
    pub cleaned: Option<usize>,
}

pub struct BatchRunner {
    config: PipelineConfig,
    sources: Vec<SourceSystem>,
}

impl BatchRunner {
    pub fn new(config: PipelineConfig, sources: Vec<SourceSystem>) -> Self {
        Self { config, sources }
    }

    pub fn organized_directory(&self) -> PathBuf {
        self.config.output_directory.join("organized")
    }

    pub fn run(self, options: BatchOptions, progress: &dyn ProgressReporter) -> Result<BatchOutcome> {
        let _span = info_span!("batch").entered();
        let output_directory = self.config.output_directory.clone();
        let config_directory = self.config.config_directory.clone();
        let organized_directory = self.organized_directory();

        // Step 1: Extract
        let extraction = {
            let _step = info_span!("extract").entered();
            let config = PipelineConfig {
                copy_images: options.copy_images,
                generate_report: true,
                ..self.config
            };
            ExtractionPipeline::new(config).run_all(&self.sources, options.selection, progress)?
        };

        // Step 2: Organize
        let (passes, organization) = {
            let _step = info_span!("organize").entered();
            let loaded = load_metadata(&output_directory, options.selection);
            for error in &loaded.errors {
                progress.report(ProgressEvent::Warning {
                    message: error.to_string(),
                });
            }

            let organizer = Organizer::new(&organized_directory);
            organizer.prepare()?;
            let passes = organizer.run_passes(options.passes(), &loaded.movies, progress);

            let organization = OrganizationReport::build(&loaded.movies, &organized_directory);
            organizer.write_report(&organization)?;
            (passes, organization)
        };

        // Step 3: Summarize
        let (report, report_path) = {
            let _step = info_span!("summarize").entered();
            progress.report(ProgressEvent::Phase {
                message: "Writing batch summary...".to_string(),
            });
            let report = BatchReport::build(&output_directory, &config_directory);
            let path = FileStorage::new(&output_directory).write_json("", BATCH_REPORT_FILE, &report)?;
            (report, path)
        };

        // Step 4: Cleanup
        let cleaned = if options.cleanup {
            let _step = info_span!("cleanup").entered();
            progress.report(ProgressEvent::Phase {
                message: "Removing temporary files...".to_string(),
            });
            Some(cleanup_temp_files(&output_directory))
        } else {
            None
        };

        info!("Batch run finished in {}", output_directory.display());
        Ok(BatchOutcome {
            extraction,
            passes,
            organization,
            report,
            report_path,
            cleaned,
        })
    }
}

/// Removes files below `directory` whose name matches one of
/// [`TEMP_FILE_PATTERNS`]. Returns how many were removed.
pub fn cleanup_temp_files(directory: &Path) -> usize {
    let patterns: Vec<Pattern> = TEMP_FILE_PATTERNS
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                warn!("Invalid cleanup pattern '{}': {}", p, e);
                None
            }
        })
        .collect();

    let mut removed = 0;
    for entry in WalkDir::new(directory)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !patterns.iter().any(|p| p.matches(&name)) {
            continue;
        }
        match std::fs::remove_file(entry.path()) {
            Ok(()) => {
                debug!("Removed {}", entry.path().display());
                removed += 1;
            }
            Err(e) => warn!("Could not remove {}: {}", entry.path().display(), e),
        }
    }

    removed
}
