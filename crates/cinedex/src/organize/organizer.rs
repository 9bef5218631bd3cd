use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info_span, warn};

use crate::catalog::ImageKind;
use crate::error::StorageError;
use crate::pipeline::{ProgressEvent, ProgressReporter};
use crate::report::{OrganizationReport, ORGANIZATION_REPORT_FILE};
use crate::sanitize;
use crate::storage::{copy_file, ensure_directory, write_json, FileStorage};

use super::movie::OrganizedMovie;
use super::pass::OrganizePass;

pub const MOVIE_INFO_FILE: &str = "movie_info.json";
pub const MISSING_IMAGES_FILE: &str = "missing_images.json";

/// `movie_info.json` contents.
#[derive(Debug, Serialize)]
struct MovieInfo<'a> {
    name: &'a str,
    year: i32,
    genres: &'a [String],
    rating: f64,
    source: &'a str,
    images: ImagePresence,
    extracted_date: &'a str,
}

#[derive(Debug, Serialize)]
struct ImagePresence {
    poster: bool,
    backdrop: bool,
    logo: bool,
    fanart: bool,
    thumb: bool,
}

impl ImagePresence {
    fn of(movie: &OrganizedMovie) -> Self {
        Self {
            poster: movie.has_image(ImageKind::Poster),
            backdrop: movie.has_image(ImageKind::Backdrop),
            logo: movie.has_image(ImageKind::Logo),
            fanart: movie.has_image(ImageKind::Fanart),
            thumb: movie.has_image(ImageKind::Thumb),
        }
    }
}

/// `missing_images.json` contents.
#[derive(Debug, Serialize)]
struct MissingImages<'a> {
    name: &'a str,
    year: i32,
    missing_types: Vec<ImageKind>,
    has_poster: bool,
    has_backdrop: bool,
    has_logo: bool,
    has_fanart: bool,
    has_thumb: bool,
}

impl<'a> MissingImages<'a> {
    fn of(movie: &'a OrganizedMovie) -> Self {
        Self {
            name: &movie.name,
            year: movie.year,
            missing_types: movie.images.missing(),
            has_poster: movie.has_image(ImageKind::Poster),
            has_backdrop: movie.has_image(ImageKind::Backdrop),
            has_logo: movie.has_image(ImageKind::Logo),
            has_fanart: movie.has_image(ImageKind::Fanart),
            has_thumb: movie.has_image(ImageKind::Thumb),
        }
    }
}

/// Result of one organization pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassOutcome {
    pub pass: OrganizePass,
    /// Movie directories written (a movie in two genres counts twice).
    pub placed: usize,
    pub images_copied: usize,
    pub copy_failures: usize,
    /// Placements abandoned because the directory or info file could not
    /// be written.
    pub failed_placements: usize,
}

impl PassOutcome {
    fn new(pass: OrganizePass) -> Self {
        Self {
            pass,
            placed: 0,
            images_copied: 0,
            copy_failures: 0,
            failed_placements: 0,
        }
    }
}

#[derive(Debug, Default)]
struct Placement {
    copied: usize,
    failed: usize,
}

/// Fans movies out into the organized output tree.
pub struct Organizer {
    storage: FileStorage,
}

impl Organizer {
    pub fn new<P: AsRef<Path>>(organized_root: P) -> Self {
        Self {
            storage: FileStorage::new(organized_root),
        }
    }

    pub fn root(&self) -> &Path {
        self.storage.output_directory()
    }

    pub fn pass_directory(&self, pass: OrganizePass) -> PathBuf {
        self.root().join(pass.directory_name())
    }

    /// Creates the directory of every pass plus `reports/`.
    pub fn prepare(&self) -> Result<(), StorageError> {
        let mut layout: Vec<&str> = OrganizePass::ALL
            .iter()
            .map(|p| p.directory_name())
            .collect();
        layout.push("reports");
        self.storage.prepare_layout(&layout)
    }

    /// Runs each selected pass once, in a fixed order, whatever order or
    /// repetition `passes` has.
    pub fn run_passes(
        &self,
        passes: &[OrganizePass],
        movies: &[OrganizedMovie],
        progress: &dyn ProgressReporter,
    ) -> Vec<PassOutcome> {
        OrganizePass::ALL
            .into_iter()
            .filter(|pass| passes.contains(pass))
            .map(|pass| self.run(pass, movies, progress))
            .collect()
    }

    /// Writes `reports/organization_report.json` under the organized root.
    pub fn write_report(&self, report: &OrganizationReport) -> Result<PathBuf, StorageError> {
        self.storage
            .write_json("reports", ORGANIZATION_REPORT_FILE, report)
    }

    /// Runs one pass over `movies`. Failures are logged and counted; they
    /// never stop the pass.
    pub fn run(
        &self,
        pass: OrganizePass,
        movies: &[OrganizedMovie],
        progress: &dyn ProgressReporter,
    ) -> PassOutcome {
        let _span = info_span!("organize_pass", pass = %pass).entered();
        progress.report(ProgressEvent::Phase {
            message: format!("Organizing {}...", pass),
        });

        let pass_dir = self.pass_directory(pass);
        let extracted_date = chrono::Utc::now().to_rfc3339();
        let mut outcome = PassOutcome::new(pass);

        for movie in movies {
            for relative in pass.placements(movie) {
                let target = pass_dir.join(&relative);
                match self.place(pass, movie, &target, &extracted_date) {
                    Ok(placement) => {
                        outcome.placed += 1;
                        outcome.images_copied += placement.copied;
                        outcome.copy_failures += placement.failed;
                    }
                    Err(e) => {
                        warn!("Could not place '{}' in {}: {}", movie.name, pass, e);
                        progress.report(ProgressEvent::Warning {
                            message: format!("{}: {}", movie.name, e),
                        });
                        outcome.failed_placements += 1;
                    }
                }
            }
        }

        debug!(
            "{}: placed {}, copied {} images",
            pass, outcome.placed, outcome.images_copied
        );
        outcome
    }

    fn place(
        &self,
        pass: OrganizePass,
        movie: &OrganizedMovie,
        target: &Path,
        extracted_date: &str,
    ) -> Result<Placement, StorageError> {
        ensure_directory(target)?;

        let placement = copy_images(movie, target);

        let info = MovieInfo {
            name: &movie.name,
            year: movie.year,
            genres: &movie.genres,
            rating: movie.rating,
            source: &movie.source_label,
            images: ImagePresence::of(movie),
            extracted_date,
        };
        write_json(&target.join(MOVIE_INFO_FILE), &info)?;

        if pass == OrganizePass::MissingImages {
            write_json(&target.join(MISSING_IMAGES_FILE), &MissingImages::of(movie))?;
        }

        Ok(placement)
    }
}

/// Copies every present image of `movie` into `target` under its organized
/// file name. Each copy is attempted on its own.
fn copy_images(movie: &OrganizedMovie, target: &Path) -> Placement {
    let mut placement = Placement::default();

    for (kind, source) in movie.images.present() {
        if !source.is_file() {
            debug!(
                "{} image for '{}' no longer exists: {}",
                kind,
                movie.name,
                sanitize::redact_path(source)
            );
            continue;
        }
        match copy_file(source, &target.join(kind.organized_filename())) {
            Ok(_) => placement.copied += 1,
            Err(e) => {
                warn!("{} copy failed for '{}': {}", kind, movie.name, e);
                placement.failed += 1;
            }
        }
    }

    placement
}
