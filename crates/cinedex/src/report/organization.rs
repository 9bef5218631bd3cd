use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::catalog::ImageKind;
use crate::organize::{OrganizePass, OrganizedMovie, MOVIE_INFO_FILE};

use super::{bump, now_rfc3339, write_heading, write_row, Histogram};

pub const ORGANIZATION_REPORT_FILE: &str = "organization_report.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageStats {
    pub with_poster: usize,
    pub with_backdrop: usize,
    pub with_logo: usize,
    pub with_fanart: usize,
    pub with_thumb: usize,
}

/// Overview of one organized tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationReport {
    pub organization_date: String,
    pub total_movies: usize,
    /// Pass key (`by_name`, ...) to the number of placements found on disk.
    pub organization_stats: BTreeMap<String, usize>,
    pub image_stats: ImageStats,
    pub genre_distribution: Histogram,
    pub year_distribution: Histogram,
    pub rating_distribution: Histogram,
}

impl OrganizationReport {
    pub fn build(movies: &[OrganizedMovie], organized_root: &Path) -> Self {
        let with = |kind: ImageKind| movies.iter().filter(|m| m.has_image(kind)).count();

        let organization_stats = OrganizePass::ALL
            .iter()
            .map(|pass| {
                (
                    pass.stats_key().to_string(),
                    count_info_files(&organized_root.join(pass.directory_name())),
                )
            })
            .collect();

        let mut genre_distribution = Histogram::new();
        let mut year_distribution = Histogram::new();
        let mut rating_distribution = Histogram::new();
        for movie in movies {
            for genre in &movie.genres {
                bump(&mut genre_distribution, genre.as_str());
            }
            if movie.year > 0 {
                bump(&mut year_distribution, movie.year.to_string());
            }
            if let Some(key) = rating_bucket(movie.rating) {
                bump(&mut rating_distribution, key);
            }
        }

        Self {
            organization_date: now_rfc3339(),
            total_movies: movies.len(),
            organization_stats,
            image_stats: ImageStats {
                with_poster: with(ImageKind::Poster),
                with_backdrop: with(ImageKind::Backdrop),
                with_logo: with(ImageKind::Logo),
                with_fanart: with(ImageKind::Fanart),
                with_thumb: with(ImageKind::Thumb),
            },
            genre_distribution,
            year_distribution,
            rating_distribution,
        }
    }
}

/// One-point rating bucket, e.g. `7.0-7.9` for 7.4.
fn rating_bucket(rating: f64) -> Option<String> {
    if rating.is_nan() || rating <= 0.0 {
        return None;
    }
    let floor = rating.floor() as i64;
    Some(format!("{floor}.0-{floor}.9"))
}

/// Number of `movie_info.json` files anywhere below `directory`. A missing
/// directory counts zero.
pub fn count_info_files(directory: &Path) -> usize {
    if !directory.is_dir() {
        return 0;
    }
    WalkDir::new(directory)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == MOVIE_INFO_FILE)
        .count()
}

impl fmt::Display for OrganizationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_heading(f, "ORGANIZATION SUMMARY")?;
        write_row(f, "Total movies", self.total_movies)?;
        for pass in OrganizePass::ALL {
            let count = self
                .organization_stats
                .get(pass.stats_key())
                .copied()
                .unwrap_or(0);
            write_row(f, pass.directory_name(), count)?;
        }
        write_row(f, "With poster", self.image_stats.with_poster)?;
        write_row(f, "With backdrop", self.image_stats.with_backdrop)?;
        write_row(f, "Genres", self.genre_distribution.len())
    }
}
