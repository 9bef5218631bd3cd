use std::fmt;
use std::path::PathBuf;

use crate::catalog::ImageKind;
use crate::sanitize::sanitize_filename;

use super::movie::OrganizedMovie;

/// Bucket for movies that carry no genre at all.
pub const UNKNOWN_GENRE: &str = "Unknown Genre";

/// One of the six independent directory taxonomies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OrganizePass {
    ByName,
    ByYear,
    ByGenre,
    ByRating,
    HighQuality,
    MissingImages,
}

impl OrganizePass {
    pub const ALL: [OrganizePass; 6] = [
        OrganizePass::ByName,
        OrganizePass::ByYear,
        OrganizePass::ByGenre,
        OrganizePass::ByRating,
        OrganizePass::HighQuality,
        OrganizePass::MissingImages,
    ];

    /// Passes run when full organization is turned off.
    pub const BASIC: [OrganizePass; 3] = [
        OrganizePass::ByName,
        OrganizePass::ByYear,
        OrganizePass::ByGenre,
    ];

    pub fn directory_name(self) -> &'static str {
        match self {
            OrganizePass::ByName => "by-name",
            OrganizePass::ByYear => "by-year",
            OrganizePass::ByGenre => "by-genre",
            OrganizePass::ByRating => "by-rating",
            OrganizePass::HighQuality => "high-quality",
            OrganizePass::MissingImages => "missing-images",
        }
    }

    /// Key used in organization report statistics.
    pub fn stats_key(self) -> &'static str {
        match self {
            OrganizePass::ByName => "by_name",
            OrganizePass::ByYear => "by_year",
            OrganizePass::ByGenre => "by_genre",
            OrganizePass::ByRating => "by_rating",
            OrganizePass::HighQuality => "high_quality",
            OrganizePass::MissingImages => "missing_images",
        }
    }

    /// Directories (relative to this pass's directory) that `movie` is
    /// placed in. Empty when the pass does not place the movie.
    pub fn placements(self, movie: &OrganizedMovie) -> Vec<PathBuf> {
        let label = movie.label();
        match self {
            OrganizePass::ByName => vec![PathBuf::from(label)],
            OrganizePass::ByYear => {
                if movie.year > 0 {
                    vec![PathBuf::from(movie.year.to_string()).join(label)]
                } else {
                    Vec::new()
                }
            }
            OrganizePass::ByGenre => {
                if movie.genres.is_empty() {
                    vec![PathBuf::from(UNKNOWN_GENRE).join(label)]
                } else {
                    let mut placements: Vec<PathBuf> = Vec::new();
                    for genre in &movie.genres {
                        let path = PathBuf::from(genre_directory(genre)).join(&label);
                        if !placements.contains(&path) {
                            placements.push(path);
                        }
                    }
                    placements
                }
            }
            OrganizePass::ByRating => match RatingBand::for_rating(movie.rating) {
                Some(band) => {
                    let name = sanitize_filename(&format!(
                        "{} ({}) - {}",
                        movie.name,
                        movie.year,
                        format_rating(movie.rating)
                    ));
                    vec![PathBuf::from(band.directory_name()).join(name)]
                }
                None => Vec::new(),
            },
            OrganizePass::HighQuality => {
                if movie.has_image(ImageKind::Poster) && movie.has_image(ImageKind::Backdrop) {
                    vec![PathBuf::from(label)]
                } else {
                    Vec::new()
                }
            }
            OrganizePass::MissingImages => {
                if movie.images.missing().is_empty() {
                    Vec::new()
                } else {
                    vec![PathBuf::from(label)]
                }
            }
        }
    }
}

/// Directory name for `genre`. Names that would not stay inside the pass
/// directory land in [`UNKNOWN_GENRE`].
fn genre_directory(genre: &str) -> String {
    let name = sanitize_filename(genre);
    match name.as_str() {
        "" | "." | ".." => UNKNOWN_GENRE.to_string(),
        _ => name,
    }
}

impl fmt::Display for OrganizePass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.directory_name())
    }
}

/// Fixed rating bands; unrated movies (rating <= 0) belong to none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingBand {
    Excellent,
    Good,
    Fair,
    Mediocre,
    Poor,
}

impl RatingBand {
    pub fn for_rating(rating: f64) -> Option<RatingBand> {
        if rating.is_nan() || rating <= 0.0 {
            None
        } else if rating >= 8.0 {
            Some(RatingBand::Excellent)
        } else if rating >= 7.0 {
            Some(RatingBand::Good)
        } else if rating >= 6.0 {
            Some(RatingBand::Fair)
        } else if rating >= 5.0 {
            Some(RatingBand::Mediocre)
        } else {
            Some(RatingBand::Poor)
        }
    }

    pub fn directory_name(self) -> &'static str {
        match self {
            RatingBand::Excellent => "8.0-10.0",
            RatingBand::Good => "7.0-7.9",
            RatingBand::Fair => "6.0-6.9",
            RatingBand::Mediocre => "5.0-5.9",
            RatingBand::Poor => "0.0-4.9",
        }
    }
}

/// Shortest round-trip form of a rating, always with a decimal point
/// (`8.0`, `7.25`).
pub fn format_rating(rating: f64) -> String {
    format!("{:?}", rating)
}
