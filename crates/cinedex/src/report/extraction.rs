use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{ImageKind, MovieRecord};

use super::{bump, now_rfc3339, write_heading, write_row, Histogram};

/// Per-movie line of an extraction report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub name: String,
    pub year: i32,
    pub rating: f64,
    pub has_poster: bool,
    pub has_backdrop: bool,
    pub has_logo: bool,
    pub has_fanart: bool,
    pub has_thumb: bool,
}

impl MovieSummary {
    fn from_record(record: &MovieRecord) -> Self {
        Self {
            name: record.name().to_string(),
            year: record.year(),
            rating: record.rating(),
            has_poster: record.has_image(ImageKind::Poster),
            has_backdrop: record.has_image(ImageKind::Backdrop),
            has_logo: record.has_image(ImageKind::Logo),
            has_fanart: record.has_image(ImageKind::Fanart),
            has_thumb: record.has_image(ImageKind::Thumb),
        }
    }
}

/// What one source's extraction produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub extraction_date: String,
    pub source: String,
    pub total_movies: usize,
    pub movies_with_posters: usize,
    pub movies_with_backdrops: usize,
    pub movies_with_logos: usize,
    pub movies_with_fanarts: usize,
    pub movies_with_thumbs: usize,
    pub genres: Histogram,
    pub years: Histogram,
    pub movies: Vec<MovieSummary>,
}

impl ExtractionReport {
    pub fn build(records: &[MovieRecord], source: &str) -> Self {
        let with = |kind: ImageKind| records.iter().filter(|r| r.has_image(kind)).count();

        let mut genres = Histogram::new();
        let mut years = Histogram::new();
        for record in records {
            for genre in record.genres() {
                bump(&mut genres, genre.as_str());
            }
            if record.year() > 0 {
                bump(&mut years, record.year().to_string());
            }
        }

        Self {
            extraction_date: now_rfc3339(),
            source: source.to_string(),
            total_movies: records.len(),
            movies_with_posters: with(ImageKind::Poster),
            movies_with_backdrops: with(ImageKind::Backdrop),
            movies_with_logos: with(ImageKind::Logo),
            movies_with_fanarts: with(ImageKind::Fanart),
            movies_with_thumbs: with(ImageKind::Thumb),
            genres,
            years,
            movies: records.iter().map(MovieSummary::from_record).collect(),
        }
    }

    pub fn filename(source: &str) -> String {
        format!("{}_report.json", source)
    }
}

impl fmt::Display for ExtractionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_heading(f, &format!("{} SUMMARY", self.source.to_uppercase()))?;
        write_row(f, "Total movies", self.total_movies)?;
        write_row(f, "With poster", self.movies_with_posters)?;
        write_row(f, "With backdrop", self.movies_with_backdrops)?;
        write_row(f, "With logo", self.movies_with_logos)?;
        write_row(f, "With fanart", self.movies_with_fanarts)?;
        write_row(f, "With thumb", self.movies_with_thumbs)?;
        write_row(f, "Genres", self.genres.len())?;
        write_row(f, "Distinct years", self.years.len())
    }
}
