use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::catalog::MovieRecord;
use crate::error::StorageError;
use crate::report::ExtractionReport;
use crate::storage::{copy_file, FileStorage};

/// Directories created under the output root before an extraction run.
pub const EXTRACTION_LAYOUT: &[&str] = &[
    "movies", "posters", "backdrops", "logos", "fanarts", "thumbs", "metadata", "reports",
];

/// Image copies attempted by one [`MetadataWriter::copy_images`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopySummary {
    pub copied: usize,
    pub failed: usize,
}

/// Writes extracted records, their images and reports into an output tree.
pub struct MetadataWriter {
    storage: FileStorage,
}

impl MetadataWriter {
    pub fn new<P: AsRef<Path>>(output_directory: P) -> Self {
        Self {
            storage: FileStorage::new(output_directory),
        }
    }

    pub fn output_directory(&self) -> &Path {
        self.storage.output_directory()
    }

    pub fn prepare(&self) -> Result<(), StorageError> {
        self.storage.prepare_layout(EXTRACTION_LAYOUT)
    }

    /// Writes `metadata/<label>_movies.json`, replacing any previous export.
    pub fn write_metadata(
        &self,
        records: &[MovieRecord],
        label: &str,
    ) -> Result<PathBuf, StorageError> {
        let path = self
            .storage
            .write_json("metadata", &format!("{}_movies.json", label), records)?;
        info!("Saved {} {} records to {}", records.len(), label, path.display());
        Ok(path)
    }

    /// Copies every present image to
    /// `<kind folder>/<label>/<name (year)>_<kind>.<ext>`.
    ///
    /// A failed copy is logged and counted; it never stops the others.
    pub fn copy_images(&self, records: &[MovieRecord], label: &str) -> CopySummary {
        let mut summary = CopySummary::default();

        for record in records {
            let stem = crate::sanitize::movie_label(record.name(), record.year());

            for (kind, source) in record.images().present() {
                if !source.is_file() {
                    debug!("{} image for '{}' vanished, skipping", kind, record.name());
                    continue;
                }

                let target_dir = match self
                    .storage
                    .directory(Path::new(kind.export_folder()).join(label))
                {
                    Ok(dir) => dir,
                    Err(e) => {
                        warn!("{}", e);
                        summary.failed += 1;
                        continue;
                    }
                };

                let target = target_dir.join(format!("{}_{}.{}", stem, kind, kind.extension()));
                match copy_file(source, &target) {
                    Ok(_) => summary.copied += 1,
                    Err(e) => {
                        warn!("{}", e);
                        summary.failed += 1;
                    }
                }
            }
        }

        info!(
            "Copied {} {} images ({} failed)",
            summary.copied, label, summary.failed
        );
        summary
    }

    /// Writes `reports/<source>_report.json`.
    pub fn write_report(&self, report: &ExtractionReport) -> Result<PathBuf, StorageError> {
        self.storage.write_json(
            "reports",
            &ExtractionReport::filename(&report.source),
            report,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{build_record, ImagePaths, RawMovieRow};
    use tempfile::TempDir;

    fn record(name: &str, images: ImagePaths) -> MovieRecord {
        let raw = RawMovieRow {
            id: Some("1".to_string()),
            name: Some(name.to_string()),
            production_year: Some(1994),
            ..Default::default()
        };
        build_record(raw, images, vec!["Drama".to_string()]).unwrap()
    }

    #[test]
    fn test_prepare_creates_layout() {
        let temp = TempDir::new().unwrap();
        let writer = MetadataWriter::new(temp.path().join("out"));
        writer.prepare().unwrap();
        for dir in EXTRACTION_LAYOUT {
            assert!(temp.path().join("out").join(dir).is_dir(), "{dir}");
        }
    }

    #[test]
    fn test_write_metadata_shape() {
        let temp = TempDir::new().unwrap();
        let writer = MetadataWriter::new(temp.path());
        let images = ImagePaths {
            poster: Some(PathBuf::from("/cache/poster.jpg")),
            ..Default::default()
        };

        let path = writer
            .write_metadata(&[record("Amélie", images)], "emby")
            .unwrap();

        assert_eq!(path, temp.path().join("metadata/emby_movies.json"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Amélie"));
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        let movie = &value[0];
        assert_eq!(movie["year"], 1994);
        assert_eq!(movie["runtime"], 0);
        assert_eq!(movie["metadata_hash"], "");
        assert_eq!(movie["images"]["poster"], "/cache/poster.jpg");
        assert_eq!(movie["images"]["thumb"], "");
    }

    #[test]
    fn test_copy_images_per_label() {
        let temp = TempDir::new().unwrap();
        let cache = temp.path().join("cache");
        std::fs::create_dir_all(&cache).unwrap();
        std::fs::write(cache.join("poster.jpg"), b"p").unwrap();
        std::fs::write(cache.join("logo.png"), b"l").unwrap();

        let images = ImagePaths {
            poster: Some(cache.join("poster.jpg")),
            logo: Some(cache.join("logo.png")),
            backdrop: Some(cache.join("missing.jpg")),
            ..Default::default()
        };
        let writer = MetadataWriter::new(temp.path().join("out"));

        let summary = writer.copy_images(&[record("Who: Me?", images)], "jellyfin");

        assert_eq!(summary, CopySummary { copied: 2, failed: 0 });
        let out = temp.path().join("out");
        assert!(out.join("posters/jellyfin/Who_ Me_ (1994)_poster.jpg").is_file());
        assert!(out.join("logos/jellyfin/Who_ Me_ (1994)_logo.png").is_file());
        assert!(!out.join("backdrops/jellyfin").exists());
    }

    #[test]
    fn test_copy_failure_is_isolated() {
        let temp = TempDir::new().unwrap();
        let cache = temp.path().join("cache");
        std::fs::create_dir_all(&cache).unwrap();
        std::fs::write(cache.join("poster.jpg"), b"p").unwrap();
        std::fs::write(cache.join("fanart.jpg"), b"f").unwrap();

        let out = temp.path().join("out");
        // A directory in the way of the poster copy.
        std::fs::create_dir_all(out.join("posters/emby/Heat (1994)_poster.jpg")).unwrap();

        let images = ImagePaths {
            poster: Some(cache.join("poster.jpg")),
            fanart: Some(cache.join("fanart.jpg")),
            ..Default::default()
        };
        let summary = MetadataWriter::new(&out).copy_images(&[record("Heat", images)], "emby");

        assert_eq!(summary, CopySummary { copied: 1, failed: 1 });
        assert!(out.join("fanarts/emby/Heat (1994)_fanart.jpg").is_file());
    }
}
