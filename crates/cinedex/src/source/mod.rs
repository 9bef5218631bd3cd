//! Media server library sources.
//!
//! Emby and Jellyfin share the same library schema and cache layout; they
//! differ only in where their files live and whether thumbnails are cached.
//! Both are described by a [`SourceSystem`] and read by the same
//! [`LibraryReader`].

pub mod reader;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::ImageLocator;

pub use reader::{LibraryReader, DEFAULT_EXCLUDED_PREFIXES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Emby,
    Jellyfin,
}

impl SourceKind {
    /// Label used in output file names (`<label>_movies.json`).
    pub fn label(self) -> &'static str {
        match self {
            SourceKind::Emby => "emby",
            SourceKind::Jellyfin => "jellyfin",
        }
    }

    /// Whether the server keeps a `thumb.jpg` in its image cache.
    pub fn caches_thumbnails(self) -> bool {
        matches!(self, SourceKind::Emby)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which sources a run should touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceSelection {
    Emby,
    Jellyfin,
    #[default]
    Both,
}

impl SourceSelection {
    pub fn includes(self, kind: SourceKind) -> bool {
        matches!(
            (self, kind),
            (SourceSelection::Both, _)
                | (SourceSelection::Emby, SourceKind::Emby)
                | (SourceSelection::Jellyfin, SourceKind::Jellyfin)
        )
    }

    /// Selected kinds in processing order (emby first).
    pub fn kinds(self) -> Vec<SourceKind> {
        [SourceKind::Emby, SourceKind::Jellyfin]
            .into_iter()
            .filter(|k| self.includes(*k))
            .collect()
    }
}

impl FromStr for SourceSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "emby" => Ok(SourceSelection::Emby),
            "jellyfin" => Ok(SourceSelection::Jellyfin),
            "both" => Ok(SourceSelection::Both),
            other => Err(format!(
                "unknown source '{}', expected emby, jellyfin or both",
                other
            )),
        }
    }
}

/// Where one media server keeps its library database and image cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SourceSystemEntry")]
pub struct SourceSystem {
    pub kind: SourceKind,
    /// Library database, relative to the config directory unless absolute.
    pub database: PathBuf,
    /// Root of the hash-sharded image cache.
    pub metadata_root: PathBuf,
    /// Whether the server caches `thumb.jpg` images at all.
    pub thumbnails: bool,
}

/// Config file form of [`SourceSystem`]; `thumbnails` falls back to what
/// the server kind supports.
#[derive(Deserialize)]
struct SourceSystemEntry {
    kind: SourceKind,
    database: PathBuf,
    metadata_root: PathBuf,
    thumbnails: Option<bool>,
}

impl From<SourceSystemEntry> for SourceSystem {
    fn from(entry: SourceSystemEntry) -> Self {
        Self {
            kind: entry.kind,
            database: entry.database,
            metadata_root: entry.metadata_root,
            thumbnails: entry
                .thumbnails
                .unwrap_or_else(|| entry.kind.caches_thumbnails()),
        }
    }
}

impl SourceSystem {
    pub fn emby() -> Self {
        Self {
            kind: SourceKind::Emby,
            database: PathBuf::from("emby-config/data/library.db"),
            metadata_root: PathBuf::from("emby-config/metadata/library"),
            thumbnails: SourceKind::Emby.caches_thumbnails(),
        }
    }

    pub fn jellyfin() -> Self {
        Self {
            kind: SourceKind::Jellyfin,
            database: PathBuf::from("config/data/library.db"),
            metadata_root: PathBuf::from("config/metadata/library"),
            thumbnails: SourceKind::Jellyfin.caches_thumbnails(),
        }
    }

    pub fn defaults() -> Vec<Self> {
        vec![Self::emby(), Self::jellyfin()]
    }

    pub fn database_path(&self, config_directory: &Path) -> PathBuf {
        config_directory.join(&self.database)
    }

    pub fn image_locator(&self, config_directory: &Path) -> ImageLocator {
        ImageLocator::new(config_directory.join(&self.metadata_root), self.thumbnails)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_includes() {
        assert!(SourceSelection::Both.includes(SourceKind::Emby));
        assert!(SourceSelection::Both.includes(SourceKind::Jellyfin));
        assert!(SourceSelection::Emby.includes(SourceKind::Emby));
        assert!(!SourceSelection::Emby.includes(SourceKind::Jellyfin));
        assert_eq!(
            SourceSelection::Both.kinds(),
            vec![SourceKind::Emby, SourceKind::Jellyfin]
        );
        assert_eq!(SourceSelection::Jellyfin.kinds(), vec![SourceKind::Jellyfin]);
    }

    #[test]
    fn test_selection_from_str() {
        assert_eq!("Emby".parse::<SourceSelection>(), Ok(SourceSelection::Emby));
        assert_eq!("both".parse::<SourceSelection>(), Ok(SourceSelection::Both));
        assert!("plex".parse::<SourceSelection>().is_err());
    }

    #[test]
    fn test_default_systems_differ_in_thumbnail_support() {
        assert!(SourceSystem::emby().thumbnails);
        assert!(!SourceSystem::jellyfin().thumbnails);
    }

    #[test]
    fn test_thumbnail_support_defaults_by_kind() {
        let systems: Vec<SourceSystem> = serde_json::from_str(
            r#"[
                {"kind": "emby", "database": "e.db", "metadata_root": "e"},
                {"kind": "jellyfin", "database": "j.db", "metadata_root": "j"},
                {"kind": "emby", "database": "e.db", "metadata_root": "e", "thumbnails": false}
            ]"#,
        )
        .unwrap();

        assert!(systems[0].thumbnails);
        assert!(!systems[1].thumbnails);
        assert!(!systems[2].thumbnails);
    }

    #[test]
    fn test_paths_resolve_against_config_directory() {
        let system = SourceSystem::jellyfin();
        assert_eq!(
            system.database_path(Path::new("/srv")),
            PathBuf::from("/srv/config/data/library.db")
        );
        assert_eq!(
            system.image_locator(Path::new("/srv")).metadata_root(),
            Path::new("/srv/config/metadata/library")
        );

        let absolute = SourceSystem {
            database: PathBuf::from("/abs/library.db"),
            ..SourceSystem::emby()
        };
        assert_eq!(
            absolute.database_path(Path::new("/srv")),
            PathBuf::from("/abs/library.db")
        );
    }
}
