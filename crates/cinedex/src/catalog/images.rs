use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The image kinds a media server caches next to each library item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Poster,
    Backdrop,
    Logo,
    Fanart,
    Thumb,
}

impl ImageKind {
    pub const ALL: [ImageKind; 5] = [
        ImageKind::Poster,
        ImageKind::Backdrop,
        ImageKind::Logo,
        ImageKind::Fanart,
        ImageKind::Thumb,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ImageKind::Poster => "poster",
            ImageKind::Backdrop => "backdrop",
            ImageKind::Logo => "logo",
            ImageKind::Fanart => "fanart",
            ImageKind::Thumb => "thumb",
        }
    }

    /// File name inside a server's metadata cache directory.
    pub fn cache_filename(self) -> &'static str {
        match self {
            ImageKind::Poster => "poster.jpg",
            ImageKind::Backdrop => "backdrop1.jpg",
            ImageKind::Logo => "logo.png",
            ImageKind::Fanart => "fanart.jpg",
            ImageKind::Thumb => "thumb.jpg",
        }
    }

    /// File name used inside an organized movie directory.
    pub fn organized_filename(self) -> &'static str {
        match self {
            ImageKind::Poster => "poster.jpg",
            ImageKind::Backdrop => "backdrop.jpg",
            ImageKind::Logo => "logo.png",
            ImageKind::Fanart => "fanart.jpg",
            ImageKind::Thumb => "thumb.jpg",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageKind::Logo => "png",
            _ => "jpg",
        }
    }

    /// Export folder under the extraction output directory.
    pub fn export_folder(self) -> &'static str {
        match self {
            ImageKind::Poster => "posters",
            ImageKind::Backdrop => "backdrops",
            ImageKind::Logo => "logos",
            ImageKind::Fanart => "fanarts",
            ImageKind::Thumb => "thumbs",
        }
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One optional path per [`ImageKind`].
///
/// Serialized as an object with all five keys; an absent image is written
/// as an empty string, and an empty string or missing key reads back as
/// absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImagePaths {
    #[serde(default, with = "empty_as_none")]
    pub poster: Option<PathBuf>,
    #[serde(default, with = "empty_as_none")]
    pub backdrop: Option<PathBuf>,
    #[serde(default, with = "empty_as_none")]
    pub logo: Option<PathBuf>,
    #[serde(default, with = "empty_as_none")]
    pub fanart: Option<PathBuf>,
    #[serde(default, with = "empty_as_none")]
    pub thumb: Option<PathBuf>,
}

impl ImagePaths {
    pub fn get(&self, kind: ImageKind) -> Option<&Path> {
        match kind {
            ImageKind::Poster => self.poster.as_deref(),
            ImageKind::Backdrop => self.backdrop.as_deref(),
            ImageKind::Logo => self.logo.as_deref(),
            ImageKind::Fanart => self.fanart.as_deref(),
            ImageKind::Thumb => self.thumb.as_deref(),
        }
    }

    fn slot_mut(&mut self, kind: ImageKind) -> &mut Option<PathBuf> {
        match kind {
            ImageKind::Poster => &mut self.poster,
            ImageKind::Backdrop => &mut self.backdrop,
            ImageKind::Logo => &mut self.logo,
            ImageKind::Fanart => &mut self.fanart,
            ImageKind::Thumb => &mut self.thumb,
        }
    }

    pub fn has(&self, kind: ImageKind) -> bool {
        self.get(kind).is_some()
    }

    /// Present images in kind order.
    pub fn present(&self) -> impl Iterator<Item = (ImageKind, &Path)> + '_ {
        ImageKind::ALL
            .into_iter()
            .filter_map(move |kind| self.get(kind).map(|path| (kind, path)))
    }

    /// Missing kinds in kind order.
    pub fn missing(&self) -> Vec<ImageKind> {
        ImageKind::ALL
            .into_iter()
            .filter(|kind| !self.has(*kind))
            .collect()
    }
}

mod empty_as_none {
    use std::path::PathBuf;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<PathBuf>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(path) => serializer.serialize_str(&path.to_string_lossy()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<PathBuf>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.filter(|s| !s.is_empty()).map(PathBuf::from))
    }
}

/// Finds cached images for a content hash under one server's metadata root.
///
/// The cache is sharded as `<root>/<hash[0:2]>/<hash>/`.
#[derive(Debug, Clone)]
pub struct ImageLocator {
    metadata_root: PathBuf,
    thumbnails: bool,
}

impl ImageLocator {
    pub fn new<P: AsRef<Path>>(metadata_root: P, thumbnails: bool) -> Self {
        Self {
            metadata_root: metadata_root.as_ref().to_path_buf(),
            thumbnails,
        }
    }

    pub fn metadata_root(&self) -> &Path {
        &self.metadata_root
    }

    pub fn thumbnails(&self) -> bool {
        self.thumbnails
    }

    /// Directory holding the images for `hash`, or `None` for an empty hash.
    pub fn item_directory(&self, hash: &str) -> Option<PathBuf> {
        let shard = hash.get(..2)?;
        Some(self.metadata_root.join(shard).join(hash))
    }

    pub fn locate(&self, hash: &str) -> ImagePaths {
        let mut images = ImagePaths::default();
        let Some(directory) = self.item_directory(hash) else {
            return images;
        };

        for kind in ImageKind::ALL {
            if kind == ImageKind::Thumb && !self.thumbnails {
                continue;
            }
            let candidate = directory.join(kind.cache_filename());
            if candidate.is_file() {
                *images.slot_mut(kind) = Some(candidate);
            }
        }

        images
    }
}
