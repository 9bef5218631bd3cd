use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::StorageError;

/// Creates `path` and any missing parents.
pub fn ensure_directory(path: &Path) -> Result<(), StorageError> {
    if !path.is_dir() {
        std::fs::create_dir_all(path).map_err(|e| StorageError::CreateDirectory {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

/// Copies one file, overwriting `dst`. Returns the number of bytes copied.
pub fn copy_file(src: &Path, dst: &Path) -> Result<u64, StorageError> {
    std::fs::copy(src, dst).map_err(|e| StorageError::CopyFile {
        from: src.to_path_buf(),
        to: dst.to_path_buf(),
        source: e,
    })
}

/// Writes `value` as pretty-printed JSON (two-space indent, UTF-8).
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StorageError> {
    let content = serde_json::to_vec_pretty(value).map_err(|e| StorageError::Serialize {
        path: path.to_path_buf(),
        source: e,
    })?;
    std::fs::write(path, content).map_err(|e| StorageError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })
}

/// An output tree that the pipeline owns and may freely overwrite.
#[derive(Debug, Clone)]
pub struct FileStorage {
    output_directory: PathBuf,
}

impl FileStorage {
    pub fn new<P: AsRef<Path>>(output_directory: P) -> Self {
        Self {
            output_directory: output_directory.as_ref().to_path_buf(),
        }
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    /// Creates `relative_directory` under the output directory and returns
    /// its full path.
    pub fn directory<P: AsRef<Path>>(&self, relative_directory: P) -> Result<PathBuf, StorageError> {
        let dir_path = self.output_directory.join(relative_directory);
        ensure_directory(&dir_path)?;
        Ok(dir_path)
    }

    /// Creates every directory in `layout` under the output directory.
    pub fn prepare_layout(&self, layout: &[&str]) -> Result<(), StorageError> {
        for directory in layout {
            self.directory(directory)?;
        }
        Ok(())
    }

    pub fn write_json<T: Serialize + ?Sized>(
        &self,
        relative_directory: &str,
        filename: &str,
        value: &T,
    ) -> Result<PathBuf, StorageError> {
        let path = self.directory(relative_directory)?.join(filename);
        write_json(&path, value)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_json_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        let path = storage
            .write_json("metadata", "emby_movies.json", &vec!["Amélie"])
            .unwrap();

        assert_eq!(path, temp_dir.path().join("metadata/emby_movies.json"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Amélie"));
        assert!(content.starts_with("[\n  \""));
    }

    #[test]
    fn test_write_json_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path());

        storage.write_json("reports", "r.json", &1).unwrap();
        let path = storage.write_json("reports", "r.json", &2).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "2");
    }

    #[test]
    fn test_prepare_layout() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("out"));

        storage.prepare_layout(&["posters", "deep/nested"]).unwrap();

        assert!(temp_dir.path().join("out/posters").is_dir());
        assert!(temp_dir.path().join("out/deep/nested").is_dir());
    }

    #[test]
    fn test_copy_file_overwrites_target() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("poster.jpg");
        let dst = temp_dir.path().join("copy.jpg");
        std::fs::write(&src, b"new").unwrap();
        std::fs::write(&dst, b"old contents").unwrap();

        assert_eq!(copy_file(&src, &dst).unwrap(), 3);
        assert_eq!(std::fs::read(&dst).unwrap(), b"new");
    }

    #[test]
    fn test_copy_missing_source_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = copy_file(
            &temp_dir.path().join("missing.jpg"),
            &temp_dir.path().join("out.jpg"),
        );

        match result {
            Err(StorageError::CopyFile { from, .. }) => {
                assert!(from.to_string_lossy().contains("missing.jpg"));
            }
            other => panic!("Expected CopyFile error, got {:?}", other),
        }
    }

    #[test]
    fn test_directory_creation_failure() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();

        let result = ensure_directory(&blocker.join("child"));
        assert!(matches!(result, Err(StorageError::CreateDirectory { .. })));
    }
}
