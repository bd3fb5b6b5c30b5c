//! Configuration directory scanner.
//!
//! # Responsibilities
//! - List top-level regular files in one directory
//! - Keep only files with the configured extension
//! - Report set name (extension stripped) and modification time
//!
//! # Design Decisions
//! - A missing directory means "no sets", not an error
//! - Unreadable entries are skipped; only a failed listing is an error
//! - Output sorted by name so passes are deterministic

use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

/// Default extension of configuration files.
pub const DEFAULT_EXTENSION: &str = "properties";

/// Error raised when the directory exists but cannot be listed.
#[derive(Debug, Error)]
#[error("failed to list config directory {path}: {source}")]
pub struct ScanError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// A candidate configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    pub name: String,
    pub path: PathBuf,
    pub last_modified: SystemTime,
}

/// Lists configuration files in a single directory.
#[derive(Debug, Clone)]
pub struct ConfigDirectoryScanner {
    dir: PathBuf,
    suffix: String,
}

impl ConfigDirectoryScanner {
    /// Create a scanner for `dir` matching files ending in `.<extension>`.
    pub fn new(dir: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            dir: dir.into(),
            suffix: format!(".{}", extension.trim_start_matches('.')),
        }
    }

    /// Scanner for `.properties` files in `dir`.
    pub fn properties(dir: impl Into<PathBuf>) -> Self {
        Self::new(dir, DEFAULT_EXTENSION)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Enumerate candidate files.
    pub fn scan(&self) -> Result<Vec<ScannedFile>, ScanError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(dir = %self.dir.display(), "Config directory missing, no sets");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(ScanError {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(dir = %self.dir.display(), error = %e, "Skipping unreadable directory entry");
                    continue;
                }
            };

            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            let Some(name) = file_name.strip_suffix(self.suffix.as_str()) else {
                continue;
            };
            if name.is_empty() {
                continue;
            }

            let path = entry.path();
            let metadata = match std::fs::metadata(&path) {
                Ok(m) => m,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping config file without metadata");
                    continue;
                }
            };
            if !metadata.is_file() {
                continue;
            }
            let last_modified = match metadata.modified() {
                Ok(t) => t,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping config file without mtime");
                    continue;
                }
            };

            files.push(ScannedFile {
                name: name.to_string(),
                path,
                last_modified,
            });
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let scanner = ConfigDirectoryScanner::properties(dir.path().join("absent"));
        assert!(scanner.scan().unwrap().is_empty());
    }

    #[test]
    fn test_filters_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("shop.properties"), "a=1").unwrap();
        std::fs::write(dir.path().join("base.properties"), "b=2").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        std::fs::write(dir.path().join("shop.properties.bak"), "ignored").unwrap();
        std::fs::write(dir.path().join(".properties"), "ignored").unwrap();

        let files = ConfigDirectoryScanner::properties(dir.path()).scan().unwrap();
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["base", "shop"]);
        assert_eq!(files[1].path, dir.path().join("shop.properties"));
    }

    #[test]
    fn test_non_recursive() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested.properties")).unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("inner.properties"), "a=1").unwrap();

        let files = ConfigDirectoryScanner::properties(dir.path()).scan().unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_custom_extension() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.conf"), "a=1").unwrap();
        std::fs::write(dir.path().join("app.properties"), "a=1").unwrap();

        let files = ConfigDirectoryScanner::new(dir.path(), ".conf").scan().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "app");
    }

    #[test]
    fn test_reports_modification_time() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("base.properties");
        std::fs::write(&path, "updateType=auto").unwrap();
        let expected = std::fs::metadata(&path).unwrap().modified().unwrap();

        let files = ConfigDirectoryScanner::properties(dir.path()).scan().unwrap();
        assert_eq!(files[0].last_modified, expected);
    }
}
