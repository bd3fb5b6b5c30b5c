//! Parsed configuration set.

use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

use crate::properties::parser::{self, ParseError};

/// Error type for loading a single properties file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File could not be read (missing, permissions).
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File content is not valid properties syntax.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// The parsed key/value contents of one configuration file.
///
/// Immutable once built. The store shares sets as `Arc<ConfigSet>` and
/// replaces them whole, so a holder never sees a half-updated mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigSet {
    /// Set name (file name without extension).
    pub name: String,

    /// File the set was parsed from.
    pub source_path: PathBuf,

    /// Modification time observed when the set was parsed.
    pub last_modified: SystemTime,

    /// Key/value pairs.
    pub entries: HashMap<String, String>,
}

impl ConfigSet {
    /// Read and parse `path` as the set `name`.
    pub fn from_file(
        name: impl Into<String>,
        path: &Path,
        last_modified: SystemTime,
    ) -> Result<Self, LoadError> {
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let content = decode(bytes);
        let entries = parser::parse(&content).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            name: name.into(),
            source_path: path.to_path_buf(),
            last_modified,
            entries,
        })
    }

    /// Look up a raw value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over key/value pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// UTF-8 when valid, otherwise ISO-8859-1, where every byte maps to one char.
fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().iter().map(|&b| b as char).collect(),
    }
}

/// One-shot load of a single properties file, with no reload tracking.
///
/// The set is named after the file stem.
pub fn load_file(path: &Path) -> Result<ConfigSet, LoadError> {
    let io_err = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };
    let last_modified = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(io_err)?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    ConfigSet::from_file(name, path, last_modified)
}
