//! Flat-file persistence.
//!
//! # Responsibility
//! - Define repository contracts for notes and jobs.
//! - Read and write JSON documents with atomic replacement.
//! - Append activity log lines.
//!
//! # Invariants
//! - A missing document reads as empty; a malformed one is an error and is
//!   never overwritten.
//! - Writes go to a temp file in the target directory and are then renamed
//!   over the target, so readers never see a half-written document.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub mod activity_log;
pub mod job_store;
pub mod note_store;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-layer failure.
#[derive(Debug)]
pub enum StoreError {
    /// File exists but could not be read or written.
    Io { path: PathBuf, source: io::Error },
    /// File content is not the expected JSON shape.
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Persisted data violates a model invariant.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot access `{}`: {source}", path.display())
            }
            Self::Malformed { path, source } => {
                write!(f, "`{}` is not valid data: {source}", path.display())
            }
            Self::InvalidData(message) => write!(f, "invalid stored data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Malformed { source, .. } => Some(source),
            Self::InvalidData(_) => None,
        }
    }
}

impl StoreError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Reads a JSON document, returning `None` when the file does not exist.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> StoreResult<Option<T>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(StoreError::io(path, err)),
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StoreError::Malformed {
            path: path.to_path_buf(),
            source,
        })
}

/// Serializes `value` as pretty JSON and atomically replaces `path`.
pub(crate) fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> StoreResult<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|err| StoreError::io(parent, err))?;

    let json = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;

    let mut tmp = NamedTempFile::new_in(parent).map_err(|err| StoreError::io(parent, err))?;
    let tmp_path = tmp.path().to_path_buf();
    tmp.write_all(&json)
        .map_err(|err| StoreError::io(&tmp_path, err))?;
    tmp.write_all(b"\n")
        .map_err(|err| StoreError::io(&tmp_path, err))?;
    tmp.as_file()
        .sync_all()
        .map_err(|err| StoreError::io(&tmp_path, err))?;
    tmp.persist(path)
        .map_err(|err| StoreError::io(path, err.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{read_json, write_json_atomic, StoreError};
    use std::collections::BTreeMap;
    use std::fs;

    #[test]
    fn missing_and_empty_files_read_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(read_json::<Vec<String>>(&path).unwrap().is_none());

        fs::write(&path, "  \n").unwrap();
        assert!(read_json::<Vec<String>>(&path).unwrap().is_none());
    }

    #[test]
    fn write_creates_parent_directories_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("doc.json");
        let mut doc = BTreeMap::new();
        doc.insert("k".to_string(), 1_u32);

        write_json_atomic(&path, &doc).unwrap();
        let loaded: BTreeMap<String, u32> = read_json(&path).unwrap().unwrap();
        assert_eq!(loaded, doc);

        let entries = fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();
        let err = read_json::<BTreeMap<String, u32>>(&path).unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
    }
}
