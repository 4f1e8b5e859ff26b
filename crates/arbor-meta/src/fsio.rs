//! # Filesystem Collaborator
//!
//! Thin JSON/filesystem layer consumed by the assemblers. Not-found is
//! not an error here: it comes back as `Ok(None)` and means "use
//! defaults". Every other failure is fatal and names the path.

use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::MetaError;

/// Read and parse a JSON file.
///
/// Returns `Ok(None)` when the file does not exist. Read failures map to
/// [`MetaError::Filesystem`], parse failures to [`MetaError::MalformedJson`].
pub fn read_json_file(path: &Path) -> Result<Option<Value>, MetaError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(MetaError::Filesystem {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    let value = serde_json::from_str(&text).map_err(|e| MetaError::MalformedJson {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(Some(value))
}

/// List the subdirectories of `dir`, sorted by name so traversal order
/// is deterministic for a given filesystem state.
pub fn list_subdirectories(dir: &Path) -> Result<Vec<PathBuf>, MetaError> {
    let entries = std::fs::read_dir(dir).map_err(|e| MetaError::Filesystem {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| MetaError::Filesystem {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}
