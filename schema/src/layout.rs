//! Crate directory layout: locating, reading and writing the metadata file,
//! and copying data files into the crate.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{CrateError, Result};

/// Finds the metadata file for `path`.
///
/// `path` may be the metadata file itself, a directory containing it, or a
/// directory tree holding it somewhere below (the first match in file-name
/// order wins).
///
/// # Errors
///
/// Returns [`CrateError::MetadataNotFound`] when no file named `file_name`
/// exists at or below `path`.
pub fn locate_metadata(path: &Path, file_name: &str) -> Result<PathBuf> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    if path.is_dir() {
        let direct = path.join(file_name);
        if direct.is_file() {
            return Ok(direct);
        }
        let found = WalkDir::new(path)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .find(|e| e.file_type().is_file() && e.file_name() == file_name);
        if let Some(entry) = found {
            debug!(path = %entry.path().display(), "found nested metadata file");
            return Ok(entry.into_path());
        }
    }
    Err(CrateError::MetadataNotFound {
        path: path.to_path_buf(),
        file: file_name.to_string(),
    })
}

/// Reads and parses a JSON document.
///
/// # Errors
///
/// Returns [`CrateError::Io`] if the file cannot be read and
/// [`CrateError::Json`] if it is not valid JSON.
pub fn read_document(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).map_err(|source| CrateError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CrateError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes `doc` pretty-printed to `dir/file_name`, creating `dir` if needed.
///
/// # Errors
///
/// Returns [`CrateError::Io`] if the directory or file cannot be written.
pub fn write_document(dir: &Path, file_name: &str, doc: &Value) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|source| CrateError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(file_name);
    let text = serde_json::to_string_pretty(doc).map_err(|source| CrateError::Json {
        path: path.clone(),
        source,
    })?;
    fs::write(&path, text + "\n").map_err(|source| CrateError::Io {
        path: path.clone(),
        source,
    })?;
    debug!(path = %path.display(), "wrote metadata file");
    Ok(path)
}

/// Copies `source` to `dir/id`, creating parent directories. A source that
/// already is the destination is left alone.
///
/// # Errors
///
/// Returns [`CrateError::Io`] if a directory cannot be created or the copy
/// fails.
pub fn copy_into(dir: &Path, id: &str, source: &Path) -> Result<PathBuf> {
    let dest = dir.join(id);
    if let (Ok(a), Ok(b)) = (fs::canonicalize(source), fs::canonicalize(&dest)) {
        if a == b {
            return Ok(dest);
        }
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|source| CrateError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::copy(source, &dest).map_err(|err| CrateError::Io {
        path: source.to_path_buf(),
        source: err,
    })?;
    debug!(from = %source.display(), to = %dest.display(), "copied file into crate");
    Ok(dest)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    const FILE: &str = "ro-crate-metadata.json";

    #[test]
    fn finds_file_directly_and_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let written = write_document(&nested, FILE, &json!({"@graph": []})).unwrap();

        assert_eq!(locate_metadata(dir.path(), FILE).unwrap(), written);
        assert_eq!(locate_metadata(&nested, FILE).unwrap(), written);
        assert_eq!(locate_metadata(&written, FILE).unwrap(), written);
        assert_eq!(read_document(&written).unwrap(), json!({"@graph": []}));
    }

    #[test]
    fn copies_into_nested_paths() {
        let src_dir = tempfile::tempdir().unwrap();
        let source = src_dir.path().join("a.csv");
        fs::write(&source, "x,y\n").unwrap();
        let crate_dir = tempfile::tempdir().unwrap();

        let dest = copy_into(crate_dir.path(), "data/a.csv", &source).unwrap();
        assert_eq!(dest, crate_dir.path().join("data").join("a.csv"));
        assert_eq!(fs::read_to_string(&dest).unwrap(), "x,y\n");
        assert_eq!(copy_into(crate_dir.path(), "data/a.csv", &dest).unwrap(), dest);
        assert!(matches!(
            copy_into(crate_dir.path(), "b.csv", &src_dir.path().join("absent")),
            Err(CrateError::Io { .. })
        ));
    }

    #[test]
    fn missing_and_invalid_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            locate_metadata(dir.path(), FILE),
            Err(CrateError::MetadataNotFound { .. })
        ));
        let bad = dir.path().join(FILE);
        fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(read_document(&bad), Err(CrateError::Json { .. })));
        assert!(matches!(
            read_document(&dir.path().join("absent.json")),
            Err(CrateError::Io { .. })
        ));
    }
}
