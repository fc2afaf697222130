use log::error;
use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("File not found at '{}'.", .path.display())]
    NotFound { path: PathBuf },
    #[error("Could not decode JSON from '{}': {source}", .path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("An unexpected error occurred while reading '{}': {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}

impl LoadError {
    pub fn path(&self) -> &Path {
        match self {
            LoadError::NotFound { path }
            | LoadError::Malformed { path, .. }
            | LoadError::Io { path, .. } => path,
        }
    }
}

/// Reads the whole file at `path` and parses it as JSON.
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<Value, LoadError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    serde_json::from_slice(&bytes).map_err(|source| LoadError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Like [`load_document`], but logs the failure and hands back `None`.
pub fn load_or_report<P: AsRef<Path>>(path: P) -> Option<Value> {
    match load_document(path) {
        Ok(document) => Some(document),
        Err(e) => {
            error!("{}", e);
            None
        }
    }
}

#[cfg(test)]
use serde_json::json;

#[cfg(test)]
fn write_temp(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn loads_valid_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp(&dir, "test.json", r#"{"key": "value"}"#);

    let document = load_document(&path).unwrap();
    assert_eq!(document, json!({"key": "value"}));
}

#[test]
fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("non_existent_file.json");

    let err = load_document(&path).unwrap_err();
    assert!(matches!(err, LoadError::NotFound { .. }));
    assert_eq!(err.path(), path.as_path());
    assert!(err.to_string().starts_with("File not found at '"));
    assert!(load_or_report(&path).is_none());
}

#[test]
fn single_quoted_json_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp(&dir, "malformed.json", "{'key': 'value'}");

    let err = load_document(&path).unwrap_err();
    assert!(matches!(err, LoadError::Malformed { .. }));
    assert!(err.to_string().starts_with("Could not decode JSON from '"));
    assert!(load_or_report(&path).is_none());
}

#[test]
fn invalid_utf8_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("binary.json");
    std::fs::write(&path, [b'"', 0xff, 0xfe, b'"']).unwrap();

    assert!(matches!(
        load_document(&path),
        Err(LoadError::Malformed { .. })
    ));
}

#[test]
fn directory_is_io_error() {
    let dir = tempfile::tempdir().unwrap();

    let err = load_document(dir.path()).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
    assert!(err
        .to_string()
        .starts_with("An unexpected error occurred while reading '"));
}

#[test]
fn number_beyond_float_range_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_temp(&dir, "huge.json", r#"[{"title": "W", "price": 1e400}]"#);

    assert!(matches!(
        load_document(&path),
        Err(LoadError::Malformed { .. })
    ));
}
