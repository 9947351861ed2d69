use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::engine::paste::normalize_pasted;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path} has no text to practise")]
    Empty { path: PathBuf },
}

/// Reads a target text from disk, cleaned the same way as pasted text.
pub fn load_text(path: &Path) -> Result<String, SourceError> {
    let raw = fs::read_to_string(path).map_err(|source| SourceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = normalize_pasted(&raw);
    if text.is_empty() {
        return Err(SourceError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_and_normalizes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("text.txt");
        fs::write(&path, "one  two\r\n\r\n\r\nthree\n").unwrap();
        assert_eq!(load_text(&path).unwrap(), "one two\n\nthree");
    }

    #[test]
    fn whitespace_only_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.txt");
        fs::write(&path, " \n\t\n").unwrap();
        assert!(matches!(load_text(&path), Err(SourceError::Empty { .. })));
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_text(&dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, SourceError::Read { .. }));
        assert!(err.to_string().contains("nope.txt"));
    }
}
