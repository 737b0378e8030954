//! Whole-file text I/O.
//!
//! Files are read and written in one piece as UTF-8. Writes create or
//! truncate the target; they are not atomic.

use std::fs;
use std::path::Path;

use log::debug;

use crate::error::IoError;

/// Read the whole file at `path`.
///
/// # Errors
///
/// Returns an [`IoError`] naming `path` if the file cannot be read or is
/// not valid UTF-8.
pub fn read_text(path: &Path) -> Result<String, IoError> {
    let text = fs::read_to_string(path).map_err(|e| IoError::new(path, e))?;
    debug!("read {} bytes from {}", text.len(), path.display());
    Ok(text)
}

/// Create or truncate `path` and write `text` to it.
///
/// # Errors
///
/// Returns an [`IoError`] naming `path` if the file cannot be written.
pub fn write_text(path: &Path, text: &str) -> Result<(), IoError> {
    fs::write(path, text).map_err(|e| IoError::new(path, e))?;
    debug!("wrote {} bytes to {}", text.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.txt");
        write_text(&path, "line one\nline two\n").unwrap();
        assert_eq!(read_text(&path).unwrap(), "line one\nline two\n");
    }

    #[test]
    fn write_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("note.txt");
        write_text(&path, "a much longer first version").unwrap();
        write_text(&path, "short").unwrap();
        assert_eq!(read_text(&path).unwrap(), "short");
    }

    #[test]
    fn missing_file_error_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");
        let err = read_text(&path).unwrap_err();
        assert_eq!(err.path, path);
        assert!(err.to_string().starts_with(&path.display().to_string()));
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bin.dat");
        fs::write(&path, [0xFF, 0xFE, 0x00]).unwrap();
        assert!(read_text(&path).is_err());
    }

    #[test]
    fn writing_into_a_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("x.txt");
        assert!(write_text(&path, "x").is_err());
    }
}
