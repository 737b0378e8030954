//! Error types.
//!
//! `IoError` and `PrintError` are what commands can fail with; the
//! dispatcher turns a `CommandError` into a critical message dialog.
//! `ConfigError` is fatal at startup.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A file read or write that failed, with the path involved.
#[derive(Debug, Error)]
#[error("{}: {source}", .path.display())]
pub struct IoError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl IoError {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}

#[derive(Debug, Error)]
pub enum PrintError {
    #[error("{program}: {source}")]
    Spooler {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("{program} exited with {status}")]
    Failed { program: String, status: String },
    #[error(transparent)]
    Io(#[from] IoError),
}

/// Why a command did not complete.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Io(#[from] IoError),
    #[error("printing failed: {0}")]
    Print(#[from] PrintError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config {}: {message}", .path.display())]
    Invalid { path: PathBuf, message: String },
}
