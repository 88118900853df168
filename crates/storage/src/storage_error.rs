// ---------------------------------------------------------------------------
// StorageError: error type for config and data file I/O
// ---------------------------------------------------------------------------

use std::fmt;
use std::path::PathBuf;

/// Errors that can occur while reading or writing a JSON file.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error (permission denied, disk full, etc.). Carries the file path.
    Io { path: PathBuf, source: std::io::Error },
    /// The file exists but does not contain the expected JSON shape.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl StorageError {
    /// Path of the file the failed operation targeted.
    pub fn path(&self) -> &std::path::Path {
        match self {
            StorageError::Io { path, .. } | StorageError::Json { path, .. } => path,
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io { path, source } => {
                write!(f, "I/O error on {}: {source}", path.display())
            }
            StorageError::Json { path, source } => {
                write!(f, "Malformed JSON in {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io { source, .. } => Some(source),
            StorageError::Json { source, .. } => Some(source),
        }
    }
}
