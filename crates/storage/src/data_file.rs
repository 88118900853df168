//! Typed JSON files on disk.
//!
//! A [`DataFile`] is a path plus the load/save conventions every plugin file
//! shares: a missing file is "no data yet", a malformed file is an error, and
//! saves are pretty-printed and written atomically.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bevy::log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::atomic_write::atomic_write;
use crate::storage_error::StorageError;

/// File extension used for every plugin file.
pub const EXTENSION: &str = "json";

/// A JSON file holding one serialized value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFile {
    path: PathBuf,
}

impl DataFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `{dir}/{name}.json`.
    pub fn in_dir(dir: impl AsRef<Path>, name: &str) -> Self {
        Self::new(dir.as_ref().join(format!("{name}.{EXTENSION}")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read and parse the file. `Ok(None)` when it does not exist.
    pub fn load<T: DeserializeOwned>(&self) -> Result<Option<T>, StorageError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StorageError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| StorageError::Json {
                path: self.path.clone(),
                source,
            })
    }

    /// Like [`DataFile::load`], but a missing file yields `T::default()`.
    pub fn load_or_default<T: DeserializeOwned + Default>(&self) -> Result<T, StorageError> {
        match self.load()? {
            Some(value) => Ok(value),
            None => {
                debug!("{} not found, starting empty", self.path.display());
                Ok(T::default())
            }
        }
    }

    /// Serialize `value` and replace the file contents atomically.
    pub fn save<T: Serialize>(&self, value: &T) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(value).map_err(|source| StorageError::Json {
            path: self.path.clone(),
            source,
        })?;
        atomic_write(&self.path, &bytes).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
