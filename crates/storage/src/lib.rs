//! Durable storage for plugin configuration and data files.
//!
//! Everything here is JSON on disk. Writes go through [`atomic_write`] so a
//! crash mid-write never leaves a half-written file behind for the next load.

mod atomic_write;
pub mod data_file;
mod storage_error;

pub use atomic_write::atomic_write;
pub use data_file::DataFile;
pub use storage_error::StorageError;
