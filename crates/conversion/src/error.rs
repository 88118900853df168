use std::fmt;

use storage::StorageError;

/// Errors that stop the plugin from loading.
#[derive(Debug)]
pub enum PluginError {
    /// The config file could not be read, parsed, or rewritten.
    Config(StorageError),
    /// The per-player data file could not be read or parsed.
    Data(StorageError),
    /// The config parsed but is unusable (e.g. an empty chat command).
    InvalidConfig(String),
}

impl fmt::Display for PluginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginError::Config(e) => write!(f, "Config error: {e}"),
            PluginError::Data(e) => write!(f, "Data file error: {e}"),
            PluginError::InvalidConfig(msg) => write!(f, "Invalid config: {msg}"),
        }
    }
}

impl std::error::Error for PluginError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PluginError::Config(e) | PluginError::Data(e) => Some(e),
            PluginError::InvalidConfig(_) => None,
        }
    }
}
