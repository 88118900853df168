//! Per-player opt-in for barricade conversion, persisted to the data file.

use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use storage::{DataFile, StorageError};

use crate::host::PlayerId;

/// On-disk shape of the data file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredData {
    #[serde(rename = "Barricade Enabled", default)]
    pub barricade_enabled: BTreeMap<PlayerId, bool>,
}

/// Player id -> enabled, with a fallback for players who never toggled.
///
/// Every mutation rewrites the whole file. A store without a file lives only
/// in memory.
#[derive(Resource, Debug, Clone)]
pub struct EnablementStore {
    data: StoredData,
    default_enabled: bool,
    file: Option<DataFile>,
}

impl EnablementStore {
    pub fn in_memory(default_enabled: bool) -> Self {
        Self {
            data: StoredData::default(),
            default_enabled,
            file: None,
        }
    }

    /// Load from `file`; a missing file is an empty store.
    pub fn load(file: DataFile, default_enabled: bool) -> Result<Self, StorageError> {
        let data = file.load_or_default::<StoredData>()?;
        Ok(Self {
            data,
            default_enabled,
            file: Some(file),
        })
    }

    /// Stored value, or the configured default for unseen players.
    pub fn get(&self, player: PlayerId) -> bool {
        self.stored(player).unwrap_or(self.default_enabled)
    }

    /// Only the explicitly stored value.
    pub fn stored(&self, player: PlayerId) -> Option<bool> {
        self.data.barricade_enabled.get(&player).copied()
    }

    /// Upsert and persist. On a write error the new value is still held in
    /// memory and will be written by the next successful save.
    pub fn set(&mut self, player: PlayerId, enabled: bool) -> Result<(), StorageError> {
        self.data.barricade_enabled.insert(player, enabled);
        self.save()
    }

    /// Flip the player's effective state and persist it. Returns the new state.
    pub fn toggle(&mut self, player: PlayerId) -> Result<bool, StorageError> {
        let new_state = !self.get(player);
        self.set(player, new_state)?;
        Ok(new_state)
    }

    pub fn default_enabled(&self) -> bool {
        self.default_enabled
    }

    pub fn len(&self) -> usize {
        self.data.barricade_enabled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.barricade_enabled.is_empty()
    }

    pub fn file(&self) -> Option<&DataFile> {
        self.file.as_ref()
    }

    fn save(&self) -> Result<(), StorageError> {
        match &self.file {
            Some(file) => file.save(&self.data),
            None => Ok(()),
        }
    }
}
