//! Host permission service, injected as a resource.

use std::collections::{BTreeSet, HashMap};

use bevy::prelude::*;

use crate::host::PlayerId;

/// Capability checks provided by the host server.
///
/// Permissions must be registered before they can be granted; checks against
/// an unregistered permission always fail.
pub trait PermissionService: Send + Sync + 'static {
    fn register(&mut self, permission: &str);
    fn is_registered(&self, permission: &str) -> bool;
    fn has_permission(&self, player: PlayerId, permission: &str) -> bool;
    /// Returns `false` if the permission is unknown.
    fn grant(&mut self, player: PlayerId, permission: &str) -> bool;
    /// Returns `false` if the player did not hold it.
    fn revoke(&mut self, player: PlayerId, permission: &str) -> bool;
}

/// In-process permission table: registered names plus per-player grants.
#[derive(Debug, Default, Clone)]
pub struct PermissionTable {
    registered: BTreeSet<String>,
    grants: HashMap<PlayerId, BTreeSet<String>>,
}

impl PermissionService for PermissionTable {
    fn register(&mut self, permission: &str) {
        self.registered.insert(permission.to_ascii_lowercase());
    }

    fn is_registered(&self, permission: &str) -> bool {
        self.registered.contains(&permission.to_ascii_lowercase())
    }

    fn has_permission(&self, player: PlayerId, permission: &str) -> bool {
        let permission = permission.to_ascii_lowercase();
        self.registered.contains(&permission)
            && self
                .grants
                .get(&player)
                .is_some_and(|granted| granted.contains(&permission))
    }

    fn grant(&mut self, player: PlayerId, permission: &str) -> bool {
        let permission = permission.to_ascii_lowercase();
        if !self.registered.contains(&permission) {
            return false;
        }
        self.grants.entry(player).or_default().insert(permission);
        true
    }

    fn revoke(&mut self, player: PlayerId, permission: &str) -> bool {
        self.grants
            .get_mut(&player)
            .is_some_and(|granted| granted.remove(&permission.to_ascii_lowercase()))
    }
}

/// The active permission service.
#[derive(Resource)]
pub struct Permissions(pub Box<dyn PermissionService>);

impl Default for Permissions {
    fn default() -> Self {
        Self(Box::new(PermissionTable::default()))
    }
}

impl Permissions {
    pub fn new(service: impl PermissionService) -> Self {
        Self(Box::new(service))
    }
}

impl std::ops::Deref for Permissions {
    type Target = dyn PermissionService;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl std::ops::DerefMut for Permissions {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0.as_mut()
    }
}
