//! Drives `BarricadeToWallPlugin` in a bare Bevy App the way a host would.

use bevy::prelude::*;

use conversion::config::{HIGH_WOOD_WALL, USE_PERMISSION, WOOD_BARRICADE};
use conversion::enablement::EnablementStore;
use conversion::host::{
    structure_bundle, ChatCommand, EntityBuilt, OwnerId, Planner, Player, PlayerId, Prefab,
};
use conversion::lifecycle::PluginLoaded;
use conversion::permissions::Permissions;
use conversion::BarricadeToWallPlugin;

fn new_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(BarricadeToWallPlugin::default());
    app.update();
    app
}

fn spawn_player(app: &mut App, id: u64) -> (Entity, Entity) {
    let player = app
        .world_mut()
        .spawn(Player {
            id: PlayerId(id),
            name: "host-player".to_string(),
            locale: "en".to_string(),
        })
        .id();
    let planner = app
        .world_mut()
        .spawn(Planner {
            owner: Some(player),
        })
        .id();
    (player, planner)
}

#[test]
fn host_can_enable_and_build() {
    let mut app = new_app();
    assert!(app.world().contains_resource::<PluginLoaded>());

    let (player, planner) = spawn_player(&mut app, 42);
    app.world_mut()
        .resource_mut::<Permissions>()
        .grant(PlayerId(42), USE_PERMISSION);

    app.world_mut().send_event(ChatCommand {
        player,
        command: "barricade".to_string(),
        args: Vec::new(),
    });
    app.update();
    assert!(app.world().resource::<EnablementStore>().get(PlayerId(42)));

    let position = Vec3::new(10.0, 0.5, -4.0);
    let built = app
        .world_mut()
        .spawn(structure_bundle(WOOD_BARRICADE, position, Quat::IDENTITY, PlayerId(42)))
        .id();
    app.world_mut().send_event(EntityBuilt { planner, built });
    app.update();
    app.update();

    let world = app.world_mut();
    let mut query = world.query::<(Entity, &Prefab, &Transform, &OwnerId)>();
    let structures: Vec<_> = query
        .iter(world)
        .map(|(e, p, t, o)| (e, p.0.clone(), t.translation, o.0))
        .collect();
    assert_eq!(structures.len(), 1);
    let (entity, prefab, translation, owner) = &structures[0];
    assert_ne!(*entity, built);
    assert_eq!(prefab, HIGH_WOOD_WALL);
    assert_eq!(*translation, position);
    assert_eq!(*owner, PlayerId(42));
}

#[test]
fn host_supplied_permissions_are_used() {
    use conversion::permissions::PermissionService;

    /// Grants everything that is registered.
    struct AllowAll(Vec<String>);

    impl PermissionService for AllowAll {
        fn register(&mut self, permission: &str) {
            self.0.push(permission.to_string());
        }
        fn is_registered(&self, permission: &str) -> bool {
            self.0.iter().any(|p| p == permission)
        }
        fn has_permission(&self, _player: PlayerId, permission: &str) -> bool {
            self.is_registered(permission)
        }
        fn grant(&mut self, _player: PlayerId, _permission: &str) -> bool {
            true
        }
        fn revoke(&mut self, _player: PlayerId, _permission: &str) -> bool {
            false
        }
    }

    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(Permissions::new(AllowAll(Vec::new())));
    app.add_plugins(BarricadeToWallPlugin::default());
    app.update();

    let (player, _) = spawn_player(&mut app, 7);
    app.world_mut().send_event(ChatCommand {
        player,
        command: "barricade".to_string(),
        args: Vec::new(),
    });
    app.update();

    assert!(app.world().resource::<EnablementStore>().get(PlayerId(7)));
}
