//! # TestServer: headless harness for plugin tests
//!
//! Wraps a `bevy::app::App` with [`BarricadeToWallPlugin`] and a recorder
//! that keeps every outbound event, so tests can place structures, run
//! ticks and assert on what the plugin did.

use bevy::prelude::*;

use crate::config::{BarricadeConfig, USE_PERMISSION};
use crate::enablement::EnablementStore;
use crate::host::{
    structure_bundle, ChatCommand, ChatReply, Deployed, EntityBuilt, ItemDeployed, OwnerId,
    Planner, Player, PlayerId, Prefab, StructureReplaced,
};
use crate::lifecycle::PluginLoaded;
use crate::permissions::Permissions;
use crate::BarricadeToWallPlugin;

/// Every outbound event seen since the server started.
#[derive(Resource, Default, Debug)]
pub struct Recorded {
    pub replies: Vec<ChatReply>,
    pub replaced: Vec<StructureReplaced>,
    pub built: Vec<EntityBuilt>,
    pub item_deployed: Vec<ItemDeployed>,
    pub deployed: Vec<Deployed>,
}

fn record_events(
    mut recorded: ResMut<Recorded>,
    mut replies: EventReader<ChatReply>,
    mut replaced: EventReader<StructureReplaced>,
    mut built: EventReader<EntityBuilt>,
    mut item_deployed: EventReader<ItemDeployed>,
    mut deployed: EventReader<Deployed>,
) {
    recorded.replies.extend(replies.read().cloned());
    recorded.replaced.extend(replaced.read().cloned());
    recorded.built.extend(built.read().copied());
    recorded.item_deployed.extend(item_deployed.read().copied());
    recorded.deployed.extend(deployed.read().copied());
}

/// A spawned player together with the planner they build with.
#[derive(Debug, Clone, Copy)]
pub struct TestPlayer {
    pub id: PlayerId,
    pub entity: Entity,
    pub planner: Entity,
}

pub struct TestServer {
    app: App,
}

impl TestServer {
    /// Default config, in-memory storage, re-announcement on.
    pub fn new() -> Self {
        Self::with_plugin(BarricadeToWallPlugin::default(), None)
    }

    /// Start with a preset config (migrated in memory like a file would be).
    pub fn with_config(config: BarricadeConfig) -> Self {
        Self::with_plugin(BarricadeToWallPlugin::default(), Some(config))
    }

    pub fn with_plugin(plugin: BarricadeToWallPlugin, config: Option<BarricadeConfig>) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        if let Some(config) = config {
            app.insert_resource(config);
        }
        app.add_plugins(plugin);
        app.init_resource::<Recorded>();
        app.add_systems(Last, record_events);

        // First frame runs Startup, which loads the plugin.
        app.update();
        Self { app }
    }

    // -----------------------------------------------------------------------
    // Setup
    // -----------------------------------------------------------------------

    pub fn join(&mut self, id: u64) -> TestPlayer {
        let id = PlayerId(id);
        let entity = self
            .app
            .world_mut()
            .spawn(Player {
                id,
                name: format!("player-{id}"),
                locale: "en".to_string(),
            })
            .id();
        let planner = self
            .app
            .world_mut()
            .spawn(Planner {
                owner: Some(entity),
            })
            .id();
        TestPlayer {
            id,
            entity,
            planner,
        }
    }

    pub fn grant_use(&mut self, player: &TestPlayer) {
        let granted = self
            .app
            .world_mut()
            .resource_mut::<Permissions>()
            .grant(player.id, USE_PERMISSION);
        assert!(granted, "use permission should be registered on load");
    }

    /// A player with the use permission and the feature switched on.
    pub fn join_enabled(&mut self, id: u64) -> TestPlayer {
        let player = self.join(id);
        self.grant_use(&player);
        self.set_enabled(&player, true);
        player
    }

    pub fn set_enabled(&mut self, player: &TestPlayer, enabled: bool) {
        self.app
            .world_mut()
            .resource_mut::<EnablementStore>()
            .set(player.id, enabled)
            .expect("in-memory store never fails");
    }

    /// Spawn a structure and send the build event for it, without running a tick.
    pub fn place(
        &mut self,
        player: &TestPlayer,
        prefab: &str,
        position: Vec3,
        rotation: Quat,
    ) -> Entity {
        let built = self
            .app
            .world_mut()
            .spawn(structure_bundle(prefab, position, rotation, player.id))
            .id();
        self.app.world_mut().send_event(EntityBuilt {
            planner: player.planner,
            built,
        });
        built
    }

    pub fn chat(&mut self, player: &TestPlayer, command: &str) {
        self.app.world_mut().send_event(ChatCommand {
            player: player.entity,
            command: command.to_string(),
            args: Vec::new(),
        });
    }

    // -----------------------------------------------------------------------
    // Simulation
    // -----------------------------------------------------------------------

    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.app.update();
        }
    }

    pub fn exit(&mut self) {
        self.app.world_mut().send_event(AppExit::Success);
        self.app.update();
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn resource<T: Resource>(&self) -> &T {
        self.app.world().resource::<T>()
    }

    pub fn recorded(&self) -> &Recorded {
        self.resource::<Recorded>()
    }

    pub fn is_loaded(&self) -> bool {
        self.app.world().contains_resource::<PluginLoaded>()
    }

    /// All structures as (entity, prefab, transform, owner).
    pub fn structures(&mut self) -> Vec<(Entity, String, Transform, PlayerId)> {
        let world = self.app.world_mut();
        let mut query = world.query::<(Entity, &Prefab, &Transform, &OwnerId)>();
        query
            .iter(world)
            .map(|(entity, prefab, transform, owner)| {
                (entity, prefab.0.clone(), *transform, owner.0)
            })
            .collect()
    }

    pub fn structures_with_prefab(&mut self, prefab: &str) -> Vec<(Entity, Transform, PlayerId)> {
        self.structures()
            .into_iter()
            .filter(|(_, p, _, _)| p == prefab)
            .map(|(entity, _, transform, owner)| (entity, transform, owner))
            .collect()
    }

    pub fn exists(&mut self, entity: Entity) -> bool {
        self.structures().iter().any(|(e, _, _, _)| *e == entity)
    }
}

impl Default for TestServer {
    fn default() -> Self {
        Self::new()
    }
}
