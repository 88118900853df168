//! Headless host loop: a blocking synchronous loop that reads JSON commands
//! from stdin and writes JSON responses to stdout.
//!
//! The session stands in for the game server. It owns the Bevy `App` with
//! [`BarricadeToWallPlugin`], spawns players and their planners, places
//! structures and forwards chat commands, and reports every outbound plugin
//! event back to the caller. See [`crate::protocol`] for the schema.

use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use bevy::log::LogPlugin;
use bevy::prelude::*;

use conversion::host::{
    structure_bundle, ChatCommand, ChatReply, Deployed, EntityBuilt, ItemDeployed, OwnerId,
    Planner, Player, PlayerId, Prefab, StructureReplaced,
};
use conversion::localization::DEFAULT_LOCALE;
use conversion::permissions::Permissions;
use conversion::{BarricadeToWallPlugin, TickCounter};

use crate::protocol::{
    make_response, HostCommand, HostResponse, Notification, ResponsePayload, StructureInfo,
    MAX_STEP_TICKS,
};

/// Where the plugin keeps its files.
#[derive(Debug, Clone)]
pub struct HostOptions {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

// ---------------------------------------------------------------------------
// Outbox
// ---------------------------------------------------------------------------

/// Notifications collected since the last response.
#[derive(Resource, Default)]
struct Outbox(Vec<Notification>);

fn collect_notifications(
    mut outbox: ResMut<Outbox>,
    mut replies: EventReader<ChatReply>,
    mut replaced: EventReader<StructureReplaced>,
    mut built: EventReader<EntityBuilt>,
    mut item_deployed: EventReader<ItemDeployed>,
    mut deployed: EventReader<Deployed>,
) {
    for e in replaced.read() {
        outbox.0.push(Notification::StructureReplaced {
            original: e.original.to_bits(),
            replacement: e.replacement.to_bits(),
            destination: e.destination.clone(),
            owner: e.owner,
        });
    }
    for e in built.read() {
        outbox.0.push(Notification::EntityBuilt {
            planner: e.planner.to_bits(),
            built: e.built.to_bits(),
        });
    }
    for e in item_deployed.read() {
        outbox.0.push(Notification::ItemDeployed {
            planner: e.planner.to_bits(),
            deployed: e.deployed.to_bits(),
        });
    }
    for e in deployed.read() {
        outbox.0.push(Notification::Deployed {
            deployed: e.deployed.to_bits(),
            player: e.player,
        });
    }
    for e in replies.read() {
        outbox.0.push(Notification::ChatReply {
            player: e.player,
            message: e.message.clone(),
        });
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

struct Connected {
    entity: Entity,
    planner: Entity,
}

pub struct HostSession {
    app: App,
    players: HashMap<PlayerId, Connected>,
}

impl HostSession {
    /// Build the App and run the first frame so the plugin loads.
    pub fn new(plugin: BarricadeToWallPlugin, with_logging: bool) -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        if with_logging {
            app.add_plugins(LogPlugin::default());
        }
        app.add_plugins(plugin);
        app.init_resource::<Outbox>();
        app.add_systems(Last, collect_notifications);
        app.update();

        Self {
            app,
            players: HashMap::new(),
        }
    }

    fn tick(&self) -> u64 {
        self.app
            .world()
            .get_resource::<TickCounter>()
            .map(|t| t.0)
            .unwrap_or(0)
    }

    fn respond(&mut self, payload: ResponsePayload) -> HostResponse {
        let notifications = std::mem::take(&mut self.app.world_mut().resource_mut::<Outbox>().0);
        make_response(self.tick(), notifications, payload)
    }

    fn error(&mut self, message: impl Into<String>) -> HostResponse {
        self.respond(ResponsePayload::Error {
            message: message.into(),
        })
    }

    pub fn ready(&mut self) -> HostResponse {
        self.respond(ResponsePayload::Ready)
    }

    pub fn process_command(&mut self, cmd: HostCommand) -> HostResponse {
        match cmd {
            HostCommand::Join {
                player,
                name,
                locale,
            } => {
                if self.players.contains_key(&player) {
                    return self.error(format!("player {player} already joined"));
                }
                let world = self.app.world_mut();
                let entity = world
                    .spawn(Player {
                        id: player,
                        name,
                        locale: locale.unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
                    })
                    .id();
                let planner = world
                    .spawn(Planner {
                        owner: Some(entity),
                    })
                    .id();
                self.players.insert(player, Connected { entity, planner });
                self.respond(ResponsePayload::Ok)
            }

            HostCommand::Grant { player, permission } => {
                let granted = self
                    .app
                    .world_mut()
                    .resource_mut::<Permissions>()
                    .grant(player, &permission);
                if granted {
                    self.respond(ResponsePayload::Ok)
                } else {
                    self.error(format!("permission {permission} is not registered"))
                }
            }

            HostCommand::Revoke { player, permission } => {
                self.app
                    .world_mut()
                    .resource_mut::<Permissions>()
                    .revoke(player, &permission);
                self.respond(ResponsePayload::Ok)
            }

            HostCommand::Build {
                player,
                prefab,
                position,
                rotation,
            } => {
                let Some(planner) = self.players.get(&player).map(|c| c.planner) else {
                    return self.error(format!("unknown player {player}"));
                };
                let rotation = rotation.map(Quat::from_array).unwrap_or(Quat::IDENTITY);
                let world = self.app.world_mut();
                let built = world
                    .spawn(structure_bundle(
                        prefab,
                        Vec3::from_array(position),
                        rotation,
                        player,
                    ))
                    .id();
                world.send_event(EntityBuilt { planner, built });
                self.app.update();
                self.respond(ResponsePayload::Built {
                    entity: built.to_bits(),
                })
            }

            HostCommand::Chat {
                player,
                command,
                args,
            } => {
                let Some(entity) = self.players.get(&player).map(|c| c.entity) else {
                    return self.error(format!("unknown player {player}"));
                };
                self.app.world_mut().send_event(ChatCommand {
                    player: entity,
                    command,
                    args,
                });
                self.app.update();
                self.respond(ResponsePayload::Ok)
            }

            HostCommand::Step { ticks } => {
                for _ in 0..ticks.min(MAX_STEP_TICKS) {
                    self.app.update();
                }
                self.respond(ResponsePayload::StepComplete)
            }

            HostCommand::Structures => {
                let structures = self.structures();
                self.respond(ResponsePayload::Structures { structures })
            }

            HostCommand::Quit => {
                self.shutdown();
                self.respond(ResponsePayload::Goodbye)
            }
        }
    }

    /// Send `AppExit` and run one frame so the plugin unloads.
    pub fn shutdown(&mut self) {
        self.app.world_mut().send_event(AppExit::Success);
        self.app.update();
    }

    fn structures(&mut self) -> Vec<StructureInfo> {
        let world = self.app.world_mut();
        let mut query = world.query::<(Entity, &Prefab, &Transform, &OwnerId)>();
        let mut structures: Vec<StructureInfo> = query
            .iter(world)
            .map(|(entity, prefab, transform, owner)| StructureInfo {
                entity: entity.to_bits(),
                prefab: prefab.0.clone(),
                position: transform.translation.to_array(),
                rotation: transform.rotation.to_array(),
                owner: owner.0,
            })
            .collect();
        structures.sort_by_key(|s| s.entity);
        structures
    }
}

// ---------------------------------------------------------------------------
// I/O loop
// ---------------------------------------------------------------------------

fn write_response(out: &mut impl Write, response: &HostResponse) {
    match serde_json::to_string(response) {
        Ok(line) => {
            let _ = writeln!(out, "{line}");
            let _ = out.flush();
        }
        Err(e) => error!("Failed to encode response: {e}"),
    }
}

pub fn run_host_mode(options: HostOptions) {
    let plugin = BarricadeToWallPlugin {
        config_dir: Some(options.config_dir),
        data_dir: Some(options.data_dir),
        ..Default::default()
    };
    let mut session = HostSession::new(plugin, true);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();

    let ready = session.ready();
    write_response(&mut stdout, &ready);
    info!("Host mode ready, waiting for commands on stdin");

    let mut said_goodbye = false;
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!("stdin read error: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<HostCommand>(&line) {
            Ok(cmd) => session.process_command(cmd),
            Err(e) => session.error(format!("Parse error: {e}")),
        };
        said_goodbye = matches!(response.payload, ResponsePayload::Goodbye);
        write_response(&mut stdout, &response);
        if said_goodbye {
            break;
        }
    }

    if !said_goodbye {
        // stdin closed without `quit`: still unload so nothing is left queued.
        session.shutdown();
    }
    info!("Host mode shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use conversion::config::{HIGH_STONE_WALL, STONE_BARRICADE, USE_PERMISSION};

    fn session() -> HostSession {
        HostSession::new(BarricadeToWallPlugin::default(), false)
    }

    fn run(session: &mut HostSession, json: &str) -> HostResponse {
        session.process_command(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn ready_reports_first_tick() {
        let mut session = session();
        let ready = session.ready();
        assert_eq!(ready.payload, ResponsePayload::Ready);
        assert_eq!(ready.tick, 1);
    }

    #[test]
    fn duplicate_join_is_an_error() {
        let mut session = session();
        run(&mut session, r#"{"cmd":"join","player":1,"name":"a"}"#);
        let resp = run(&mut session, r#"{"cmd":"join","player":1,"name":"a"}"#);
        assert!(matches!(resp.payload, ResponsePayload::Error { .. }));
    }

    #[test]
    fn unknown_player_is_an_error() {
        let mut session = session();
        let resp = run(&mut session, r#"{"cmd":"chat","player":9,"command":"barricade"}"#);
        assert!(matches!(resp.payload, ResponsePayload::Error { .. }));
    }

    #[test]
    fn grant_of_unregistered_permission_fails() {
        let mut session = session();
        let resp = run(&mut session, r#"{"cmd":"grant","player":1,"permission":"other.perm"}"#);
        assert!(matches!(resp.payload, ResponsePayload::Error { .. }));
    }

    #[test]
    fn full_session_converts_barricade() {
        let mut session = session();
        run(&mut session, r#"{"cmd":"join","player":1,"name":"a"}"#);
        let grant = format!(r#"{{"cmd":"grant","player":1,"permission":"{USE_PERMISSION}"}}"#);
        assert_eq!(run(&mut session, &grant).payload, ResponsePayload::Ok);

        let toggled = run(&mut session, r#"{"cmd":"chat","player":1,"command":"barricade"}"#);
        assert_eq!(toggled.notifications.len(), 1);
        assert!(matches!(
            &toggled.notifications[0],
            Notification::ChatReply { message, .. } if message.contains("ON!")
        ));

        let build = format!(
            r#"{{"cmd":"build","player":1,"prefab":"{STONE_BARRICADE}","position":[4.0,0.0,2.0]}}"#
        );
        let built = run(&mut session, &build);
        let ResponsePayload::Built { entity } = built.payload else {
            panic!("expected Built");
        };

        let stepped = run(&mut session, r#"{"cmd":"step","ticks":1}"#);
        assert!(stepped.notifications.iter().any(|n| matches!(
            n,
            Notification::StructureReplaced { original, .. } if *original == entity
        )));

        let listed = run(&mut session, r#"{"cmd":"structures"}"#);
        let ResponsePayload::Structures { structures } = listed.payload else {
            panic!("expected Structures");
        };
        assert_eq!(structures.len(), 1);
        assert_eq!(structures[0].prefab, HIGH_STONE_WALL);
        assert_eq!(structures[0].position, [4.0, 0.0, 2.0]);
        assert_eq!(structures[0].owner, PlayerId(1));

        let bye = run(&mut session, r#"{"cmd":"quit"}"#);
        assert_eq!(bye.payload, ResponsePayload::Goodbye);
    }
}
