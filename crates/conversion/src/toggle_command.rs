//! The `/barricade` chat command: flip and persist the caller's opt-in.

use bevy::prelude::*;

use crate::config::{BarricadeConfig, USE_PERMISSION};
use crate::enablement::EnablementStore;
use crate::host::{ChatCommand, ChatReply, Player};
use crate::localization::{lang, Localizer};
use crate::permissions::Permissions;

pub fn handle_toggle_command(
    mut chat: EventReader<ChatCommand>,
    config: Res<BarricadeConfig>,
    permissions: Res<Permissions>,
    localizer: Res<Localizer>,
    mut store: ResMut<EnablementStore>,
    players: Query<&Player>,
    mut replies: EventWriter<ChatReply>,
) {
    for command in chat.read() {
        if !config.is_toggle_command(&command.command) {
            continue;
        }
        let Ok(player) = players.get(command.player) else {
            continue;
        };

        if !permissions.has_permission(player.id, USE_PERMISSION) {
            replies.send(ChatReply {
                player: player.id,
                message: localizer.render(lang::NO_PERMISSION, &player.locale, &[]),
            });
            continue;
        }

        let enabled = match store.toggle(player.id) {
            Ok(enabled) => enabled,
            Err(e) => {
                // The flip is kept in memory; the next successful save writes it.
                error!("Failed to save barricade toggle for {}: {e}", player.id);
                store.get(player.id)
            }
        };
        debug!("Player {} set barricade conversion to {}", player.id, enabled);

        let key = if enabled {
            lang::BARRICADE_ENABLED
        } else {
            lang::BARRICADE_DISABLED
        };
        replies.send(ChatReply {
            player: player.id,
            message: localizer.render(key, &player.locale, &[]),
        });
    }
}
