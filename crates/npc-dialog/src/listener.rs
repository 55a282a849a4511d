//! Routes host events to dialog forms
//!
//! Two inputs:
//! - `NpcRequestPacket` from a client: button pressed, dialog opened, dialog closed
//! - `PlayerEntityInteractEvent`: a player used an entity that may carry a dialog
//!
//! Forms are looked up by id (the packet's scene name) or by paired entity.
//! A request for a form that no longer exists is not an error: the dialog is
//! dismissed on the client instead, so a stale dialog never traps a player.

use tracing::{debug, warn};

use crate::config::DialogConfig;
use crate::error::Result;
use crate::host::{EntityLookup, Player, PlayerEntityInteractEvent};
use crate::packets::{NpcDialoguePacket, NpcRequestPacket, NpcRequestType};
use crate::registry::DialogRegistry;

#[derive(Debug, Clone)]
pub struct PacketListener {
    registry: DialogRegistry,
    config: DialogConfig,
}

impl PacketListener {
    #[must_use]
    pub fn new(registry: DialogRegistry) -> Self {
        Self::with_config(registry, DialogConfig::default())
    }

    #[must_use]
    pub const fn with_config(registry: DialogRegistry, config: DialogConfig) -> Self {
        Self { registry, config }
    }

    #[must_use]
    pub const fn registry(&self) -> &DialogRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn config(&self) -> &DialogConfig {
        &self.config
    }

    /// Handle an `NpcRequestPacket` sent by `player`.
    ///
    /// Listeners run on a copy of the form, outside the registry lock, so
    /// they may open or register forms themselves. The only error surfaced
    /// is `ButtonNotFound` for a press on a button the form doesn't have.
    pub fn on_npc_request(
        &self,
        player: &dyn Player,
        packet: &NpcRequestPacket,
        world: &dyn EntityLookup,
    ) -> Result<()> {
        if world.entity(packet.actor_runtime_id).is_none() {
            debug!(
                entity = packet.actor_runtime_id,
                "ignoring NpcRequestPacket for unknown entity"
            );
            return Ok(());
        }

        let username = player.name();
        debug!(
            player = %username,
            request_type = packet.request_type,
            action_index = packet.action_index,
            command = %packet.command_string,
            entity = packet.actor_runtime_id,
            scene = %packet.scene_name,
            "received NpcRequestPacket"
        );

        match packet.request_type() {
            Some(NpcRequestType::ExecuteAction) => {
                match self.registry.snapshot(&packet.scene_name) {
                    Some(form) => {
                        form.execute_button_submit_listener(player, packet.action_index as usize)?;
                    }
                    None => self.dismiss_unknown(player, packet),
                }
            }
            Some(NpcRequestType::ExecuteOpeningCommands) => {
                match self.registry.snapshot(&packet.scene_name) {
                    Some(form) => form.execute_open_listener(player),
                    None => warn!(
                        player = %username,
                        scene = %packet.scene_name,
                        "unhandled NpcRequestPacket: no registered form"
                    ),
                }
            }
            Some(NpcRequestType::ExecuteClosingCommands) => {
                match self.registry.snapshot(&packet.scene_name) {
                    Some(form) => form.execute_close_listener(player),
                    None => self.dismiss_unknown(player, packet),
                }
            }
            _ => warn!(
                player = %username,
                request_type = packet.request_type,
                "unhandled NpcRequestPacket: unsupported request type"
            ),
        }
        Ok(())
    }

    /// Open the dialog paired with the entity the player interacted with.
    ///
    /// The paired form is looked up and opened under one registry lock, so a
    /// concurrent re-pairing can't leave the player with an evicted form.
    pub fn on_player_entity_interact(
        &self,
        event: PlayerEntityInteractEvent<'_>,
        world: &dyn EntityLookup,
    ) -> Result<()> {
        let entity = event.entity.runtime_id();
        if let Some(form) = self.registry.open_by_entity(entity, event.player, world)? {
            debug!(
                player = %event.player.name(),
                entity,
                nametag = %event.entity.nametag(),
                form = %form,
                "player interacted with dialog entity"
            );
        }
        Ok(())
    }

    fn dismiss_unknown(&self, player: &dyn Player, packet: &NpcRequestPacket) {
        warn!(
            player = %player.name(),
            scene = %packet.scene_name,
            "unhandled NpcRequestPacket: no registered form"
        );
        if self.config.close_unknown_forms {
            player.send_dialogue(NpcDialoguePacket::close(packet.actor_runtime_id));
        }
    }
}
