//! Host collaborator traits
//!
//! The server runtime owns entities, player sessions and the packet encoder.
//! Dialog code only reaches them through these traits:
//! - `Entity` - runtime id, nametag and a metadata sink mirrored to clients
//! - `Player` - an entity with a network session
//! - `EntityLookup` - resolves runtime ids back to live entities
//!
//! Forms store an `EntityId`, never the entity itself.

use crate::packets::NpcDialoguePacket;

/// Runtime id the server assigns to every entity, players included.
pub type EntityId = u64;

/// Entity metadata fields touched by dialog pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataProperty {
    /// Byte flag: the entity opens an NPC dialog when interacted with
    HasNpcComponent,
    /// String: JSON action list of the paired form
    NpcActions,
    /// String: text on the interact button shown to touch clients
    InteractiveTag,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataValue {
    Byte(u8),
    String(String),
}

/// A world entity as seen by the dialog layer.
pub trait Entity {
    fn runtime_id(&self) -> EntityId;

    fn nametag(&self) -> String;

    /// Set a synced metadata property. The host decides when it reaches clients.
    fn set_metadata(&self, property: MetadataProperty, value: MetadataValue);
}

/// A connected player.
pub trait Player: Entity {
    fn name(&self) -> String;

    /// Queue a dialogue packet on this player's session. Fire and forget.
    fn send_dialogue(&self, packet: NpcDialoguePacket);
}

/// Resolves runtime ids to live entities.
pub trait EntityLookup {
    fn entity(&self, id: EntityId) -> Option<&dyn Entity>;
}

/// A player interacted with (right-clicked or tapped) an entity.
#[derive(Clone, Copy)]
pub struct PlayerEntityInteractEvent<'a> {
    pub player: &'a dyn Player,
    pub entity: &'a dyn Entity,
}

/// Mark `entity` as an NPC carrying `actions`.
pub(crate) fn push_pairing<E: Entity + ?Sized>(entity: &E, actions: &str, interactive_tag: &str) {
    entity.set_metadata(MetadataProperty::HasNpcComponent, MetadataValue::Byte(1));
    entity.set_metadata(
        MetadataProperty::NpcActions,
        MetadataValue::String(actions.to_owned()),
    );
    entity.set_metadata(
        MetadataProperty::InteractiveTag,
        MetadataValue::String(interactive_tag.to_owned()),
    );
}

/// Undo `push_pairing`.
pub(crate) fn clear_pairing<E: Entity + ?Sized>(entity: &E) {
    entity.set_metadata(MetadataProperty::HasNpcComponent, MetadataValue::Byte(0));
    entity.set_metadata(
        MetadataProperty::NpcActions,
        MetadataValue::String(String::new()),
    );
}
