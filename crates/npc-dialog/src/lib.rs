//! NPC dialog forms for Bedrock servers
//!
//! A dialog form is text plus an ordered list of buttons, shown to a player
//! through `NpcDialoguePacket`. Forms live in a [`DialogFormStore`], can be
//! paired with a world entity, and are driven by two host events routed
//! through [`PacketListener`].
//!
//! # Example
//!
//! ```ignore
//! use npc_dialog::prelude::*;
//!
//! let registry = DialogRegistry::new();
//! let mut form = DialogForm::with_id("Need anything?", "shopkeeper");
//! form.add_button_with_listener("Buy bread", "", |player| {
//!     tracing::info!("{} bought bread", player.name());
//!     true
//! })
//! .add_button("Leave", "");
//!
//! registry.register(form, false)?;
//! registry.pair_with_entity("shopkeeper", &villager, "Talk", &world)?;
//!
//! let listener = PacketListener::new(registry);
//! // host event hooks:
//! listener.on_player_entity_interact(event, &world)?;
//! listener.on_npc_request(player, &packet, &world)?;
//! ```

#![allow(clippy::redundant_pub_crate)]

mod button;
mod config;
mod error;
mod form;
mod host;
mod listener;
mod packets;
mod raw_enum;
mod registry;
mod store;

#[cfg(test)]
mod testing;

pub use button::{ActionRecord, Button, ButtonMode, ButtonType, SubmitListener};
pub use config::DialogConfig;
pub use error::{DialogError, Result};
pub use form::{DialogForm, DialogListener};
pub use host::{
    Entity, EntityId, EntityLookup, MetadataProperty, MetadataValue, Player,
    PlayerEntityInteractEvent,
};
pub use listener::PacketListener;
pub use packets::{DialogueAction, NpcDialoguePacket, NpcRequestPacket, NpcRequestType};
pub use registry::DialogRegistry;
pub use store::{DialogFormStore, OpenOverrides};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Button, ButtonMode, ButtonType, DialogConfig, DialogError, DialogForm, DialogFormStore,
        DialogRegistry, Entity, EntityId, EntityLookup, NpcDialoguePacket, NpcRequestPacket,
        NpcRequestType, OpenOverrides, PacketListener, Player, PlayerEntityInteractEvent,
    };
}
