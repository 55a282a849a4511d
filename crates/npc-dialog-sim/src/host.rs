//! In-memory stand-in for the server runtime
//!
//! Entities keep their NPC metadata in a map; players push dialogue packets
//! onto an egress channel the way a network session would.

use std::collections::HashMap;

use crossbeam_channel::Sender;
use npc_dialog::{
    Entity, EntityId, EntityLookup, MetadataProperty, MetadataValue, NpcDialoguePacket, Player,
};
use parking_lot::Mutex;
use tracing::debug;

/// Dialogue packet queued for a connection
#[derive(Debug)]
pub struct OutgoingDialogue {
    pub connection_id: u64,
    pub packet: NpcDialoguePacket,
}

pub struct SimEntity {
    id: EntityId,
    nametag: String,
    metadata: Mutex<HashMap<MetadataProperty, MetadataValue>>,
    /// Set for players
    session: Option<(u64, Sender<OutgoingDialogue>)>,
}

impl SimEntity {
    #[must_use]
    pub fn has_npc_component(&self) -> bool {
        self.metadata.lock().get(&MetadataProperty::HasNpcComponent)
            == Some(&MetadataValue::Byte(1))
    }
}

impl Entity for SimEntity {
    fn runtime_id(&self) -> EntityId {
        self.id
    }

    fn nametag(&self) -> String {
        self.nametag.clone()
    }

    fn set_metadata(&self, property: MetadataProperty, value: MetadataValue) {
        debug!(entity = self.id, ?property, ?value, "metadata updated");
        self.metadata.lock().insert(property, value);
    }
}

impl Player for SimEntity {
    fn name(&self) -> String {
        self.nametag.clone()
    }

    fn send_dialogue(&self, packet: NpcDialoguePacket) {
        match &self.session {
            Some((connection_id, tx)) => {
                let _ = tx.send(OutgoingDialogue {
                    connection_id: *connection_id,
                    packet,
                });
            }
            None => debug!(entity = self.id, "dropping dialogue for entity without a session"),
        }
    }
}

pub struct SimWorld {
    entities: HashMap<EntityId, SimEntity>,
    egress_tx: Sender<OutgoingDialogue>,
    next_id: EntityId,
    next_connection: u64,
}

impl SimWorld {
    #[must_use]
    pub fn new(egress_tx: Sender<OutgoingDialogue>) -> Self {
        Self {
            entities: HashMap::new(),
            egress_tx,
            next_id: 1,
            next_connection: 1,
        }
    }

    pub fn spawn_npc(&mut self, nametag: &str) -> EntityId {
        self.spawn(nametag, None)
    }

    pub fn spawn_player(&mut self, name: &str) -> EntityId {
        let connection_id = self.next_connection;
        self.next_connection += 1;
        self.spawn(name, Some((connection_id, self.egress_tx.clone())))
    }

    fn spawn(&mut self, nametag: &str, session: Option<(u64, Sender<OutgoingDialogue>)>) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        self.entities.insert(
            id,
            SimEntity {
                id,
                nametag: nametag.to_owned(),
                metadata: Mutex::new(HashMap::new()),
                session,
            },
        );
        id
    }

    pub fn get(&self, id: EntityId) -> eyre::Result<&SimEntity> {
        self.entities
            .get(&id)
            .ok_or_else(|| eyre::eyre!("no entity with runtime id {id}"))
    }
}

impl EntityLookup for SimWorld {
    fn entity(&self, id: EntityId) -> Option<&dyn Entity> {
        self.entities.get(&id).map(|e| e as &dyn Entity)
    }
}
