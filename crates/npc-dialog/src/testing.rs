//! In-memory host doubles for unit tests.

use std::collections::HashMap;

use parking_lot::Mutex;

use crate::host::{Entity, EntityId, EntityLookup, MetadataProperty, MetadataValue, Player};
use crate::packets::NpcDialoguePacket;

/// An entity that can also act as a player; records everything sent to it.
///
/// `Sync`, so tests can drive one world from several threads.
pub struct MockEntity {
    id: EntityId,
    name: String,
    nametag: String,
    metadata: Mutex<HashMap<MetadataProperty, MetadataValue>>,
    sent: Mutex<Vec<NpcDialoguePacket>>,
}

impl MockEntity {
    pub fn new(id: EntityId, name: &str) -> Self {
        Self {
            id,
            name: name.to_owned(),
            nametag: format!("[{name}]"),
            metadata: Mutex::new(HashMap::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn metadata(&self, property: MetadataProperty) -> Option<MetadataValue> {
        self.metadata.lock().get(&property).cloned()
    }

    pub fn has_npc_component(&self) -> bool {
        self.metadata(MetadataProperty::HasNpcComponent) == Some(MetadataValue::Byte(1))
    }

    pub fn take_sent(&self) -> Vec<NpcDialoguePacket> {
        std::mem::take(&mut *self.sent.lock())
    }
}

impl Entity for MockEntity {
    fn runtime_id(&self) -> EntityId {
        self.id
    }

    fn nametag(&self) -> String {
        self.nametag.clone()
    }

    fn set_metadata(&self, property: MetadataProperty, value: MetadataValue) {
        self.metadata.lock().insert(property, value);
    }
}

impl Player for MockEntity {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn send_dialogue(&self, packet: NpcDialoguePacket) {
        self.sent.lock().push(packet);
    }
}

#[derive(Default)]
pub struct MockWorld {
    entities: Vec<MockEntity>,
}

impl MockWorld {
    pub fn with(entities: Vec<MockEntity>) -> Self {
        Self { entities }
    }

    pub fn get(&self, id: EntityId) -> &MockEntity {
        self.entities
            .iter()
            .find(|e| e.id == id)
            .expect("entity spawned in test world")
    }
}

impl EntityLookup for MockWorld {
    fn entity(&self, id: EntityId) -> Option<&dyn Entity> {
        self.entities
            .iter()
            .find(|e| e.id == id)
            .map(|e| e as &dyn Entity)
    }
}
