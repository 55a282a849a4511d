//! Minimal in-memory host shared by the integration tests.

use std::cell::RefCell;
use std::collections::HashMap;

use npc_dialog::{
    ActionRecord, Entity, EntityId, EntityLookup, MetadataProperty, MetadataValue,
    NpcDialoguePacket, Player,
};

pub struct TestEntity {
    pub id: EntityId,
    pub name: String,
    metadata: RefCell<HashMap<MetadataProperty, MetadataValue>>,
    inbox: RefCell<Vec<NpcDialoguePacket>>,
}

impl TestEntity {
    pub fn new(id: EntityId, name: &str) -> Self {
        Self {
            id,
            name: name.to_owned(),
            metadata: RefCell::default(),
            inbox: RefCell::default(),
        }
    }

    pub fn metadata(&self, property: MetadataProperty) -> Option<MetadataValue> {
        self.metadata.borrow().get(&property).cloned()
    }

    pub fn drain(&self) -> Vec<NpcDialoguePacket> {
        std::mem::take(&mut *self.inbox.borrow_mut())
    }
}

impl Entity for TestEntity {
    fn runtime_id(&self) -> EntityId {
        self.id
    }

    fn nametag(&self) -> String {
        self.name.clone()
    }

    fn set_metadata(&self, property: MetadataProperty, value: MetadataValue) {
        self.metadata.borrow_mut().insert(property, value);
    }
}

impl Player for TestEntity {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn send_dialogue(&self, packet: NpcDialoguePacket) {
        self.inbox.borrow_mut().push(packet);
    }
}

#[derive(Default)]
pub struct TestWorld {
    pub entities: Vec<TestEntity>,
}

impl TestWorld {
    pub fn spawn(&mut self, id: EntityId, name: &str) {
        self.entities.push(TestEntity::new(id, name));
    }

    pub fn get(&self, id: EntityId) -> &TestEntity {
        self.entities
            .iter()
            .find(|e| e.id == id)
            .expect("entity exists")
    }
}

impl EntityLookup for TestWorld {
    fn entity(&self, id: EntityId) -> Option<&dyn Entity> {
        self.entities
            .iter()
            .find(|e| e.id == id)
            .map(|e| e as &dyn Entity)
    }
}

/// What a client would do with the `action_json` of an open packet.
pub fn parse_actions(packet: &NpcDialoguePacket) -> Vec<ActionRecord> {
    serde_json::from_str(&packet.action_json).expect("client can parse action json")
}
