//! NPC dialogue packets exchanged with the client.
//!
//! Only the fields are modelled here; the host runtime does the wire
//! encoding.

use crate::host::EntityId;
use crate::raw_enum::raw_enum;

raw_enum! {
    /// What a `NpcDialoguePacket` asks the client to do.
    pub enum DialogueAction {
        Open = 0,
        Close = 1,
    }
}

raw_enum! {
    /// Request kinds a client can send in `NpcRequestPacket`.
    pub enum NpcRequestType {
        SetActions = 0,
        ExecuteAction = 1,
        ExecuteClosingCommands = 2,
        SetName = 3,
        SetSkin = 4,
        SetInteractionText = 5,
        ExecuteOpeningCommands = 6,
    }
}

/// Clientbound: open or close an NPC dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpcDialoguePacket {
    /// Entity the dialog is attached to
    pub actor_runtime_id: EntityId,
    pub action: DialogueAction,
    /// Body text
    pub dialogue: String,
    /// Form id, echoed back by the client in `NpcRequestPacket::scene_name`
    pub scene_name: String,
    /// Title shown above the dialog
    pub npc_name: String,
    /// JSON array of button records
    pub action_json: String,
}

impl NpcDialoguePacket {
    #[must_use]
    pub fn open(
        actor_runtime_id: EntityId,
        dialogue: impl Into<String>,
        scene_name: impl Into<String>,
        npc_name: impl Into<String>,
        action_json: impl Into<String>,
    ) -> Self {
        Self {
            actor_runtime_id,
            action: DialogueAction::Open,
            dialogue: dialogue.into(),
            scene_name: scene_name.into(),
            npc_name: npc_name.into(),
            action_json: action_json.into(),
        }
    }

    /// A close request. Every text field is left empty.
    #[must_use]
    pub const fn close(actor_runtime_id: EntityId) -> Self {
        Self {
            actor_runtime_id,
            action: DialogueAction::Close,
            dialogue: String::new(),
            scene_name: String::new(),
            npc_name: String::new(),
            action_json: String::new(),
        }
    }

    #[must_use]
    pub fn is_close(&self) -> bool {
        self.action == DialogueAction::Close
    }
}

/// Serverbound: the client reports a button press or a dialog opening/closing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpcRequestPacket {
    pub actor_runtime_id: EntityId,
    /// Raw request type; see [`NpcRequestPacket::request_type`]
    pub request_type: u8,
    pub command_string: String,
    pub action_index: u32,
    /// Form id the request refers to
    pub scene_name: String,
}

impl NpcRequestPacket {
    #[must_use]
    pub fn new(
        actor_runtime_id: EntityId,
        request_type: NpcRequestType,
        action_index: u32,
        scene_name: impl Into<String>,
    ) -> Self {
        Self {
            actor_runtime_id,
            request_type: request_type.to_raw(),
            command_string: String::new(),
            action_index,
            scene_name: scene_name.into(),
        }
    }

    /// Decoded request type, `None` for values this library doesn't know.
    #[must_use]
    pub const fn request_type(&self) -> Option<NpcRequestType> {
        NpcRequestType::from_raw(self.request_type)
    }
}
