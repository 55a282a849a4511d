//! Dialog forms
//!
//! A form is the dialog text plus an ordered button list. The client
//! addresses buttons by their index in that list, so insertion order is the
//! contract.
//!
//! Forms never own the entity they are paired with; they keep its runtime id
//! and the store resolves it through `EntityLookup` when needed.

use std::fmt;
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::button::{ActionRecord, Button};
use crate::error::{DialogError, Result};
use crate::host::{EntityId, Player};
use crate::packets::NpcDialoguePacket;

/// Called with the player when the client reports the dialog opened or closed.
pub type DialogListener = Arc<dyn Fn(&dyn Player) + Send + Sync>;

#[derive(Clone)]
pub struct DialogForm {
    id: String,
    dialog_text: String,
    buttons: Vec<Button>,
    open_listener: Option<DialogListener>,
    close_listener: Option<DialogListener>,
    close_on_submit: bool,
    entity: Option<EntityId>,
}

impl DialogForm {
    /// Create a form with a random (UUID v4) id.
    #[must_use]
    pub fn new(dialog_text: impl Into<String>) -> Self {
        Self::with_id(dialog_text, Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn with_id(dialog_text: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            dialog_text: dialog_text.into(),
            buttons: Vec::new(),
            open_listener: None,
            close_listener: None,
            close_on_submit: true,
            entity: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn dialog_text(&self) -> &str {
        &self.dialog_text
    }

    pub fn set_dialog_text(&mut self, dialog_text: impl Into<String>) -> &mut Self {
        self.dialog_text = dialog_text.into();
        self
    }

    /// Append a button without a submit listener.
    pub fn add_button(&mut self, name: impl Into<String>, command: impl Into<String>) -> &mut Self {
        self.buttons.push(Button::new(name, command));
        self
    }

    /// Append a button whose listener runs when a player presses it.
    pub fn add_button_with_listener<F>(
        &mut self,
        name: impl Into<String>,
        command: impl Into<String>,
        listener: F,
    ) -> &mut Self
    where
        F: Fn(&dyn Player) -> bool + Send + Sync + 'static,
    {
        let mut button = Button::new(name, command);
        button.set_submit_listener(listener);
        self.buttons.push(button);
        self
    }

    #[must_use]
    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    #[must_use]
    pub fn button(&self, index: usize) -> Option<&Button> {
        self.buttons.get(index)
    }

    pub fn button_mut(&mut self, index: usize) -> Option<&mut Button> {
        self.buttons.get_mut(index)
    }

    #[must_use]
    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    /// Button records in presentation order.
    #[must_use]
    pub fn actions(&self) -> Vec<ActionRecord> {
        self.buttons.iter().map(Button::to_record).collect()
    }

    /// Button records as the JSON array the client expects.
    pub fn actions_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.actions())?)
    }

    /// Runtime id of the paired entity.
    #[must_use]
    pub const fn entity(&self) -> Option<EntityId> {
        self.entity
    }

    pub(crate) fn set_entity(&mut self, entity: Option<EntityId>) {
        self.entity = entity;
    }

    #[must_use]
    pub const fn is_closing_on_submit(&self) -> bool {
        self.close_on_submit
    }

    pub fn set_close_on_submit(&mut self, close_on_submit: bool) -> &mut Self {
        self.close_on_submit = close_on_submit;
        self
    }

    #[must_use]
    pub fn open_listener(&self) -> Option<&DialogListener> {
        self.open_listener.as_ref()
    }

    pub fn set_open_listener<F>(&mut self, listener: F) -> &mut Self
    where
        F: Fn(&dyn Player) + Send + Sync + 'static,
    {
        self.open_listener = Some(Arc::new(listener));
        self
    }

    pub fn clear_open_listener(&mut self) -> &mut Self {
        self.open_listener = None;
        self
    }

    #[must_use]
    pub fn close_listener(&self) -> Option<&DialogListener> {
        self.close_listener.as_ref()
    }

    pub fn set_close_listener<F>(&mut self, listener: F) -> &mut Self
    where
        F: Fn(&dyn Player) + Send + Sync + 'static,
    {
        self.close_listener = Some(Arc::new(listener));
        self
    }

    pub fn clear_close_listener(&mut self) -> &mut Self {
        self.close_listener = None;
        self
    }

    pub fn execute_open_listener(&self, player: &dyn Player) {
        if let Some(listener) = &self.open_listener {
            listener(player);
        }
    }

    pub fn execute_close_listener(&self, player: &dyn Player) {
        if let Some(listener) = &self.close_listener {
            listener(player);
        }
    }

    /// Handle a button press from `player`.
    ///
    /// An unknown index still closes the dialog so the player is never left
    /// stuck in it, then fails with `ButtonNotFound`. A known index runs the
    /// button listener once and closes if it asked to or if the form closes
    /// on submit.
    pub fn execute_button_submit_listener(&self, player: &dyn Player, index: usize) -> Result<()> {
        let Some(button) = self.buttons.get(index) else {
            self.close(player);
            return Err(DialogError::ButtonNotFound {
                form_id: self.id.clone(),
                index,
            });
        };

        let requested_close = button.execute_submit_listener(player);
        if requested_close || self.close_on_submit {
            debug!(
                form = %self.id,
                index,
                requested_close,
                "closing dialog after submit"
            );
            self.close(player);
        }
        Ok(())
    }

    /// Open request for `target`, showing `nametag` as the title.
    pub fn open_packet(&self, target: EntityId, nametag: impl Into<String>) -> Result<NpcDialoguePacket> {
        Ok(NpcDialoguePacket::open(
            target,
            self.dialog_text.clone(),
            self.id.clone(),
            nametag,
            self.actions_json()?,
        ))
    }

    /// Close request addressed to the paired entity, or to `fallback` when
    /// the form is unpaired.
    #[must_use]
    pub fn close_packet(&self, fallback: EntityId) -> NpcDialoguePacket {
        NpcDialoguePacket::close(self.entity.unwrap_or(fallback))
    }

    /// Dismiss the dialog on `player`'s client.
    pub fn close(&self, player: &dyn Player) {
        player.send_dialogue(self.close_packet(player.runtime_id()));
    }
}

impl fmt::Debug for DialogForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogForm")
            .field("id", &self.id)
            .field("dialog_text", &self.dialog_text)
            .field("buttons", &self.buttons)
            .field("close_on_submit", &self.close_on_submit)
            .field("entity", &self.entity)
            .finish_non_exhaustive()
    }
}
