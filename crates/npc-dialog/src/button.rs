//! Dialog buttons and their client-side JSON record.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::host::Player;
use crate::raw_enum::raw_enum;

raw_enum! {
    /// When the client runs a button's command.
    #[derive(Default)]
    pub enum ButtonMode {
        /// Shown as a button; runs when pressed
        #[default]
        Button = 0,
        /// Runs when the dialog closes
        OnClose = 1,
        /// Runs when the dialog opens
        OnOpen = 2,
    }
}

raw_enum! {
    /// Payload kind. Non-education clients only use `Command`.
    #[derive(Default)]
    pub enum ButtonType {
        Url = 0,
        #[default]
        Command = 1,
        Invalid = 2,
    }
}

/// Called when a player presses the button. Returning `true` closes the
/// dialog even if the form keeps itself open on submit.
pub type SubmitListener = Arc<dyn Fn(&dyn Player) -> bool + Send + Sync>;

/// One selectable action of a dialog form.
#[derive(Clone)]
pub struct Button {
    name: String,
    command: String,
    data: Option<Vec<Value>>,
    mode: ButtonMode,
    kind: ButtonType,
    submit_listener: Option<SubmitListener>,
}

impl Button {
    #[must_use]
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            data: Some(Vec::new()),
            mode: ButtonMode::default(),
            kind: ButtonType::default(),
            submit_listener: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    /// Text of the command field.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn set_command(&mut self, command: impl Into<String>) -> &mut Self {
        self.command = command.into();
        self
    }

    #[must_use]
    pub fn data(&self) -> Option<&[Value]> {
        self.data.as_deref()
    }

    pub fn set_data(&mut self, data: Option<Vec<Value>>) -> &mut Self {
        self.data = data;
        self
    }

    #[must_use]
    pub const fn mode(&self) -> ButtonMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ButtonMode) -> &mut Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub const fn button_type(&self) -> ButtonType {
        self.kind
    }

    pub fn set_button_type(&mut self, button_type: ButtonType) -> &mut Self {
        self.kind = button_type;
        self
    }

    #[must_use]
    pub fn submit_listener(&self) -> Option<&SubmitListener> {
        self.submit_listener.as_ref()
    }

    pub fn set_submit_listener<F>(&mut self, listener: F) -> &mut Self
    where
        F: Fn(&dyn Player) -> bool + Send + Sync + 'static,
    {
        self.submit_listener = Some(Arc::new(listener));
        self
    }

    pub fn clear_submit_listener(&mut self) -> &mut Self {
        self.submit_listener = None;
        self
    }

    /// Run the submit listener. Without one the button never forces a close.
    pub fn execute_submit_listener(&self, player: &dyn Player) -> bool {
        self.submit_listener
            .as_ref()
            .is_some_and(|listener| listener(player))
    }

    /// The record sent to the client for this button.
    #[must_use]
    pub fn to_record(&self) -> ActionRecord {
        ActionRecord {
            button_name: self.name.clone(),
            data: match self.kind {
                ButtonType::Url => None,
                ButtonType::Command | ButtonType::Invalid => self.data.clone(),
            },
            mode: self.mode,
            text: self.command.clone(),
            button_type: self.kind,
        }
    }
}

impl Default for Button {
    fn default() -> Self {
        Self::new("", "")
    }
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("name", &self.name)
            .field("command", &self.command)
            .field("mode", &self.mode)
            .field("kind", &self.kind)
            .field("has_submit_listener", &self.submit_listener.is_some())
            .finish_non_exhaustive()
    }
}

/// One entry of the `action_json` array the client renders.
///
/// `button_name` is only shown for `ButtonMode::Button`; `data` is `null`
/// for URL buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub button_name: String,
    pub data: Option<Vec<Value>>,
    pub mode: ButtonMode,
    pub text: String,
    #[serde(rename = "type")]
    pub button_type: ButtonType,
}
