use crate::form::DialogForm;

/// Runtime knobs for dialog handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogConfig {
    /// Close-on-submit policy for forms built with [`DialogConfig::new_form`]
    pub close_on_submit: bool,
    /// Send a bare close packet when a request names a form that isn't registered
    pub close_unknown_forms: bool,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            close_on_submit: true,
            close_unknown_forms: true,
        }
    }
}

impl DialogConfig {
    /// Read overrides from `NPC_DIALOG_CLOSE_ON_SUBMIT` and
    /// `NPC_DIALOG_CLOSE_UNKNOWN_FORMS`; unset or unparsable values keep the
    /// defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            close_on_submit: env_flag("NPC_DIALOG_CLOSE_ON_SUBMIT")
                .unwrap_or(defaults.close_on_submit),
            close_unknown_forms: env_flag("NPC_DIALOG_CLOSE_UNKNOWN_FORMS")
                .unwrap_or(defaults.close_unknown_forms),
        }
    }

    /// A form with a random id that follows this config's close-on-submit policy.
    #[must_use]
    pub fn new_form(&self, dialog_text: impl Into<String>) -> DialogForm {
        let mut form = DialogForm::new(dialog_text);
        form.set_close_on_submit(self.close_on_submit);
        form
    }
}

fn env_flag(key: &str) -> Option<bool> {
    std::env::var(key).ok().and_then(|value| parse_flag(&value))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
