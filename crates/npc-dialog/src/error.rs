use thiserror::Error;

/// Errors returned by form, store and registry operations.
#[derive(Error, Debug)]
pub enum DialogError {
    #[error("dialog form '{id}' is already registered")]
    AlreadyRegistered { id: String },

    #[error("dialog form '{id}' is not registered")]
    NotRegistered { id: String },

    #[error("dialog form '{form_id}' has no button at index {index}")]
    ButtonNotFound { form_id: String, index: usize },

    #[error("failed to serialize dialog actions: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl DialogError {
    pub(crate) fn not_registered(id: &str) -> Self {
        Self::NotRegistered { id: id.to_owned() }
    }
}

pub type Result<T> = std::result::Result<T, DialogError>;
