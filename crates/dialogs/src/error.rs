//! Error types for the dialog engine.

use thiserror::Error;

/// Errors raised while registering or driving dialogs.
///
/// User input that fails a prompt's validator is not an error: it is handled
/// inside the engine by re-prompting (see `Validation::Rejected`).
#[derive(Error, Debug)]
pub enum DialogError {
    /// A dialog was built without something it cannot work without
    /// (empty id, missing session accessor, duplicate registration...).
    /// Raised at construction time; the conversation cannot start.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// `begin_dialog` referenced an id that was never registered
    #[error("Unknown dialog: {0}")]
    UnknownDialog(String),

    /// A waterfall step returned an error
    #[error("Step {step} of dialog {dialog_id} failed: {message}")]
    Step {
        dialog_id: String,
        step: String,
        message: String,
    },

    /// The backing store refused a read or write
    #[error("Session storage error: {0}")]
    Storage(String),

    /// Persisted state could not be converted to or from JSON
    #[error("Failed to convert dialog state: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DialogError {
    pub fn configuration(message: impl Into<String>) -> Self {
        DialogError::Configuration(message.into())
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DialogError>;
