//! What a step asks the engine to do next, and how a turn ended.

use serde_json::Value;

/// Returned by every waterfall step.
///
/// A step finishes its part of a turn in one of three ways: it suspends
/// (`Prompt`, `BeginDialog` of a child that prompts), it advances
/// synchronously within the same turn (`Next`, `Skip`), or it terminates its
/// dialog (`EndDialog`, `ReplaceDialog`, `CancelAll`).
#[derive(Debug, Clone, PartialEq)]
pub enum StepSignal {
    /// Advance to the following step in the same turn, optionally handing it a result
    Next(Option<Value>),

    /// Advance without a result, marking that this step had nothing to do.
    /// The following step sees `StepResult::Skipped`.
    Skip,

    /// Push a prompt dialog and end the turn waiting for the user
    Prompt { dialog_id: String, text: String },

    /// Push a child dialog; this step's dialog resumes with the child's result
    BeginDialog { dialog_id: String, options: Value },

    /// Pop this dialog and resume the parent with an optional result
    EndDialog(Option<Value>),

    /// Pop this dialog and push another in its place, in the same turn
    ReplaceDialog { dialog_id: String, options: Value },

    /// Clear the whole stack
    CancelAll,
}

/// Outcome of `begin_dialog` / `continue_dialog` for one turn
#[derive(Debug, Clone, PartialEq)]
pub enum DialogTurnStatus {
    /// The stack was empty; nothing ran
    Empty,
    /// A prompt is waiting for the user's next message
    Waiting,
    /// The root dialog ended with this result
    Complete(Option<Value>),
    /// A step cancelled every dialog on the stack
    Cancelled,
}
