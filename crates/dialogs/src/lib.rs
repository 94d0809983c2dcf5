//! # Dialogs Crate
//!
//! A waterfall-style dialog engine for turn-based conversations.
//!
//! ## Components
//!
//! ### Dialog registry (`dialog`)
//! Maps dialog ids to tagged dialogs: `Waterfall(steps)` or `Prompt(validator)`.
//! A single engine loop drives both, pushing and popping `DialogInstance`s on a
//! per-conversation `DialogStack`.
//!
//! ### Steps and signals (`context`, `signal`)
//! Steps receive an explicit `StepContext` and answer with a `StepSignal`:
//! advance, skip, prompt, begin a child, end, replace or cancel everything.
//!
//! ### Validators (`prompt`)
//! Acceptance predicates run on a prompt's reply before the waiting step resumes.
//!
//! ### Session store (`state`)
//! Conversation-scoped JSON storage with typed accessors for the user profile
//! and the dialog stack.
//!
//! ## Example Usage
//!
//! ```ignore
//! use dialogs::{Dialog, DialogSet, DialogStack, TurnContext, step_fn};
//!
//! let mut set = DialogSet::new();
//! set.add("askName", Dialog::text_prompt())?;
//! set.add("hello", Dialog::waterfall(vec![
//!     step_fn("ask", |step| Ok(step.prompt("askName", "What is your name?"))),
//!     step_fn("greet", |step| {
//!         let name = step.result.as_str().unwrap_or("stranger").to_string();
//!         step.turn.send_text(format!("Hello {}", name));
//!         Ok(step.end_dialog(None))
//!     }),
//! ]))?;
//!
//! let mut stack = DialogStack::new();
//! let mut turn = TurnContext::new("conv-1", "hi");
//! set.begin_dialog(&mut turn, &mut stack, "hello", serde_json::Value::Null).await?;
//! ```

// Public modules
pub mod context;
pub mod dialog;
pub mod error;
pub mod instance;
pub mod prompt;
pub mod signal;
pub mod state;

// Re-export commonly used types
pub use context::{StepContext, StepResult, TurnContext};
pub use dialog::{Dialog, DialogSet, FnStep, WaterfallStep, step_fn};
pub use error::{DialogError, Result};
pub use instance::{DialogInstance, DialogStack};
pub use prompt::{
    NAME_LENGTH_MIN, Validation, Validator, YEAR_MIN_EXCLUSIVE, name_validator, validate_name,
    validate_year, year_validator,
};
pub use signal::{DialogTurnStatus, StepSignal};
pub use state::{
    ConversationProperty, ConversationState, DIALOG_STATE_PROPERTY, MemoryStorage,
    ProfileAccessor, StateAccessor, Storage, USER_PROFILE_PROPERTY,
};
