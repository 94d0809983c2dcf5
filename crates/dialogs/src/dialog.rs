//! Dialog registry and the waterfall engine.
//!
//! A `DialogSet` maps dialog ids to a tagged `Dialog`:
//! - `Waterfall(steps)`: an ordered list of steps, one `WaterfallStep` each
//! - `Prompt(validator)`: a single-turn wait for user input
//!
//! One engine loop drives both kinds. Each user turn re-enters the loop at
//! the top of the conversation's `DialogStack`; steps chain synchronously
//! until one of them suspends on a prompt or the stack unwinds.
//!
//! ## Algorithm
//! 1. `continue_dialog` looks at the top instance
//!    - prompt: validate the reply; accepted -> pop and resume the parent,
//!      rejected -> corrective message + same prompt again, stop
//!    - waterfall: resume it with the raw reply as the result
//! 2. Running a step yields a `StepSignal`, which becomes the next action
//! 3. The loop stops on `Waiting`, `Complete`, `Cancelled` or an error

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, instrument, warn};

use crate::context::{StepContext, StepResult, TurnContext};
use crate::error::{DialogError, Result};
use crate::instance::{DialogInstance, DialogStack};
use crate::prompt::{Validation, Validator};
use crate::signal::{DialogTurnStatus, StepSignal};

/// One step of a waterfall dialog.
///
/// ## Design Note
/// - Steps carry their own dependencies (accessors, clients) as fields
/// - `Send + Sync` lets one `DialogSet` serve many conversations concurrently
/// - Errors are `anyhow::Error`; the engine wraps them with the dialog and step name
#[async_trait]
pub trait WaterfallStep: Send + Sync {
    /// Returns the name of this step (for logging/debugging)
    fn name(&self) -> &str;

    /// Run the step for the current turn
    async fn run(&self, step: &mut StepContext<'_>) -> anyhow::Result<StepSignal>;
}

/// Adapter turning a plain closure into a step, for steps that never await
pub struct FnStep<F> {
    name: String,
    f: F,
}

/// Wrap a synchronous closure as a boxed waterfall step
pub fn step_fn<F>(name: impl Into<String>, f: F) -> Box<dyn WaterfallStep>
where
    F: Fn(&mut StepContext<'_>) -> anyhow::Result<StepSignal> + Send + Sync + 'static,
{
    Box::new(FnStep {
        name: name.into(),
        f,
    })
}

#[async_trait]
impl<F> WaterfallStep for FnStep<F>
where
    F: Fn(&mut StepContext<'_>) -> anyhow::Result<StepSignal> + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, step: &mut StepContext<'_>) -> anyhow::Result<StepSignal> {
        (self.f)(step)
    }
}

/// A registered dialog
pub enum Dialog {
    Waterfall(Vec<Box<dyn WaterfallStep>>),
    /// `None` accepts any reply as a string
    Prompt(Option<Validator>),
}

impl Dialog {
    pub fn waterfall(steps: Vec<Box<dyn WaterfallStep>>) -> Self {
        Dialog::Waterfall(steps)
    }

    /// Prompt that accepts whatever the user types
    pub fn text_prompt() -> Self {
        Dialog::Prompt(None)
    }

    pub fn prompt_with(validator: Validator) -> Self {
        Dialog::Prompt(Some(validator))
    }

    fn kind(&self) -> &'static str {
        match self {
            Dialog::Waterfall(_) => "waterfall",
            Dialog::Prompt(_) => "prompt",
        }
    }
}

impl fmt::Debug for Dialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialog::Waterfall(steps) => f
                .debug_tuple("Waterfall")
                .field(&steps.iter().map(|s| s.name()).collect::<Vec<_>>())
                .finish(),
            Dialog::Prompt(validator) => f
                .debug_tuple("Prompt")
                .field(&validator.as_ref().map(|_| "validator"))
                .finish(),
        }
    }
}

/// Next thing the engine loop has to do
enum Action {
    /// Push a new instance of a dialog
    Begin {
        dialog_id: String,
        options: Value,
        prompt: Option<String>,
    },
    /// Run the top instance's current step
    Run(StepResult),
    /// Advance the top instance one step, then run it
    Resume(StepResult),
    /// Pop the top instance and hand its result to the parent
    End(StepResult),
}

/// Registry of dialogs plus the engine that drives them.
///
/// Immutable once built; the per-conversation state lives in the `DialogStack`
/// passed to every call.
#[derive(Debug, Default)]
pub struct DialogSet {
    dialogs: HashMap<String, Dialog>,
}

impl DialogSet {
    pub fn new() -> Self {
        Self {
            dialogs: HashMap::new(),
        }
    }

    /// Register a dialog under `id`.
    ///
    /// Empty and duplicate ids are configuration errors.
    pub fn add(&mut self, id: impl Into<String>, dialog: Dialog) -> Result<()> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(DialogError::configuration("dialog id is required"));
        }
        if self.dialogs.contains_key(&id) {
            return Err(DialogError::configuration(format!(
                "dialog {} is already registered",
                id
            )));
        }
        debug!("Registered {} dialog {}", dialog.kind(), id);
        self.dialogs.insert(id, dialog);
        Ok(())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.dialogs.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.dialogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dialogs.is_empty()
    }

    fn find(&self, id: &str) -> Result<&Dialog> {
        self.dialogs
            .get(id)
            .ok_or_else(|| DialogError::UnknownDialog(id.to_string()))
    }

    /// Push a new instance of `dialog_id` and run it until it suspends or unwinds
    #[instrument(skip(self, turn, stack, options), fields(conversation = turn.conversation_id()))]
    pub async fn begin_dialog(
        &self,
        turn: &mut TurnContext,
        stack: &mut DialogStack,
        dialog_id: &str,
        options: Value,
    ) -> Result<DialogTurnStatus> {
        let action = Action::Begin {
            dialog_id: dialog_id.to_string(),
            options,
            prompt: None,
        };
        self.drive(turn, stack, action).await
    }

    /// Resume the top of the stack with this turn's input
    #[instrument(skip(self, turn, stack), fields(conversation = turn.conversation_id()))]
    pub async fn continue_dialog(
        &self,
        turn: &mut TurnContext,
        stack: &mut DialogStack,
    ) -> Result<DialogTurnStatus> {
        let Some(top) = stack.top() else {
            return Ok(DialogTurnStatus::Empty);
        };

        let action = match self.find(&top.dialog_id)? {
            Dialog::Prompt(validator) => {
                let validation = match validator {
                    Some(validate) => validate(turn.text()),
                    None => Validation::Accepted(Value::String(turn.text().to_string())),
                };
                match validation {
                    Validation::Accepted(value) => Action::End(StepResult::Value(value)),
                    Validation::Rejected { message } => {
                        debug!("Prompt {} rejected input, asking again", top.dialog_id);
                        let prompt = top.prompt.clone();
                        turn.send_text(message);
                        if let Some(prompt) = prompt {
                            turn.send_text(prompt);
                        }
                        return Ok(DialogTurnStatus::Waiting);
                    }
                }
            }
            Dialog::Waterfall(_) => {
                Action::Resume(StepResult::Value(Value::String(turn.text().to_string())))
            }
        };

        self.drive(turn, stack, action).await
    }

    /// The engine loop
    async fn drive(
        &self,
        turn: &mut TurnContext,
        stack: &mut DialogStack,
        mut action: Action,
    ) -> Result<DialogTurnStatus> {
        loop {
            action = match action {
                Action::Begin {
                    dialog_id,
                    options,
                    prompt,
                } => {
                    let dialog = self.find(&dialog_id)?;
                    debug!("Beginning {} dialog {}", dialog.kind(), dialog_id);

                    let mut instance = DialogInstance::new(dialog_id, options);
                    match dialog {
                        Dialog::Prompt(_) => {
                            let text = prompt.or_else(|| {
                                instance
                                    .options
                                    .get("prompt")
                                    .and_then(Value::as_str)
                                    .map(str::to_string)
                            });
                            if let Some(text) = &text {
                                turn.send_text(text.clone());
                            }
                            instance.prompt = text;
                            stack.push(instance);
                            return Ok(DialogTurnStatus::Waiting);
                        }
                        Dialog::Waterfall(_) => {
                            stack.push(instance);
                            Action::Run(StepResult::Empty)
                        }
                    }
                }

                Action::Resume(result) => match stack.top_mut() {
                    Some(instance) => {
                        instance.step_index += 1;
                        Action::Run(result)
                    }
                    None => return Ok(DialogTurnStatus::Complete(result.into_value())),
                },

                Action::End(result) => {
                    if let Some(ended) = stack.pop() {
                        debug!("Ended dialog {}", ended.dialog_id);
                    }
                    if stack.is_empty() {
                        return Ok(DialogTurnStatus::Complete(result.into_value()));
                    }
                    Action::Resume(result)
                }

                Action::Run(result) => {
                    let Some(instance) = stack.top_mut() else {
                        return Ok(DialogTurnStatus::Empty);
                    };
                    let steps = match self.find(&instance.dialog_id)? {
                        Dialog::Waterfall(steps) => steps,
                        Dialog::Prompt(_) => {
                            return Err(DialogError::configuration(format!(
                                "prompt {} cannot run waterfall steps",
                                instance.dialog_id
                            )));
                        }
                    };

                    // Running past the last step ends the dialog with the last result
                    let Some(step) = steps.get(instance.step_index) else {
                        action = Action::End(result);
                        continue;
                    };

                    debug!(
                        "Running step {} ({}) of {}",
                        instance.step_index,
                        step.name(),
                        instance.dialog_id
                    );
                    let signal = {
                        let mut context = StepContext {
                            turn: &mut *turn,
                            values: &mut instance.values,
                            options: &instance.options,
                            result,
                            dialog_id: &instance.dialog_id,
                            index: instance.step_index,
                        };
                        step.run(&mut context).await.map_err(|e| {
                            warn!("Step {} of {} failed: {:#}", step.name(), instance.dialog_id, e);
                            DialogError::Step {
                                dialog_id: instance.dialog_id.clone(),
                                step: step.name().to_string(),
                                message: format!("{:#}", e),
                            }
                        })?
                    };

                    match signal {
                        StepSignal::Next(value) => {
                            Action::Resume(value.map_or(StepResult::Empty, StepResult::Value))
                        }
                        StepSignal::Skip => Action::Resume(StepResult::Skipped),
                        StepSignal::Prompt { dialog_id, text } => Action::Begin {
                            dialog_id,
                            options: json!({ "prompt": text }),
                            prompt: Some(text),
                        },
                        StepSignal::BeginDialog { dialog_id, options } => Action::Begin {
                            dialog_id,
                            options,
                            prompt: None,
                        },
                        StepSignal::EndDialog(value) => {
                            Action::End(value.map_or(StepResult::Empty, StepResult::Value))
                        }
                        StepSignal::ReplaceDialog { dialog_id, options } => {
                            // Validate before popping so an unknown id leaves the stack intact
                            self.find(&dialog_id)?;
                            stack.pop();
                            Action::Begin {
                                dialog_id,
                                options,
                                prompt: None,
                            }
                        }
                        StepSignal::CancelAll => {
                            debug!("Cancelling {} dialogs", stack.depth());
                            stack.clear();
                            return Ok(DialogTurnStatus::Cancelled);
                        }
                    }
                }
            };
        }
    }
}
