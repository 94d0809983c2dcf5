//! Turn and step contexts handed to dialog code.

use domain::{Activity, ConversationId};
use serde_json::{Map, Value};

use crate::signal::StepSignal;

/// One inbound user message plus the replies produced while handling it
#[derive(Debug, Clone)]
pub struct TurnContext {
    conversation_id: ConversationId,
    text: String,
    replies: Vec<Activity>,
}

impl TurnContext {
    pub fn new(conversation_id: impl Into<ConversationId>, text: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            text: text.into(),
            replies: Vec::new(),
        }
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    /// Raw text of the user's message
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Queue an outbound activity
    pub fn send(&mut self, activity: Activity) {
        self.replies.push(activity);
    }

    pub fn send_text(&mut self, text: impl Into<String>) {
        self.send(Activity::Text(text.into()));
    }

    pub fn replies(&self) -> &[Activity] {
        &self.replies
    }

    pub fn into_replies(self) -> Vec<Activity> {
        self.replies
    }
}

/// What the previous step (or a finished child dialog) handed to the current step
#[derive(Debug, Clone, Default, PartialEq)]
pub enum StepResult {
    /// First step of a dialog, or `Next(None)`
    #[default]
    Empty,
    /// The previous step returned `StepSignal::Skip`
    Skipped,
    Value(Value),
}

impl StepResult {
    pub fn value(&self) -> Option<&Value> {
        match self {
            StepResult::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value().and_then(Value::as_str)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.value().and_then(Value::as_i64)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, StepResult::Skipped)
    }

    pub fn into_value(self) -> Option<Value> {
        match self {
            StepResult::Value(value) => Some(value),
            _ => None,
        }
    }
}

/// Everything a waterfall step may read or write while it runs
pub struct StepContext<'a> {
    pub turn: &'a mut TurnContext,
    /// Scratch values of the running dialog instance
    pub values: &'a mut Map<String, Value>,
    /// Options the dialog was begun with
    pub options: &'a Value,
    pub result: StepResult,
    pub dialog_id: &'a str,
    pub index: usize,
}

impl StepContext<'_> {
    pub fn next(&self) -> StepSignal {
        StepSignal::Next(None)
    }

    pub fn next_with(&self, value: Value) -> StepSignal {
        StepSignal::Next(Some(value))
    }

    pub fn skip(&self) -> StepSignal {
        StepSignal::Skip
    }

    pub fn prompt(&self, dialog_id: &str, text: impl Into<String>) -> StepSignal {
        StepSignal::Prompt {
            dialog_id: dialog_id.to_string(),
            text: text.into(),
        }
    }

    pub fn begin_dialog(&self, dialog_id: &str, options: Value) -> StepSignal {
        StepSignal::BeginDialog {
            dialog_id: dialog_id.to_string(),
            options,
        }
    }

    pub fn end_dialog(&self, result: Option<Value>) -> StepSignal {
        StepSignal::EndDialog(result)
    }

    /// End this dialog and begin `dialog_id` in its place
    pub fn replace_dialog(&self, dialog_id: &str, options: Value) -> StepSignal {
        StepSignal::ReplaceDialog {
            dialog_id: dialog_id.to_string(),
            options,
        }
    }

    /// Restart the running dialog from its first step
    pub fn restart(&self) -> StepSignal {
        self.replace_dialog(self.dialog_id, self.options.clone())
    }

    pub fn cancel_all(&self) -> StepSignal {
        StepSignal::CancelAll
    }
}
