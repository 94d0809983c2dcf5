//! Dialog instances and the per-conversation dialog stack.
//!
//! Both are plain serde types: between turns they live only in the session
//! store, never in memory.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One active (possibly nested) dialog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogInstance {
    pub dialog_id: String,
    /// Index of the waterfall step that ran last (or is about to run)
    pub step_index: usize,
    /// Scratch values owned by this instance, dropped when it ends
    #[serde(default)]
    pub values: Map<String, Value>,
    /// Options passed to `begin_dialog`
    #[serde(default)]
    pub options: Value,
    /// Text of the prompt being waited on, for prompt instances
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl DialogInstance {
    pub fn new(dialog_id: impl Into<String>, options: Value) -> Self {
        Self {
            dialog_id: dialog_id.into(),
            step_index: 0,
            values: Map::new(),
            options,
            prompt: None,
        }
    }
}

/// Stack of active dialogs for one conversation.
///
/// Only the top instance may resume on the next turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogStack {
    instances: Vec<DialogInstance>,
}

impl DialogStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, instance: DialogInstance) {
        self.instances.push(instance);
    }

    pub fn pop(&mut self) -> Option<DialogInstance> {
        self.instances.pop()
    }

    pub fn top(&self) -> Option<&DialogInstance> {
        self.instances.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut DialogInstance> {
        self.instances.last_mut()
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn depth(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Dialog ids from the bottom of the stack to the top
    pub fn dialog_ids(&self) -> Vec<&str> {
        self.instances.iter().map(|i| i.dialog_id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_push_pop_order() {
        let mut stack = DialogStack::new();
        stack.push(DialogInstance::new("outer", Value::Null));
        stack.push(DialogInstance::new("inner", Value::Null));

        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.top().unwrap().dialog_id, "inner");
        assert_eq!(stack.dialog_ids(), vec!["outer", "inner"]);

        assert_eq!(stack.pop().unwrap().dialog_id, "inner");
        assert_eq!(stack.top().unwrap().dialog_id, "outer");
    }

    #[test]
    fn test_stack_survives_serialization() {
        let mut stack = DialogStack::new();
        let mut instance = DialogInstance::new("recommend", json!({ "source": "greeting" }));
        instance.step_index = 2;
        instance.values.insert("genre".to_string(), json!("27"));
        stack.push(instance);

        let mut prompt = DialogInstance::new("yearPrompt", Value::Null);
        prompt.prompt = Some("Any particular year?".to_string());
        stack.push(prompt);

        let json = serde_json::to_value(&stack).unwrap();
        let back: DialogStack = serde_json::from_value(json).unwrap();
        assert_eq!(back, stack);
    }
}
