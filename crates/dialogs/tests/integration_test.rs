//! Integration tests for the dialog engine.
//!
//! These tests drive small waterfalls turn by turn, the way a bot would:
//! one `TurnContext` per user message, the same `DialogStack` carried across turns.

use dialogs::{
    ConversationState, Dialog, DialogError, DialogSet, DialogStack, DialogTurnStatus,
    MemoryStorage, TurnContext, name_validator, step_fn,
};
use domain::Activity;
use serde_json::{Value, json};
use std::sync::Arc;

/// Route engine logs to the test harness; only the first call installs the subscriber
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("dialogs=debug")
        .with_test_writer()
        .try_init();
}

fn texts(turn: &TurnContext) -> Vec<String> {
    turn.replies()
        .iter()
        .filter_map(Activity::as_text)
        .map(str::to_string)
        .collect()
}

/// Dialogs shared by most tests:
/// - `hello`: ask a name, greet, end with the name
/// - `parent`: run `hello` as a child and wrap its result
/// - `echo`: ask for text, echo it and start over
fn create_dialog_set() -> DialogSet {
    let mut set = DialogSet::new();
    set.add("askName", Dialog::prompt_with(name_validator(3))).unwrap();
    set.add("askText", Dialog::text_prompt()).unwrap();

    set.add(
        "hello",
        Dialog::waterfall(vec![
            step_fn("ask", |step| Ok(step.prompt("askName", "What is your name?"))),
            step_fn("greet", |step| {
                let name = step.result.as_str().unwrap_or_default().to_string();
                step.turn.send_text(format!("Hello {}", name));
                Ok(step.end_dialog(Some(json!(name))))
            }),
        ]),
    )
    .unwrap();

    set.add(
        "parent",
        Dialog::waterfall(vec![
            step_fn("child", |step| Ok(step.begin_dialog("hello", Value::Null))),
            step_fn("wrap", |step| {
                let child = step.result.value().cloned().unwrap_or_default();
                Ok(step.end_dialog(Some(json!({ "child": child }))))
            }),
        ]),
    )
    .unwrap();

    set.add(
        "echo",
        Dialog::waterfall(vec![
            step_fn("ask", |step| Ok(step.prompt("askText", "Say something"))),
            step_fn("answer", |step| {
                let text = step.result.as_str().unwrap_or_default().to_string();
                step.turn.send_text(format!("echo: {}", text));
                Ok(step.restart())
            }),
        ]),
    )
    .unwrap();

    set
}

#[tokio::test]
async fn test_prompt_suspends_and_resumes() {
    init_tracing();
    let set = create_dialog_set();
    let mut stack = DialogStack::new();

    let mut turn = TurnContext::new("conv-1", "hi");
    let status = set
        .begin_dialog(&mut turn, &mut stack, "hello", Value::Null)
        .await
        .unwrap();
    assert_eq!(status, DialogTurnStatus::Waiting);
    assert_eq!(texts(&turn), vec!["What is your name?"]);
    assert_eq!(stack.dialog_ids(), vec!["hello", "askName"]);

    let mut turn = TurnContext::new("conv-1", "  ada ");
    let status = set.continue_dialog(&mut turn, &mut stack).await.unwrap();
    assert_eq!(status, DialogTurnStatus::Complete(Some(json!("ada"))));
    assert_eq!(texts(&turn), vec!["Hello ada"]);
    assert!(stack.is_empty());
}

#[tokio::test]
async fn test_rejected_input_reprompts_without_advancing() {
    let set = create_dialog_set();
    let mut stack = DialogStack::new();

    let mut turn = TurnContext::new("conv-1", "hi");
    set.begin_dialog(&mut turn, &mut stack, "hello", Value::Null)
        .await
        .unwrap();
    let before = stack.clone();

    let mut turn = TurnContext::new("conv-1", "al");
    let status = set.continue_dialog(&mut turn, &mut stack).await.unwrap();

    assert_eq!(status, DialogTurnStatus::Waiting);
    assert_eq!(
        texts(&turn),
        vec!["Names need to be at least 3 characters long.", "What is your name?"]
    );
    assert_eq!(stack, before);

    // A valid answer still goes through afterwards
    let mut turn = TurnContext::new("conv-1", "Alan");
    let status = set.continue_dialog(&mut turn, &mut stack).await.unwrap();
    assert_eq!(status, DialogTurnStatus::Complete(Some(json!("Alan"))));
}

#[tokio::test]
async fn test_skip_hands_skipped_marker_to_next_step() {
    let mut set = DialogSet::new();
    set.add(
        "skipper",
        Dialog::waterfall(vec![
            step_fn("nothing", |step| Ok(step.skip())),
            step_fn("check", |step| {
                Ok(step.end_dialog(Some(json!(step.result.is_skipped()))))
            }),
        ]),
    )
    .unwrap();

    let mut stack = DialogStack::new();
    let mut turn = TurnContext::new("conv-1", "");
    let status = set
        .begin_dialog(&mut turn, &mut stack, "skipper", Value::Null)
        .await
        .unwrap();

    assert_eq!(status, DialogTurnStatus::Complete(Some(json!(true))));
    assert!(turn.replies().is_empty());
}

#[tokio::test]
async fn test_child_result_returns_to_parent() {
    init_tracing();
    let set = create_dialog_set();
    let mut stack = DialogStack::new();

    let mut turn = TurnContext::new("conv-1", "hi");
    set.begin_dialog(&mut turn, &mut stack, "parent", Value::Null)
        .await
        .unwrap();
    assert_eq!(stack.depth(), 3);

    let mut turn = TurnContext::new("conv-1", "Grace");
    let status = set.continue_dialog(&mut turn, &mut stack).await.unwrap();

    assert_eq!(
        status,
        DialogTurnStatus::Complete(Some(json!({ "child": "Grace" })))
    );
    assert_eq!(texts(&turn), vec!["Hello Grace"]);
    assert!(stack.is_empty());
}

#[tokio::test]
async fn test_replace_keeps_stack_depth() {
    let set = create_dialog_set();
    let mut stack = DialogStack::new();

    let mut turn = TurnContext::new("conv-1", "hi");
    set.begin_dialog(&mut turn, &mut stack, "echo", Value::Null)
        .await
        .unwrap();
    let depth = stack.depth();

    for word in ["one", "two", "three"] {
        let mut turn = TurnContext::new("conv-1", word);
        let status = set.continue_dialog(&mut turn, &mut stack).await.unwrap();

        assert_eq!(status, DialogTurnStatus::Waiting);
        assert_eq!(texts(&turn), vec![format!("echo: {}", word), "Say something".to_string()]);
        assert_eq!(stack.depth(), depth);
    }
}

#[tokio::test]
async fn test_replace_with_unknown_dialog_leaves_stack_intact() {
    let mut set = DialogSet::new();
    set.add(
        "bad",
        Dialog::waterfall(vec![step_fn("swap", |step| {
            Ok(step.replace_dialog("missing", Value::Null))
        })]),
    )
    .unwrap();

    let mut stack = DialogStack::new();
    let mut turn = TurnContext::new("conv-1", "");
    let result = set
        .begin_dialog(&mut turn, &mut stack, "bad", Value::Null)
        .await;

    assert!(matches!(result, Err(DialogError::UnknownDialog(id)) if id == "missing"));
    assert_eq!(stack.dialog_ids(), vec!["bad"]);
}

#[tokio::test]
async fn test_cancel_all_clears_stack() {
    let mut set = DialogSet::new();
    set.add("askText", Dialog::text_prompt()).unwrap();
    set.add(
        "confirm",
        Dialog::waterfall(vec![
            step_fn("ask", |step| Ok(step.prompt("askText", "Continue?"))),
            step_fn("decide", |step| {
                if step.result.as_str() == Some("no") {
                    Ok(step.cancel_all())
                } else {
                    Ok(step.end_dialog(None))
                }
            }),
        ]),
    )
    .unwrap();

    let mut stack = DialogStack::new();
    let mut turn = TurnContext::new("conv-1", "");
    set.begin_dialog(&mut turn, &mut stack, "confirm", Value::Null)
        .await
        .unwrap();

    let mut turn = TurnContext::new("conv-1", "no");
    let status = set.continue_dialog(&mut turn, &mut stack).await.unwrap();

    assert_eq!(status, DialogTurnStatus::Cancelled);
    assert!(stack.is_empty());
}

#[tokio::test]
async fn test_running_past_last_step_completes() {
    let mut set = DialogSet::new();
    set.add(
        "single",
        Dialog::waterfall(vec![step_fn("only", |step| Ok(step.next_with(json!(7))))]),
    )
    .unwrap();

    let mut stack = DialogStack::new();
    let mut turn = TurnContext::new("conv-1", "");
    let status = set
        .begin_dialog(&mut turn, &mut stack, "single", Value::Null)
        .await
        .unwrap();

    assert_eq!(status, DialogTurnStatus::Complete(Some(json!(7))));
    assert!(stack.is_empty());
}

#[tokio::test]
async fn test_values_are_scoped_to_the_instance() {
    let mut set = DialogSet::new();
    set.add("askText", Dialog::text_prompt()).unwrap();
    set.add(
        "collect",
        Dialog::waterfall(vec![
            step_fn("remember", |step| {
                step.values.insert("seen".to_string(), json!(step.index));
                Ok(step.prompt("askText", "More?"))
            }),
            step_fn("recall", |step| {
                let seen = step.values.get("seen").cloned();
                Ok(step.end_dialog(seen))
            }),
        ]),
    )
    .unwrap();

    let mut stack = DialogStack::new();
    let mut turn = TurnContext::new("conv-1", "");
    set.begin_dialog(&mut turn, &mut stack, "collect", Value::Null)
        .await
        .unwrap();

    let mut turn = TurnContext::new("conv-1", "yes");
    let status = set.continue_dialog(&mut turn, &mut stack).await.unwrap();
    assert_eq!(status, DialogTurnStatus::Complete(Some(json!(0))));
}

#[tokio::test]
async fn test_prompt_text_from_options() {
    let set = create_dialog_set();
    let mut stack = DialogStack::new();

    let mut turn = TurnContext::new("conv-1", "");
    let status = set
        .begin_dialog(&mut turn, &mut stack, "askText", json!({ "prompt": "Type anything" }))
        .await
        .unwrap();
    assert_eq!(status, DialogTurnStatus::Waiting);
    assert_eq!(texts(&turn), vec!["Type anything"]);

    let mut turn = TurnContext::new("conv-1", "anything");
    let status = set.continue_dialog(&mut turn, &mut stack).await.unwrap();
    assert_eq!(status, DialogTurnStatus::Complete(Some(json!("anything"))));
}

#[tokio::test]
async fn test_step_error_names_dialog_and_step() {
    init_tracing();
    let mut set = DialogSet::new();
    set.add(
        "broken",
        Dialog::waterfall(vec![step_fn("explode", |_| Err(anyhow::anyhow!("boom")))]),
    )
    .unwrap();

    let mut stack = DialogStack::new();
    let mut turn = TurnContext::new("conv-1", "");
    let result = set
        .begin_dialog(&mut turn, &mut stack, "broken", Value::Null)
        .await;

    match result {
        Err(DialogError::Step {
            dialog_id,
            step,
            message,
        }) => {
            assert_eq!(dialog_id, "broken");
            assert_eq!(step, "explode");
            assert!(message.contains("boom"));
        }
        other => panic!("expected a step error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_and_empty_stack() {
    let set = create_dialog_set();
    let mut stack = DialogStack::new();
    let mut turn = TurnContext::new("conv-1", "hi");

    let status = set.continue_dialog(&mut turn, &mut stack).await.unwrap();
    assert_eq!(status, DialogTurnStatus::Empty);

    let result = set
        .begin_dialog(&mut turn, &mut stack, "nope", Value::Null)
        .await;
    assert!(matches!(result, Err(DialogError::UnknownDialog(_))));
    assert!(stack.is_empty());
}

#[test]
fn test_registration_errors() {
    let mut set = DialogSet::new();

    assert!(matches!(
        set.add("", Dialog::text_prompt()),
        Err(DialogError::Configuration(_))
    ));

    set.add("askText", Dialog::text_prompt()).unwrap();
    assert!(matches!(
        set.add("askText", Dialog::text_prompt()),
        Err(DialogError::Configuration(_))
    ));
    assert_eq!(set.len(), 1);
}

#[tokio::test]
async fn test_stack_survives_storage_between_turns() {
    let set = create_dialog_set();
    let state = ConversationState::new(Arc::new(MemoryStorage::new()));

    let mut turn = TurnContext::new("conv-1", "hi");
    let mut stack = state.load_stack(&turn).await.unwrap();
    set.begin_dialog(&mut turn, &mut stack, "hello", Value::Null)
        .await
        .unwrap();
    state.save_stack(&turn, stack).await.unwrap();

    let mut turn = TurnContext::new("conv-1", "Linus");
    let mut stack = state.load_stack(&turn).await.unwrap();
    assert_eq!(stack.depth(), 2);

    let status = set.continue_dialog(&mut turn, &mut stack).await.unwrap();
    assert_eq!(status, DialogTurnStatus::Complete(Some(json!("Linus"))));
    assert_eq!(texts(&turn), vec!["Hello Linus"]);
}
