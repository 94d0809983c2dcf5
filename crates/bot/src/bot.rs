//! # Movie Bot
//!
//! Turn driver for the whole conversation. One call to `on_turn` handles one
//! user message:
//! 1. Load the conversation's dialog stack from the session store
//! 2. Continue whatever dialog is waiting for input
//! 3. If nothing was running (or a step cancelled everything), greet the user
//!    in the same turn
//! 4. Save the stack back and return the replies
//!
//! The dialog registry is immutable and shared, so one `MovieBot` can serve
//! many conversations concurrently. Each conversation only reads and writes
//! its own keys in the store.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use catalog::MovieCatalog;
use dialogs::{ConversationState, DialogTurnStatus, Storage, TurnContext};
use domain::{Activity, UserProfile};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::config::BotConfig;
use crate::greeting::{GreetingDialog, USER_PROFILE_DIALOG};
use crate::recognizer::Recognizer;

#[derive(Clone)]
pub struct MovieBot {
    greeting: Arc<GreetingDialog>,
    state: ConversationState,
}

impl MovieBot {
    /// Wire a bot from its collaborators
    ///
    /// # Arguments
    /// * `catalog` - Where recommendations come from
    /// * `recognizer` - Turns user text into intents and entities
    /// * `storage` - Session store backend
    /// * `config` - Carousel size and cheer-up settings
    pub fn new(
        catalog: Arc<dyn MovieCatalog>,
        recognizer: Arc<dyn Recognizer>,
        storage: Arc<dyn Storage>,
        config: BotConfig,
    ) -> dialogs::Result<Self> {
        let state = ConversationState::new(storage);
        let greeting = GreetingDialog::builder(USER_PROFILE_DIALOG)
            .profiles(state.profile_accessor())
            .recognizer(recognizer)
            .catalog(catalog)
            .config(config)
            .build()?;
        Ok(Self::from_parts(greeting, state))
    }

    pub fn from_parts(greeting: GreetingDialog, state: ConversationState) -> Self {
        Self {
            greeting: Arc::new(greeting),
            state,
        }
    }

    /// Handle one user message and return everything the bot says back
    #[instrument(skip(self, text))]
    pub async fn on_turn(&self, conversation_id: &str, text: &str) -> Result<Vec<Activity>> {
        let start_time = Instant::now();
        let mut turn = TurnContext::new(conversation_id, text);

        let mut stack = self
            .state
            .load_stack(&turn)
            .await
            .context("Failed to load dialog state")?;
        debug!("Loaded dialog stack {:?}", stack.dialog_ids());

        let status = self
            .greeting
            .resume(&mut turn, &mut stack)
            .await
            .context("Failed to continue dialog")?;

        let status = match status {
            DialogTurnStatus::Empty | DialogTurnStatus::Cancelled => {
                info!("Starting {} for {}", self.greeting.id(), conversation_id);
                self.greeting
                    .begin(&mut turn, &mut stack, Value::Null)
                    .await
                    .context("Failed to begin greeting")?
            }
            other => other,
        };

        self.state
            .save_stack(&turn, stack)
            .await
            .context("Failed to save dialog state")?;

        let replies = turn.into_replies();
        info!(
            "Turn for {} ended {:?} with {} replies in {:.2?}",
            conversation_id,
            status,
            replies.len(),
            start_time.elapsed()
        );
        Ok(replies)
    }

    /// Profile stored for a conversation, if any
    pub async fn profile(&self, conversation_id: &str) -> Result<Option<UserProfile>> {
        let turn = TurnContext::new(conversation_id, "");
        self.state
            .profile_accessor()
            .get(&turn)
            .await
            .context("Failed to read user profile")
    }

    /// Forget a conversation: the next message starts a fresh greeting
    pub async fn reset(&self, conversation_id: &str) -> Result<()> {
        let turn = TurnContext::new(conversation_id, "");
        self.state
            .clear(&turn)
            .await
            .context("Failed to clear conversation state")?;
        info!("Reset conversation {}", conversation_id);
        Ok(())
    }
}
