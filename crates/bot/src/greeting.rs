//! # Greeting Dialog
//!
//! The root waterfall of every conversation:
//! 1. `initialize_state` - make sure the conversation has a profile
//! 2. `prompt_for_name` - ask for a name unless we already know it
//! 3. `prompt_how_are_you` - remember the name and ask about the user's mood
//! 4. `classify_mood` - turn the reply into a `Mood` and react to it
//! 5. `offer_recommendations` - cheer up sad users with comedies, then hand
//!    over to the recommendation flow
//!
//! `GreetingDialog::builder` wires the waterfall, the recommendation flow
//! and their prompts into one `DialogSet`.

use async_trait::async_trait;
use std::sync::Arc;

use anyhow::Context;
use catalog::{MovieCatalog, genre_id};
use dialogs::{
    Dialog, DialogError, DialogSet, DialogStack, DialogTurnStatus, NAME_LENGTH_MIN,
    ProfileAccessor, StepContext, StepSignal, TurnContext, USER_PROFILE_PROPERTY, WaterfallStep,
    YEAR_MIN_EXCLUSIVE, name_validator, year_validator,
};
use domain::{MOOD_NEGATIVE, Mood, RecognizerResult, UserProfile};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::BotConfig;
use crate::recognizer::Recognizer;
use crate::recommend::{
    RECOMMEND_DIALOG, RECOMMENDATION_PROMPT, Recommender, YEAR_PROMPT, recommend_dialog,
};

/// Default id of the greeting waterfall
pub const USER_PROFILE_DIALOG: &str = "userProfileDialog";

/// Prompt ids
pub const NAME_PROMPT: &str = "namePrompt";
pub const MOOD_PROMPT: &str = "moodPrompt";

pub const NAME_PROMPT_TEXT: &str = "What is your name?";
pub const POSITIVE_MOOD_TEXT: &str = "Good!";
pub const NEGATIVE_MOOD_TEXT: &str =
    "I'm detecting negative sentiment, maybe some funny movie can cheer you up?";

/// Mood from recognizer output.
///
/// Only the presence of `MoodNegative` matters: anything else, including
/// nothing recognized at all, counts as Positive.
pub fn classify_mood(recognized: &RecognizerResult) -> Mood {
    if recognized.has_entity(MOOD_NEGATIVE) {
        Mood::Negative
    } else {
        Mood::Positive
    }
}

/// Trim and upper-case the first letter, leaving the rest untouched
pub fn capitalize_first(name: &str) -> String {
    let mut chars = name.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The greeting waterfall and everything it may begin
pub struct GreetingDialog {
    dialog_id: String,
    dialogs: DialogSet,
}

impl GreetingDialog {
    pub fn builder(dialog_id: impl Into<String>) -> GreetingDialogBuilder {
        GreetingDialogBuilder {
            dialog_id: dialog_id.into(),
            profiles: None,
            recognizer: None,
            catalog: None,
            config: BotConfig::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.dialog_id
    }

    pub fn dialogs(&self) -> &DialogSet {
        &self.dialogs
    }

    /// Start the greeting. `options.userProfile` seeds the profile of a new conversation.
    pub async fn begin(
        &self,
        turn: &mut TurnContext,
        stack: &mut DialogStack,
        options: Value,
    ) -> dialogs::Result<DialogTurnStatus> {
        self.dialogs
            .begin_dialog(turn, stack, &self.dialog_id, options)
            .await
    }

    pub async fn resume(
        &self,
        turn: &mut TurnContext,
        stack: &mut DialogStack,
    ) -> dialogs::Result<DialogTurnStatus> {
        self.dialogs.continue_dialog(turn, stack).await
    }
}

/// Collects the greeting's collaborators; `build` checks nothing is missing
pub struct GreetingDialogBuilder {
    dialog_id: String,
    profiles: Option<Arc<ProfileAccessor>>,
    recognizer: Option<Arc<dyn Recognizer>>,
    catalog: Option<Arc<dyn MovieCatalog>>,
    config: BotConfig,
}

impl GreetingDialogBuilder {
    pub fn profiles(mut self, profiles: Arc<ProfileAccessor>) -> Self {
        self.profiles = Some(profiles);
        self
    }

    pub fn recognizer(mut self, recognizer: Arc<dyn Recognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    pub fn catalog(mut self, catalog: Arc<dyn MovieCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn config(mut self, config: BotConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> dialogs::Result<GreetingDialog> {
        if self.dialog_id.trim().is_empty() {
            return Err(DialogError::configuration("dialogId is required"));
        }
        let profiles = self
            .profiles
            .ok_or_else(|| DialogError::configuration("userProfileAccessor is required"))?;
        let recognizer = self
            .recognizer
            .ok_or_else(|| DialogError::configuration("recognizer is required"))?;
        let catalog = self
            .catalog
            .ok_or_else(|| DialogError::configuration("movie catalog is required"))?;
        if genre_id(&self.config.cheer_up_genre).is_none() {
            return Err(DialogError::configuration(format!(
                "unknown cheer-up genre {}",
                self.config.cheer_up_genre
            )));
        }
        if self.config.cards_in_carousel == 0 {
            return Err(DialogError::configuration(
                "cards_in_carousel must be at least 1",
            ));
        }

        let recommender = Recommender::new(catalog, &self.config);
        let steps: Vec<Box<dyn WaterfallStep>> = vec![
            Box::new(InitializeState {
                profiles: profiles.clone(),
            }),
            Box::new(PromptForName {
                profiles: profiles.clone(),
            }),
            Box::new(PromptHowAreYou {
                profiles: profiles.clone(),
            }),
            Box::new(ClassifyMood {
                profiles: profiles.clone(),
                recognizer: recognizer.clone(),
            }),
            Box::new(OfferRecommendations {
                profiles,
                recommender: recommender.clone(),
                cheer_up_genre: self.config.cheer_up_genre.clone(),
                cheer_up_year: self.config.cheer_up_year,
            }),
        ];

        let mut dialogs = DialogSet::new();
        dialogs.add(self.dialog_id.clone(), Dialog::waterfall(steps))?;
        dialogs.add(RECOMMEND_DIALOG, recommend_dialog(recognizer, recommender))?;
        dialogs.add(
            NAME_PROMPT,
            Dialog::prompt_with(name_validator(NAME_LENGTH_MIN)),
        )?;
        dialogs.add(MOOD_PROMPT, Dialog::text_prompt())?;
        dialogs.add(RECOMMENDATION_PROMPT, Dialog::text_prompt())?;
        dialogs.add(
            YEAR_PROMPT,
            Dialog::prompt_with(year_validator(YEAR_MIN_EXCLUSIVE)),
        )?;

        info!(
            "Built greeting dialog {} with {} dialogs",
            self.dialog_id,
            dialogs.len()
        );
        Ok(GreetingDialog {
            dialog_id: self.dialog_id,
            dialogs,
        })
    }
}

struct InitializeState {
    profiles: Arc<ProfileAccessor>,
}

#[async_trait]
impl WaterfallStep for InitializeState {
    fn name(&self) -> &str {
        "initialize_state"
    }

    async fn run(&self, step: &mut StepContext<'_>) -> anyhow::Result<StepSignal> {
        if self.profiles.get(step.turn).await?.is_none() {
            let profile = match step.options.get(USER_PROFILE_PROPERTY) {
                Some(seed) if !seed.is_null() => serde_json::from_value(seed.clone())
                    .context("Invalid userProfile option")?,
                _ => UserProfile::new(),
            };
            self.profiles.set(step.turn, profile).await?;
        }
        Ok(step.next())
    }
}

struct PromptForName {
    profiles: Arc<ProfileAccessor>,
}

#[async_trait]
impl WaterfallStep for PromptForName {
    fn name(&self) -> &str {
        "prompt_for_name"
    }

    async fn run(&self, step: &mut StepContext<'_>) -> anyhow::Result<StepSignal> {
        let profile = self.profiles.get(step.turn).await?.unwrap_or_default();
        if profile.name.is_some() {
            return Ok(step.skip());
        }
        Ok(step.prompt(NAME_PROMPT, NAME_PROMPT_TEXT))
    }
}

struct PromptHowAreYou {
    profiles: Arc<ProfileAccessor>,
}

#[async_trait]
impl WaterfallStep for PromptHowAreYou {
    fn name(&self) -> &str {
        "prompt_how_are_you"
    }

    async fn run(&self, step: &mut StepContext<'_>) -> anyhow::Result<StepSignal> {
        let mut profile = self.profiles.get(step.turn).await?.unwrap_or_default();

        if profile.name.is_none() {
            if let Some(name) = step.result.as_str() {
                profile.name = Some(capitalize_first(name));
                self.profiles.set(step.turn, profile.clone()).await?;
            }
        }

        let name = profile.name.as_deref().unwrap_or("there");
        Ok(step.prompt(
            MOOD_PROMPT,
            format!("Hello {}, How are you today?", name),
        ))
    }
}

struct ClassifyMood {
    profiles: Arc<ProfileAccessor>,
    recognizer: Arc<dyn Recognizer>,
}

#[async_trait]
impl WaterfallStep for ClassifyMood {
    fn name(&self) -> &str {
        "classify_mood"
    }

    async fn run(&self, step: &mut StepContext<'_>) -> anyhow::Result<StepSignal> {
        let recognized = self
            .recognizer
            .recognize(step.turn)
            .await
            .context("Failed to recognize mood")?;
        let mood = classify_mood(&recognized);

        // Persist before reacting
        let mut profile = self.profiles.get(step.turn).await?.unwrap_or_default();
        profile.mood = Some(mood);
        self.profiles.set(step.turn, profile).await?;
        info!(
            "Classified mood of {} as {}",
            step.turn.conversation_id(),
            mood
        );

        match mood {
            Mood::Positive => step.turn.send_text(POSITIVE_MOOD_TEXT),
            Mood::Negative => step.turn.send_text(NEGATIVE_MOOD_TEXT),
        }
        Ok(step.next())
    }
}

struct OfferRecommendations {
    profiles: Arc<ProfileAccessor>,
    recommender: Recommender,
    cheer_up_genre: String,
    cheer_up_year: Option<i32>,
}

#[async_trait]
impl WaterfallStep for OfferRecommendations {
    fn name(&self) -> &str {
        "offer_recommendations"
    }

    async fn run(&self, step: &mut StepContext<'_>) -> anyhow::Result<StepSignal> {
        let mood = self.profiles.get(step.turn).await?.and_then(|p| p.mood);
        let Some(mood) = mood else {
            warn!("Profile has no mood, starting the conversation over");
            return Ok(step.cancel_all());
        };

        if mood == Mood::Negative {
            self.recommender
                .send_carousel(step.turn, &self.cheer_up_genre, self.cheer_up_year)
                .await;
        }
        Ok(step.begin_dialog(RECOMMEND_DIALOG, Value::Null))
    }
}
