//! # Recommendation Flow
//!
//! A looping waterfall that turns "something scary from 2005" into a carousel:
//! 1. Ask for a recommendation request
//! 2. Recognize the genre (required) and year (optional)
//!    - no usable genre: give a hint and start over
//!    - no year: ask for one; anything that is not a number means "any year"
//! 3. Query the catalog, window the results, render and send the carousel
//! 4. Start over so the user can ask again without being greeted again

use async_trait::async_trait;
use std::sync::Arc;

use anyhow::{Context, anyhow};
use carousel::{CardRenderer, ResultWindow, build_carousel};
use catalog::{MovieCatalog, genre_id};
use dialogs::{Dialog, StepContext, StepSignal, TurnContext, WaterfallStep, YEAR_MIN_EXCLUSIVE};
use domain::Activity;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::config::BotConfig;
use crate::recognizer::Recognizer;

/// Dialog id of the recommendation waterfall
pub const RECOMMEND_DIALOG: &str = "recommendDialog";

/// Prompt ids
pub const RECOMMENDATION_PROMPT: &str = "recomPrompt";
pub const YEAR_PROMPT: &str = "yearPrompt";

pub const RECOMMENDATION_PROMPT_TEXT: &str =
    "I know about movies, ask me a recommendation if you want";
pub const GENRE_HINT_TEXT: &str =
    "Which genre are you in the mood for? Try something like comedy or horror.";
pub const YEAR_PROMPT_TEXT: &str = "Any particular year? Type it, or say no if any year works.";
pub const FETCH_FAILED_TEXT: &str = "Sorry, I couldn't fetch recommendations right now.";

/// Key of the genre name in the dialog's scratch values
const GENRE_VALUE: &str = "genre";

/// Fetches, windows, renders and sends carousels
#[derive(Clone)]
pub struct Recommender {
    catalog: Arc<dyn MovieCatalog>,
    window: ResultWindow,
    renderer: CardRenderer,
}

impl Recommender {
    pub fn new(catalog: Arc<dyn MovieCatalog>, config: &BotConfig) -> Self {
        Self {
            catalog,
            window: config.window(),
            renderer: config.renderer(),
        }
    }

    /// Send a carousel for `genre` (and `year`) to the turn.
    ///
    /// Failures are never silent: the user gets an apology instead of cards.
    /// Returns whether a carousel was sent.
    pub async fn send_carousel(&self, turn: &mut TurnContext, genre: &str, year: Option<i32>) -> bool {
        let movies = match self.catalog.movies_by_genre_name(genre, year).await {
            Ok(movies) => movies,
            Err(e) => {
                warn!("Catalog lookup for {} ({:?}) failed: {}", genre, year, e);
                turn.send_text(FETCH_FAILED_TEXT);
                return false;
            }
        };

        if movies.is_empty() {
            info!("No {} movies for {:?}", genre, year);
            turn.send_text(match year {
                Some(year) => format!("I couldn't find any {} movies from {}.", genre, year),
                None => format!("I couldn't find any {} movies.", genre),
            });
            return false;
        }

        let total = movies.len();
        let cards = build_carousel(movies, &self.window, &self.renderer);
        info!("Sending {} of {} {} movies", cards.len(), total, genre);

        turn.send(Activity::Carousel(cards));
        turn.send_text(match year {
            Some(year) => format!("Here are some {} movies from {}.", genre, year),
            None => format!("Here are some {} movies.", genre),
        });
        true
    }
}

/// Build the recommendation waterfall
pub fn recommend_dialog(recognizer: Arc<dyn Recognizer>, recommender: Recommender) -> Dialog {
    let steps: Vec<Box<dyn WaterfallStep>> = vec![
        Box::new(AskForRecommendation),
        Box::new(ResolveGenre { recognizer }),
        Box::new(FetchRecommendations { recommender }),
    ];
    Dialog::waterfall(steps)
}

struct AskForRecommendation;

#[async_trait]
impl WaterfallStep for AskForRecommendation {
    fn name(&self) -> &str {
        "ask_for_recommendation"
    }

    async fn run(&self, step: &mut StepContext<'_>) -> anyhow::Result<StepSignal> {
        Ok(step.prompt(RECOMMENDATION_PROMPT, RECOMMENDATION_PROMPT_TEXT))
    }
}

struct ResolveGenre {
    recognizer: Arc<dyn Recognizer>,
}

#[async_trait]
impl WaterfallStep for ResolveGenre {
    fn name(&self) -> &str {
        "resolve_genre"
    }

    async fn run(&self, step: &mut StepContext<'_>) -> anyhow::Result<StepSignal> {
        let recognized = self
            .recognizer
            .recognize(step.turn)
            .await
            .context("Failed to recognize recommendation request")?;

        let Some(genre) = recognized.genre().filter(|genre| genre_id(genre).is_some()) else {
            debug!("No known genre in {:?}, starting over", recognized.text);
            step.turn.send_text(GENRE_HINT_TEXT);
            return Ok(step.restart());
        };
        step.values.insert(GENRE_VALUE.to_string(), json!(genre));

        match recognized.year() {
            Some(year) if i64::from(year) > YEAR_MIN_EXCLUSIVE => Ok(step.next_with(json!(year))),
            _ => Ok(step.prompt(YEAR_PROMPT, YEAR_PROMPT_TEXT)),
        }
    }
}

struct FetchRecommendations {
    recommender: Recommender,
}

#[async_trait]
impl WaterfallStep for FetchRecommendations {
    fn name(&self) -> &str {
        "fetch_recommendations"
    }

    async fn run(&self, step: &mut StepContext<'_>) -> anyhow::Result<StepSignal> {
        let genre = step
            .values
            .get(GENRE_VALUE)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| anyhow!("genre missing from dialog values"))?;
        // `null` from the year prompt means any year
        let year = step.result.as_i64().and_then(|year| i32::try_from(year).ok());

        self.recommender.send_carousel(step.turn, &genre, year).await;
        Ok(step.restart())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::CatalogError;
    use domain::{MovieId, MovieRecord};

    struct StaticCatalog {
        movies: Vec<MovieRecord>,
    }

    #[async_trait]
    impl MovieCatalog for StaticCatalog {
        async fn movies_by_genre(
            &self,
            _genre_id: &str,
            _year: Option<i32>,
        ) -> Result<Vec<MovieRecord>, CatalogError> {
            Ok(self.movies.clone())
        }

        async fn movie_details(&self, movie_id: MovieId) -> Result<MovieRecord, CatalogError> {
            Err(CatalogError::MalformedResponse(format!("no movie {}", movie_id)))
        }
    }

    fn recommender(movies: Vec<MovieRecord>) -> Recommender {
        Recommender::new(Arc::new(StaticCatalog { movies }), &BotConfig::default())
    }

    #[tokio::test]
    async fn test_send_carousel_windows_results() {
        let movies = (1..=10).map(|id| MovieRecord::new(id, format!("Movie {}", id))).collect();
        let mut turn = TurnContext::new("conv-1", "");

        assert!(recommender(movies).send_carousel(&mut turn, "comedy", None).await);

        let replies = turn.replies();
        assert_eq!(replies.len(), 2);
        assert_eq!(replies[0].as_carousel().map(<[_]>::len), Some(3));
        assert_eq!(replies[1].as_text(), Some("Here are some comedy movies."));
    }

    #[tokio::test]
    async fn test_empty_results_are_reported() {
        let mut turn = TurnContext::new("conv-1", "");

        assert!(!recommender(Vec::new()).send_carousel(&mut turn, "western", Some(1950)).await);
        assert_eq!(
            turn.replies()[0].as_text(),
            Some("I couldn't find any western movies from 1950.")
        );
    }

    #[tokio::test]
    async fn test_unknown_genre_is_an_apology() {
        let mut turn = TurnContext::new("conv-1", "");

        assert!(!recommender(Vec::new()).send_carousel(&mut turn, "polka", None).await);
        assert_eq!(turn.replies()[0].as_text(), Some(FETCH_FAILED_TEXT));
    }
}
