//! Natural-language recognition seam.
//!
//! Dialog steps only depend on the `Recognizer` trait. `KeywordRecognizer`
//! is a deterministic implementation good enough for the console host and
//! tests: it looks for known words instead of running a language model.

use async_trait::async_trait;
use catalog::genre_names;
use dialogs::TurnContext;
use domain::{
    DATETIME_ENTITY, GENRE_ENTITY, MOOD_INTENT, MOOD_NEGATIVE, MOOD_POSITIVE, MOVIE_CHOOSE_INTENT,
    NONE_INTENT, RecognizerResult,
};
use serde_json::json;
use tracing::debug;

/// Turns the text of a turn into intents and entities
#[async_trait]
pub trait Recognizer: Send + Sync {
    async fn recognize(&self, turn: &TurnContext) -> anyhow::Result<RecognizerResult>;
}

/// Words and phrases that mark a negative mood. Checked before the positive list.
const NEGATIVE_WORDS: &[&str] = &[
    "not good",
    "not great",
    "not well",
    "not fine",
    "bad",
    "sad",
    "terrible",
    "awful",
    "horrible",
    "miserable",
    "depressed",
    "upset",
    "angry",
    "tired",
    "bored",
    "down",
    "lonely",
];

/// Negated negatives. Checked before the negative list, which would match "bad".
const NEGATED_NEGATIVE_WORDS: &[&str] = &["not bad", "not too bad", "not so bad", "not that bad"];

const POSITIVE_WORDS: &[&str] = &[
    "good",
    "great",
    "fine",
    "well",
    "happy",
    "awesome",
    "amazing",
    "excellent",
    "fantastic",
    "wonderful",
    "ok",
    "okay",
];

/// Keyword based recognizer
#[derive(Debug, Clone, Default)]
pub struct KeywordRecognizer;

impl KeywordRecognizer {
    pub fn new() -> Self {
        Self
    }

    /// Recognize a raw utterance
    pub fn recognize_text(&self, text: &str) -> RecognizerResult {
        let normalized = normalize(text);
        let mut result = RecognizerResult::new(text);

        if let Some(word) = find_phrase(&normalized, NEGATED_NEGATIVE_WORDS) {
            result = result.with_entity(MOOD_POSITIVE, json!(word));
        } else if let Some(word) = find_phrase(&normalized, NEGATIVE_WORDS) {
            result = result.with_entity(MOOD_NEGATIVE, json!(word));
        } else if let Some(word) = find_phrase(&normalized, POSITIVE_WORDS) {
            result = result.with_entity(MOOD_POSITIVE, json!(word));
        }

        // Genres in the order the user mentioned them
        let mut genres: Vec<(usize, &str)> = genre_names()
            .filter_map(|genre| phrase_position(&normalized, genre).map(|at| (at, genre)))
            .collect();
        genres.sort_by_key(|&(at, genre)| (at, std::cmp::Reverse(genre.len())));
        for (_, genre) in genres {
            result = result.with_entity(GENRE_ENTITY, json!([genre]));
        }

        for token in normalized.split(' ') {
            if token.len() == 4 && token.bytes().all(|b| b.is_ascii_digit()) {
                result = result.with_entity(
                    DATETIME_ENTITY,
                    json!({ "timex": [token], "type": "daterange" }),
                );
            }
        }

        let has_mood = result.has_entity(MOOD_NEGATIVE) || result.has_entity(MOOD_POSITIVE);
        if has_mood {
            result = result.with_intent(MOOD_INTENT, 0.9);
        }
        if result.has_entity(GENRE_ENTITY) {
            result = result.with_intent(MOVIE_CHOOSE_INTENT, 0.9);
        }
        if result.intents.is_empty() {
            result = result.with_intent(NONE_INTENT, 1.0);
        }

        debug!(
            "Recognized {:?} with entities {:?}",
            result.top_intent(),
            result.entities.keys().collect::<Vec<_>>()
        );
        result
    }
}

#[async_trait]
impl Recognizer for KeywordRecognizer {
    async fn recognize(&self, turn: &TurnContext) -> anyhow::Result<RecognizerResult> {
        Ok(self.recognize_text(turn.text()))
    }
}

/// Lowercase, keep letters, digits and hyphens, collapse everything else to single spaces
fn normalize(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { ' ' })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Byte offset of the first whole-word (or whole-phrase) match
fn phrase_position(normalized: &str, phrase: &str) -> Option<usize> {
    format!(" {} ", normalized).find(&format!(" {} ", phrase))
}

fn contains_phrase(normalized: &str, phrase: &str) -> bool {
    phrase_position(normalized, phrase).is_some()
}

fn find_phrase<'a>(normalized: &str, phrases: &[&'a str]) -> Option<&'a str> {
    phrases
        .iter()
        .copied()
        .find(|phrase| contains_phrase(normalized, phrase))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_mood() {
        let result = KeywordRecognizer::new().recognize_text("I feel terrible");
        assert!(result.has_entity(MOOD_NEGATIVE));
        assert!(!result.has_entity(MOOD_POSITIVE));
        assert_eq!(result.top_intent().map(|(name, _)| name), Some(MOOD_INTENT));
    }

    #[test]
    fn test_negation_wins_over_positive_word() {
        let result = KeywordRecognizer::new().recognize_text("Not good at all.");
        assert!(result.has_entity(MOOD_NEGATIVE));
        assert!(!result.has_entity(MOOD_POSITIVE));
    }

    #[test]
    fn test_not_bad_is_positive() {
        let recognizer = KeywordRecognizer::new();
        for text in ["Not bad", "not too bad, thanks"] {
            let result = recognizer.recognize_text(text);
            assert!(result.has_entity(MOOD_POSITIVE), "{}", text);
            assert!(!result.has_entity(MOOD_NEGATIVE), "{}", text);
        }
        assert!(recognizer.recognize_text("pretty bad").has_entity(MOOD_NEGATIVE));
    }

    #[test]
    fn test_genres_follow_utterance_order() {
        let recognizer = KeywordRecognizer::new();
        let result = recognizer.recognize_text("horror, not comedy");
        assert_eq!(result.genre().as_deref(), Some("horror"));
        assert_eq!(result.entities[GENRE_ENTITY].len(), 2);

        let result = recognizer.recognize_text("comedy or maybe horror");
        assert_eq!(result.genre().as_deref(), Some("comedy"));
    }

    #[test]
    fn test_positive_mood_needs_whole_word() {
        let recognizer = KeywordRecognizer::new();
        assert!(recognizer.recognize_text("Great, thanks!").has_entity(MOOD_POSITIVE));
        assert!(!recognizer.recognize_text("undefined").has_entity(MOOD_POSITIVE));
    }

    #[test]
    fn test_genre_and_year() {
        let result = KeywordRecognizer::new().recognize_text("Some Horror from 2005 please");
        assert_eq!(result.genre().as_deref(), Some("horror"));
        assert_eq!(result.year(), Some(2005));
        assert_eq!(
            result.top_intent().map(|(name, _)| name),
            Some(MOVIE_CHOOSE_INTENT)
        );
    }

    #[test]
    fn test_multi_word_genre() {
        let result = KeywordRecognizer::new().recognize_text("any science fiction?");
        assert_eq!(result.genre().as_deref(), Some("science fiction"));
        assert_eq!(result.year(), None);
    }

    #[test]
    fn test_nothing_recognized() {
        let result = KeywordRecognizer::new().recognize_text("hmm 12345");
        assert!(result.entities.is_empty());
        assert_eq!(result.top_intent(), Some((NONE_INTENT, 1.0)));
    }

    #[tokio::test]
    async fn test_recognize_reads_turn_text() {
        let turn = TurnContext::new("conv-1", "a comedy");
        let result = KeywordRecognizer::new().recognize(&turn).await.unwrap();
        assert_eq!(result.genre().as_deref(), Some("comedy"));
        assert_eq!(result.text, "a comedy");
    }
}
