//! Recognizer output: intents and entities extracted from one user utterance.
//!
//! The NLU model itself is a black box. Everything downstream only relies on
//! the shape defined here:
//! - `intents`: intent name -> confidence score
//! - `entities`: entity name -> ordered list of JSON values
//!
//! Helper accessors interpret the entities the dialogs care about
//! (mood markers, genre names, `datetime` timex values).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

// Supported intents
pub const MOVIE_CHOOSE_INTENT: &str = "MovieChoose";
pub const MOOD_INTENT: &str = "Mood";
pub const NONE_INTENT: &str = "None";

// Supported entities
pub const MOOD_POSITIVE: &str = "MoodPositive";
pub const MOOD_NEGATIVE: &str = "MoodNegative";
pub const GENRE_ENTITY: &str = "genre";
pub const DATETIME_ENTITY: &str = "datetime";

/// Result of recognizing a single turn. Produced per turn, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecognizerResult {
    /// The utterance that was recognized
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub intents: HashMap<String, f64>,
    #[serde(default)]
    pub entities: HashMap<String, Vec<Value>>,
}

impl RecognizerResult {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Builder-style helper to attach an intent score
    pub fn with_intent(mut self, intent: impl Into<String>, score: f64) -> Self {
        self.intents.insert(intent.into(), score);
        self
    }

    /// Builder-style helper to append a value to an entity list
    pub fn with_entity(mut self, name: impl Into<String>, value: Value) -> Self {
        self.entities.entry(name.into()).or_default().push(value);
        self
    }

    /// True when the recognizer produced at least one value for `name`
    pub fn has_entity(&self, name: &str) -> bool {
        self.entities.get(name).is_some_and(|values| !values.is_empty())
    }

    /// Highest scoring intent, `None` when no intents were produced.
    ///
    /// Ties resolve to the lexicographically smallest name so the result is stable.
    pub fn top_intent(&self) -> Option<(&str, f64)> {
        self.intents
            .iter()
            .max_by(|a, b| {
                a.1.partial_cmp(b.1)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| b.0.cmp(a.0))
            })
            .map(|(name, score)| (name.as_str(), *score))
    }

    /// First genre name mentioned, lowercased.
    ///
    /// Accepts both plain string values and list-entity values
    /// (`[["horror"]]`, where the first canonical form wins).
    pub fn genre(&self) -> Option<String> {
        let first = self.entities.get(GENRE_ENTITY)?.first()?;
        let name = match first {
            Value::String(name) => name.as_str(),
            Value::Array(forms) => forms.first()?.as_str()?,
            _ => return None,
        };
        let name = name.trim();
        if name.is_empty() {
            None
        } else {
            Some(name.to_lowercase())
        }
    }

    /// Year taken from the first token of the first `datetime` entity's timex list.
    ///
    /// Malformed values are treated as absent rather than guessed at.
    pub fn year(&self) -> Option<i32> {
        let first = self.entities.get(DATETIME_ENTITY)?.first()?;
        let token = first.get("timex")?.as_array()?.first()?.as_str()?;
        parse_timex_year(token)
    }
}

/// Parse a timex token of the form `YYYY` or `YYYY-...` into a year.
///
/// Anything else (`XXXX-12`, `PRESENT_REF`, `19`, ...) yields `None`.
pub fn parse_timex_year(token: &str) -> Option<i32> {
    let token = token.trim();
    let digits = token.get(..4)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match token.as_bytes().get(4) {
        None | Some(b'-') => digits.parse().ok(),
        Some(_) => None,
    }
}
