//! Core domain types shared by every crate in the bot.
//!
//! This module defines the fundamental data structures used throughout the system:
//! - The per-conversation `UserProfile` and its `Mood`
//! - `MovieRecord` snapshots returned by the movie catalog
//! - Renderer-agnostic `CardDescription`s built from those records
//! - Outbound `Activity` messages produced by a turn

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Type Aliases
// =============================================================================

/// Identifier of a movie in the external catalog (TMDB ids are positive integers)
pub type MovieId = u64;

/// Identifier of a conversation, as handed to us by the hosting channel
pub type ConversationId = String;

// =============================================================================
// User Profile
// =============================================================================

/// Mood inferred from what the user said when asked how they are.
///
/// Once set on a profile it is always one of exactly these two values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    Positive,
    Negative,
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mood::Positive => write!(f, "positive"),
            Mood::Negative => write!(f, "negative"),
        }
    }
}

/// Profile state kept for the lifetime of a conversation.
///
/// Created lazily on the first turn, mutated only by dialog steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
}

impl UserProfile {
    /// Create an empty profile (no name, no mood)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a profile with a known name
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            mood: None,
        }
    }
}

// =============================================================================
// Movie Records
// =============================================================================

/// A movie as returned by the catalog's discover and details endpoints.
///
/// Only the fields the cards need are kept. Everything other than `id` and
/// `title` is optional upstream, so missing values fall back to defaults
/// instead of failing the whole response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl MovieRecord {
    /// Convenience constructor used by tests and the CLI
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            vote_average: 0.0,
            release_date: String::new(),
            overview: String::new(),
            poster_path: None,
        }
    }
}

// =============================================================================
// Cards and Activities
// =============================================================================

/// A link button shown underneath a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardAction {
    pub title: String,
    pub url: String,
}

/// Structured, renderer-agnostic description of one movie card.
///
/// Derived deterministically from a `MovieRecord`; has no lifecycle of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDescription {
    /// Small heading above the title ("Movie")
    pub kicker: String,
    pub title: String,
    /// Subtle lines under the title (rating, release date)
    pub subtitles: Vec<String>,
    /// Synopsis, already truncated by the renderer
    pub overview: String,
    pub image_url: Option<String>,
    pub actions: Vec<CardAction>,
}

/// One outbound message produced while handling a turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "camelCase")]
pub enum Activity {
    /// Plain text message
    Text(String),
    /// Horizontally browsable collection of cards sent as one message
    Carousel(Vec<CardDescription>),
}

impl Activity {
    pub fn text(text: impl Into<String>) -> Self {
        Activity::Text(text.into())
    }

    /// Returns the text of a `Text` activity, `None` for carousels
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Activity::Text(text) => Some(text),
            Activity::Carousel(_) => None,
        }
    }

    /// Returns the cards of a `Carousel` activity, `None` for text
    pub fn as_carousel(&self) -> Option<&[CardDescription]> {
        match self {
            Activity::Carousel(cards) => Some(cards),
            Activity::Text(_) => None,
        }
    }
}
