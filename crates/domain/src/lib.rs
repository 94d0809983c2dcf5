//! # Domain Crate
//!
//! Shared data model for the movie mood bot.
//!
//! ## Main Components
//!
//! - **types**: Profile, movie, card and activity types
//! - **recognizer**: The shape of NLU output and helpers to read entities from it
//!
//! ## Example Usage
//!
//! ```ignore
//! use domain::{Mood, RecognizerResult, UserProfile};
//!
//! let mut profile = UserProfile::with_name("Ada");
//! profile.mood = Some(Mood::Negative);
//!
//! let recognized = RecognizerResult::new("something scary from 2005");
//! let year = recognized.year();
//! ```

// Public modules
pub mod recognizer;
pub mod types;

// Re-export commonly used types for convenience
pub use recognizer::{
    DATETIME_ENTITY, GENRE_ENTITY, MOOD_INTENT, MOOD_NEGATIVE, MOOD_POSITIVE, MOVIE_CHOOSE_INTENT,
    NONE_INTENT, RecognizerResult, parse_timex_year,
};
pub use types::{
    // Type aliases
    ConversationId,
    MovieId,
    // Core types
    Activity,
    CardAction,
    CardDescription,
    MovieRecord,
    UserProfile,
    // Enums
    Mood,
};
