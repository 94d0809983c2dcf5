//! Bot crate for the movie mood bot.
//!
//! This crate contains the conversation itself: the greeting and
//! recommendation dialogs, the recognizer seam and the `MovieBot` turn driver
//! that ties them to the session store.

pub mod bot;
pub mod config;
pub mod greeting;
pub mod recognizer;
pub mod recommend;

pub use bot::MovieBot;
pub use config::BotConfig;
pub use greeting::{GreetingDialog, GreetingDialogBuilder, USER_PROFILE_DIALOG, capitalize_first, classify_mood};
pub use recognizer::{KeywordRecognizer, Recognizer};
pub use recommend::{RECOMMEND_DIALOG, Recommender};
