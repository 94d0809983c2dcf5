//! Prompt validators.
//!
//! A validator looks at the raw text of the user's reply and either accepts
//! it (producing the value handed back to the waiting step) or rejects it
//! with a corrective message. Rejection never advances the dialog: the engine
//! sends the message, repeats the prompt and waits for another turn.

use serde_json::{Value, json};
use std::sync::Arc;

/// Minimum accepted name length (after trimming)
pub const NAME_LENGTH_MIN: usize = 3;

/// Years must be strictly after this one
pub const YEAR_MIN_EXCLUSIVE: i64 = 1900;

/// Outcome of validating one reply
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    Accepted(Value),
    Rejected { message: String },
}

impl Validation {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Validation::Accepted(_))
    }
}

/// Shared validator callback
pub type Validator = Arc<dyn Fn(&str) -> Validation + Send + Sync>;

/// Accept names whose trimmed length is at least `min_len` characters.
///
/// The accepted value is the trimmed name.
pub fn validate_name(input: &str, min_len: usize) -> Validation {
    let name = input.trim();
    if name.chars().count() >= min_len {
        Validation::Accepted(Value::String(name.to_string()))
    } else {
        Validation::Rejected {
            message: format!("Names need to be at least {} characters long.", min_len),
        }
    }
}

/// Accept integer years strictly greater than `min_exclusive`.
///
/// The first number in the reply is the year, so "from 2005" and "2005." both
/// count. A reply with no number at all ("no", "whatever") means the user does
/// not care about the year: it is accepted as `null` rather than rejected. So is
/// a decimal such as "20.5", which cannot name a year.
pub fn validate_year(input: &str, min_exclusive: i64) -> Validation {
    let Some(token) = first_number(input) else {
        return Validation::Accepted(Value::Null);
    };
    if token.contains('.') {
        return Validation::Accepted(Value::Null);
    }
    match token.parse::<i64>() {
        Ok(year) if year > min_exclusive => Validation::Accepted(json!(year)),
        _ => Validation::Rejected {
            message: format!("Year must be after {}.", min_exclusive),
        },
    }
}

/// First numeric token of `input`: an optional leading `-`, digits, and an
/// optional fraction. A trailing `.` without digits is punctuation.
fn first_number(input: &str) -> Option<&str> {
    let bytes = input.as_bytes();
    let first_digit = bytes.iter().position(u8::is_ascii_digit)?;
    let start = if first_digit > 0 && bytes[first_digit - 1] == b'-' {
        first_digit - 1
    } else {
        first_digit
    };

    let digits_end = |from: usize| {
        bytes[from..]
            .iter()
            .position(|b| !b.is_ascii_digit())
            .map_or(bytes.len(), |n| from + n)
    };
    let mut end = digits_end(first_digit);
    if end + 1 < bytes.len() && bytes[end] == b'.' && bytes[end + 1].is_ascii_digit() {
        end = digits_end(end + 1);
    }
    Some(&input[start..end])
}

/// Validator for name prompts
pub fn name_validator(min_len: usize) -> Validator {
    Arc::new(move |input| validate_name(input, min_len))
}

/// Validator for year prompts
pub fn year_validator(min_exclusive: i64) -> Validator {
    Arc::new(move |input| validate_year(input, min_exclusive))
}
