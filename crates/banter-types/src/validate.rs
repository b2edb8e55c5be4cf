//! Pure input validators for the fields the client collects.
//!
//! Each predicate is stateless and I/O free; `validation_message` maps a
//! failed field to its fixed user-facing message (empty string on pass).

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

pub fn email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// At least 8 characters, one lowercase, one uppercase, one digit,
/// alphanumeric only. Spelled out as character scans because the regex
/// crate has no lookahead.
pub fn password(value: &str) -> bool {
    value.len() >= 8
        && value.chars().all(|c| c.is_ascii_alphanumeric())
        && value.chars().any(|c| c.is_ascii_lowercase())
        && value.chars().any(|c| c.is_ascii_uppercase())
        && value.chars().any(|c| c.is_ascii_digit())
}

pub fn name(value: &str) -> bool {
    (2..=50).contains(&value.chars().count())
}

pub fn message(value: &str) -> bool {
    !value.trim().is_empty() && value.chars().count() <= 5000
}

pub fn conversation_title(value: &str) -> bool {
    !value.trim().is_empty() && value.chars().count() <= 100
}

/// Fixed user-facing message for a named field, empty string when the
/// value passes. Unknown fields validate trivially.
pub fn validation_message(field: &str, value: &str) -> &'static str {
    match field {
        "email" if !email(value) => "Please enter a valid email address",
        "password" if !password(value) => {
            "Password must be at least 8 characters long and contain at least \
             one uppercase letter, one lowercase letter, and one number"
        }
        "name" if !name(value) => "Name must be between 2 and 50 characters",
        "message" if !message(value) => {
            "Message must not be empty and must be less than 5000 characters"
        }
        "conversation_title" if !conversation_title(value) => {
            "Title must not be empty and must be less than 100 characters"
        }
        _ => "",
    }
}
