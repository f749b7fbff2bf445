//! Common validation utilities for credential input

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum accepted username length
pub const MAX_USERNAME_LENGTH: usize = 254;

/// Maximum accepted password length, in characters
pub const MAX_PASSWORD_LENGTH: usize = 128;

// Usernames are either e-mail addresses (self-registered persons) or plain
// ASCII handles made of letters, digits, dots, dashes and underscores.
// Addresses may contain any non-space characters, including non-ASCII ones.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@.][^\s@]*\.[^\s@.]{2,}$").unwrap()
});

static HANDLE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._\-]{2,63}$").unwrap()
});

/// Check if a string is not empty
pub fn not_empty(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Check if a string length is within bounds (in characters)
pub fn length_between(value: &str, min: usize, max: usize) -> bool {
    let len = value.chars().count();
    len >= min && len <= max
}

/// Check if an email address is valid
pub fn is_valid_email(email: &str) -> bool {
    email.len() <= MAX_USERNAME_LENGTH && EMAIL_REGEX.is_match(email)
}

/// Check if a username is acceptable: an email address or a plain handle
pub fn is_valid_username(username: &str) -> bool {
    if username.len() > MAX_USERNAME_LENGTH || username != username.trim() {
        return false;
    }
    is_valid_email(username) || HANDLE_REGEX.is_match(username)
}
