//! Form validation applied before a request leaves the client
//!
//! The backend validates everything again; these checks only spare a round
//! trip for input that is obviously wrong.

use crate::error::{CoreError, CoreResult};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

static PASSWORD_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z\d@$!%*?&]{8,}$").expect("password pattern is valid")
});

const PASSWORD_SPECIALS: &str = "@$!%*?&";

/// Validate email format
pub fn validate_email(email: &str) -> CoreResult<()> {
    if !EMAIL.is_match(email) {
        return Err(CoreError::validation(
            "email",
            "please enter a valid email address",
        ));
    }
    Ok(())
}

/// At least 8 characters with an uppercase and a lowercase letter, a digit
/// and one of `@$!%*?&`, nothing else
pub fn validate_password_strength(password: &str) -> CoreResult<()> {
    let strong = PASSWORD_CHARSET.is_match(password)
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c));

    if !strong {
        return Err(CoreError::validation(
            "password",
            "password must include uppercase, lowercase, number & special char",
        ));
    }
    Ok(())
}

/// Validate that a string is not empty
pub fn validate_not_empty(value: &str, field: &str) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(field, "cannot be empty"));
    }
    Ok(())
}

/// Check-out must come after check-in
pub fn validate_stay(check_in: NaiveDate, check_out: NaiveDate) -> CoreResult<()> {
    if check_out <= check_in {
        return Err(CoreError::validation(
            "check-out",
            "must be after the check-in date",
        ));
    }
    Ok(())
}

/// Inventory edits may cover a single day
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> CoreResult<()> {
    if end < start {
        return Err(CoreError::validation(
            "end-date",
            "must not be before the start date",
        ));
    }
    Ok(())
}

/// Validate that a count is at least one
pub fn validate_positive(value: u32, field: &str) -> CoreResult<()> {
    if value == 0 {
        return Err(CoreError::validation(field, "must be at least 1"));
    }
    Ok(())
}
