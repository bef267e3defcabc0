//! Built-in rules for string-valued forms.
//!
//! Each constructor produces a ready-made critical [`Rule`] carrying an
//! `{"error": msg}` fail prop. Chain [`Rule::advisory`] to turn any of them
//! into a warning-style check.

use crate::error::RuleError;
use crate::rule::Rule;

/// Require the value to be non-empty after trimming whitespace.
pub fn required(msg: impl Into<String>) -> Rule<String> {
    Rule::new(|v: &String| !v.trim().is_empty()).fail_prop("error", msg.into())
}

/// Require minimum length (in characters).
pub fn min_length(min: usize, msg: impl Into<String>) -> Rule<String> {
    Rule::new(move |v: &String| v.chars().count() >= min).fail_prop("error", msg.into())
}

/// Require maximum length (in characters).
pub fn max_length(max: usize, msg: impl Into<String>) -> Rule<String> {
    Rule::new(move |v: &String| v.chars().count() <= max).fail_prop("error", msg.into())
}

/// Require the value to match a regex pattern.
pub fn pattern(pattern: &str, msg: impl Into<String>) -> Result<Rule<String>, RuleError> {
    let re = regex::Regex::new(pattern)?;
    Ok(Rule::new(move |v: &String| re.is_match(v)).fail_prop("error", msg.into()))
}

/// Require a valid email address.
///
/// An empty value passes; combine with [`required`] to also reject empties.
pub fn email(msg: impl Into<String>) -> Rule<String> {
    Rule::new(|v: &String| v.is_empty() || email_address::EmailAddress::is_valid(v))
        .fail_prop("error", msg.into())
}

/// Require the value to equal another value.
pub fn equals(other: impl Into<String>, msg: impl Into<String>) -> Rule<String> {
    let other = other.into();
    Rule::new(move |v: &String| *v == other).fail_prop("error", msg.into())
}

/// Require the value to contain a substring.
pub fn contains(substr: impl Into<String>, msg: impl Into<String>) -> Rule<String> {
    let substr = substr.into();
    Rule::new(move |v: &String| v.contains(&substr)).fail_prop("error", msg.into())
}
