//! Error types and panic capture for rule evaluation.

use std::any::Any;

use thiserror::Error;

/// Errors from fallible rule constructors.
#[derive(Debug, Error)]
pub enum RuleError {
    /// A pattern rule was given a regex that does not compile.
    #[error("invalid rule pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Extract a human-readable message from a panic payload.
///
/// Panics can contain either `&str` or `String` payloads. This function
/// attempts to extract either, falling back to a generic message.
pub(crate) fn extract_panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
