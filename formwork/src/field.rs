//! Field configuration and derived per-field state.

use serde::Serialize;

use crate::rule::{FailProps, Rule};

/// Configuration for a single field, immutable for the form's lifetime.
#[derive(Debug)]
pub struct FieldConfig<V> {
    pub(crate) tests: Vec<Rule<V>>,
}

impl<V> FieldConfig<V> {
    /// A field validated by the given rules, evaluated in order.
    pub fn new(tests: Vec<Rule<V>>) -> Self {
        Self { tests }
    }
}

impl<V> Default for FieldConfig<V> {
    /// A field with no rules; always valid.
    fn default() -> Self {
        Self { tests: Vec::new() }
    }
}

impl<V> FromIterator<Rule<V>> for FieldConfig<V> {
    fn from_iter<I: IntoIterator<Item = Rule<V>>>(iter: I) -> Self {
        Self {
            tests: iter.into_iter().collect(),
        }
    }
}

/// Derived state for one configured field, recomputed on every mutation.
#[derive(Debug, Clone, Serialize)]
pub struct FieldState<V> {
    /// Current value; `None` until a default or update sets it.
    pub value: Option<V>,
    /// True once the field received a blur signal or the form was submitted.
    /// Monotonic: never resets within the form's lifetime.
    pub touched: bool,
    /// True once the value was changed via an update operation. Monotonic;
    /// default-value initialization does not set it.
    pub dirty: bool,
    /// True iff no critical rule failed in the most recent evaluation.
    /// Vacuously true before any rule has been evaluated.
    pub valid: bool,
    /// Failure data from the last failing rule of the most recent evaluation
    /// pass, or empty if every rule passed.
    pub fail_props: FailProps,
}

impl<V> Default for FieldState<V> {
    fn default() -> Self {
        Self {
            value: None,
            touched: false,
            dirty: false,
            valid: true,
            fail_props: FailProps::new(),
        }
    }
}
