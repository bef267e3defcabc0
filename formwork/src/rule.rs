//! Validation rules attached to form fields.

use std::fmt;

use serde_json::Value;

/// Opaque failure data attached to a field when a rule fails.
///
/// Overwritten whole by whichever failing rule is evaluated last; never
/// merged across rules.
pub type FailProps = serde_json::Map<String, Value>;

type Test<V> = Box<dyn Fn(&V) -> bool + Send + Sync>;

/// A single validation predicate for a field value.
///
/// Rules are critical by default: a failing critical rule makes the field
/// (and the form) invalid. An [advisory](Rule::advisory) rule records its
/// failure data without blocking validity, for warning-style checks.
///
/// The predicate must be pure (no side effects on external state) and is
/// re-evaluated on every relevant value change, so it should be fast.
///
/// # Example
///
/// ```
/// use formwork::Rule;
///
/// let non_empty = Rule::new(|v: &String| !v.is_empty())
///     .fail_prop("error", "Field is required");
///
/// let shouty = Rule::new(|v: &String| v != &v.to_uppercase())
///     .advisory()
///     .fail_prop("warning", "All caps?");
/// ```
pub struct Rule<V> {
    pub(crate) critical: bool,
    pub(crate) fail_props: FailProps,
    test: Test<V>,
}

impl<V> Rule<V> {
    /// Create a critical rule from a pure predicate.
    ///
    /// The predicate returns `true` to pass and `false` to fail.
    pub fn new<F>(test: F) -> Self
    where
        F: Fn(&V) -> bool + Send + Sync + 'static,
    {
        Self {
            critical: true,
            fail_props: FailProps::new(),
            test: Box::new(test),
        }
    }

    /// Downgrade this rule to advisory: its failure is recorded in the
    /// field's fail props but does not make the field invalid.
    pub fn advisory(mut self) -> Self {
        self.critical = false;
        self
    }

    /// Attach one failure property, added to the field state when this rule
    /// fails (e.g. an error message).
    pub fn fail_prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fail_props.insert(key.into(), value.into());
        self
    }

    /// Replace the failure properties wholesale.
    pub fn with_fail_props(mut self, props: FailProps) -> Self {
        self.fail_props = props;
        self
    }

    /// Whether a failure of this rule invalidates the field.
    pub fn is_critical(&self) -> bool {
        self.critical
    }

    /// Evaluate the predicate against a value.
    pub(crate) fn check(&self, value: &V) -> bool {
        (self.test)(value)
    }
}

impl<V> fmt::Debug for Rule<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("critical", &self.critical)
            .field("fail_props", &self.fail_props)
            .finish_non_exhaustive()
    }
}
