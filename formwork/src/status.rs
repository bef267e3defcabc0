//! Aggregate form status.

use serde::Serialize;

/// Valid/touched summary over all fields, computed on submit or on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormStatus {
    /// True iff every field is valid (no critical rule failures anywhere).
    /// Vacuously true for a form with zero configured fields.
    pub valid: bool,
    /// True iff at least one field is touched. Submit touches every field,
    /// so this is true after any submit unless the form has zero fields.
    pub touched: bool,
}

impl Default for FormStatus {
    fn default() -> Self {
        Self {
            valid: true,
            touched: false,
        }
    }
}
