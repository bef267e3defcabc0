//! Form state and validation engine.
//!
//! This crate tracks field values, runs per-field validation rules, and
//! aggregates pass/fail status for an arbitrary presentational host. The host
//! owns rendering and event wiring; it calls the engine's operations in
//! response to user interaction and re-reads the field-state snapshot after
//! each call.
//!
//! A [`Form`] is a cheaply-cloneable handle over shared state, so bound
//! triggers ([`Form::on_blur`], [`Form::submit_trigger`]) can be handed
//! straight to whatever the host uses for event callbacks.
//!
//! # Example
//!
//! ```
//! use formwork::{FieldConfig, Form, rules};
//!
//! let form = Form::new([
//!     ("name", FieldConfig::new(vec![rules::required("Name is required")])),
//!     ("email", FieldConfig::new(vec![
//!         rules::required("Email is required"),
//!         rules::email("Please enter a valid email"),
//!     ])),
//! ]);
//!
//! form.update_fields([("name", "Ann".to_string())]);
//!
//! let submit = form.submit_trigger(|status, _fields| {
//!     if !status.valid {
//!         // re-render with fields[..].fail_props
//!     }
//! });
//! submit();
//! ```

mod error;
mod field;
mod form;
mod rule;
pub mod rules;
mod status;

pub use error::RuleError;
pub use field::{FieldConfig, FieldState};
pub use form::{Form, FormId};
pub use rule::{FailProps, Rule};
pub use status::FormStatus;
