//! The form store: field values, rule evaluation, touched/dirty tracking.

use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use log::{debug, trace, warn};

use crate::error::extract_panic_message;
use crate::field::{FieldConfig, FieldState};
use crate::rule::FailProps;
use crate::status::FormStatus;

/// Unique identifier for a form instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormId(usize);

impl FormId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for FormId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__form_{}", self.0)
    }
}

/// One configured field: its rule list plus derived state.
#[derive(Debug)]
struct FieldEntry<V> {
    config: FieldConfig<V>,
    state: FieldState<V>,
}

impl<V: Default> FieldEntry<V> {
    /// Evaluate the rule list in declaration order against the current value.
    ///
    /// Never short-circuits: every rule runs, any failing critical rule
    /// invalidates the field, and the last failing rule's fail props win
    /// (overwriting earlier failures). A rule that panics is caught and
    /// counted as a critical failure, whatever its own flag says.
    fn revalidate(&mut self, key: &str) {
        let fallback = V::default();
        let value = self.state.value.as_ref().unwrap_or(&fallback);

        let mut critical_failed = false;
        let mut fail_props = FailProps::new();
        for rule in &self.config.tests {
            let passed = match panic::catch_unwind(AssertUnwindSafe(|| rule.check(value))) {
                Ok(passed) => passed,
                Err(payload) => {
                    warn!(
                        "rule for field '{key}' panicked: {}",
                        extract_panic_message(payload.as_ref())
                    );
                    critical_failed = true;
                    false
                }
            };
            if !passed {
                if rule.is_critical() {
                    critical_failed = true;
                }
                fail_props = rule.fail_props.clone();
            }
        }

        self.state.valid = !critical_failed;
        self.state.fail_props = fail_props;
        trace!("field '{key}' validated: valid={}", self.state.valid);
    }
}

#[derive(Debug)]
struct FormInner<V> {
    fields: BTreeMap<String, FieldEntry<V>>,
}

fn snapshot<V: Clone>(inner: &FormInner<V>) -> BTreeMap<String, FieldState<V>> {
    inner
        .fields
        .iter()
        .map(|(key, entry)| (key.clone(), entry.state.clone()))
        .collect()
}

/// Form state store.
///
/// Holds, per configured field, its current value, rule results, and
/// touched/dirty flags. The set of field keys is fixed at construction;
/// operations addressing unknown keys are silently ignored so hosts may pass
/// a superset of keys.
///
/// `Form` is a handle over shared state: clones refer to the same form, so
/// bound triggers ([`Form::on_blur`], [`Form::submit_trigger`]) can capture
/// their own copy. All operations run synchronously to completion; the store
/// assumes a single caller thread (typical event-loop usage) and merely
/// serializes access internally.
#[derive(Debug)]
pub struct Form<V> {
    id: FormId,
    inner: Arc<RwLock<FormInner<V>>>,
    changed: Arc<AtomicBool>,
}

impl<V> Clone for Form<V> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
            changed: Arc::clone(&self.changed),
        }
    }
}

impl<V: Clone + Default> Form<V> {
    /// Create a form from per-field configurations.
    ///
    /// Every field starts with no value, untouched, clean, and vacuously
    /// valid; no rule is evaluated at construction.
    pub fn new<I, K>(configs: I) -> Self
    where
        I: IntoIterator<Item = (K, FieldConfig<V>)>,
        K: Into<String>,
    {
        let fields = configs
            .into_iter()
            .map(|(key, config)| {
                (
                    key.into(),
                    FieldEntry {
                        config,
                        state: FieldState::default(),
                    },
                )
            })
            .collect();
        Self {
            id: FormId::new(),
            inner: Arc::new(RwLock::new(FormInner { fields })),
            changed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get the unique ID for this form instance.
    pub fn id(&self) -> FormId {
        self.id
    }

    // -------------------------------------------------------------------------
    // Value operations
    // -------------------------------------------------------------------------

    /// Set initial values without marking fields dirty or touched.
    ///
    /// No validation runs; defaults are validated on first interaction or
    /// submit. Unknown keys are ignored. Calling this again overwrites
    /// previously set defaults for the given keys.
    pub fn set_default_values<I, K>(&self, values: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
    {
        if let Ok(mut guard) = self.inner.write() {
            for (key, value) in values {
                let key = key.into();
                match guard.fields.get_mut(&key) {
                    Some(entry) => entry.state.value = Some(value),
                    None => debug!("{}: default for unknown field '{key}' ignored", self.id),
                }
            }
            self.changed.store(true, Ordering::SeqCst);
        }
    }

    /// Update field values, marking each updated field dirty and re-running
    /// validation for exactly the fields updated in this call.
    ///
    /// Dirty is set unconditionally, even when the new value equals the old
    /// one. Unknown keys are ignored. Returns the updated field snapshot.
    pub fn update_fields<I, K>(&self, values: I) -> BTreeMap<String, FieldState<V>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
    {
        if let Ok(mut guard) = self.inner.write() {
            let mut updated = Vec::new();
            for (key, value) in values {
                let key = key.into();
                match guard.fields.get_mut(&key) {
                    Some(entry) => {
                        entry.state.value = Some(value);
                        entry.state.dirty = true;
                        updated.push(key);
                    }
                    None => debug!("{}: update for unknown field '{key}' ignored", self.id),
                }
            }
            for key in &updated {
                if let Some(entry) = guard.fields.get_mut(key) {
                    entry.revalidate(key);
                }
            }
            self.changed.store(true, Ordering::SeqCst);
        }
        self.fields()
    }

    /// Mark a field touched and validate it, leaving every other field alone.
    ///
    /// This is the operation behind the per-field blur trigger. Unknown keys
    /// are ignored.
    pub fn touch_field(&self, key: &str) {
        if let Ok(mut guard) = self.inner.write() {
            match guard.fields.get_mut(key) {
                Some(entry) => {
                    entry.state.touched = true;
                    entry.revalidate(key);
                    self.changed.store(true, Ordering::SeqCst);
                }
                None => debug!("{}: touch for unknown field '{key}' ignored", self.id),
            }
        }
    }

    // -------------------------------------------------------------------------
    // Submit
    // -------------------------------------------------------------------------

    /// Run the submit flow now: mark every field touched, validate every
    /// field, then hand the resulting status and field snapshot to
    /// `on_submit`.
    ///
    /// The callback runs synchronously, exactly once, whether or not the form
    /// is valid; deciding what to do with an invalid status is the host's
    /// job. With zero configured fields the status is vacuously valid and
    /// untouched.
    pub fn submit<F>(&self, on_submit: F)
    where
        F: FnOnce(FormStatus, BTreeMap<String, FieldState<V>>),
    {
        let Ok(mut guard) = self.inner.write() else {
            return;
        };
        for (key, entry) in guard.fields.iter_mut() {
            entry.state.touched = true;
            entry.revalidate(key);
        }
        let status = FormStatus {
            valid: guard.fields.values().all(|entry| entry.state.valid),
            touched: guard.fields.values().any(|entry| entry.state.touched),
        };
        let fields = snapshot(&guard);
        drop(guard);

        self.changed.store(true, Ordering::SeqCst);
        debug!(
            "{}: submit: valid={} touched={}",
            self.id, status.valid, status.touched
        );
        on_submit(status, fields);
    }

    /// Build a reusable zero-argument submit trigger bound to `on_submit`,
    /// suitable for wiring to a button press.
    pub fn submit_trigger<F>(&self, on_submit: F) -> impl Fn() + Send + Sync + 'static
    where
        F: Fn(FormStatus, BTreeMap<String, FieldState<V>>) + Send + Sync + 'static,
        V: Send + Sync + 'static,
    {
        let form = self.clone();
        move || form.submit(&on_submit)
    }

    /// Bound blur trigger for one field, equivalent to calling
    /// [`Form::touch_field`] with that key.
    pub fn on_blur(&self, key: impl Into<String>) -> impl Fn() + Send + Sync + 'static
    where
        V: Send + Sync + 'static,
    {
        let form = self.clone();
        let key = key.into();
        move || form.touch_field(&key)
    }

    // -------------------------------------------------------------------------
    // Read methods
    // -------------------------------------------------------------------------

    /// Aggregate status over the current field states. Touches and validates
    /// nothing.
    pub fn status(&self) -> FormStatus {
        self.inner
            .read()
            .map(|guard| FormStatus {
                valid: guard.fields.values().all(|entry| entry.state.valid),
                touched: guard.fields.values().any(|entry| entry.state.touched),
            })
            .unwrap_or_default()
    }

    /// Snapshot of every field's state, for the host to render.
    pub fn fields(&self) -> BTreeMap<String, FieldState<V>> {
        self.inner
            .read()
            .map(|guard| snapshot(&guard))
            .unwrap_or_default()
    }

    /// Snapshot of a single field's state, if the key is configured.
    pub fn field(&self, key: &str) -> Option<FieldState<V>> {
        self.inner
            .read()
            .ok()
            .and_then(|guard| guard.fields.get(key).map(|entry| entry.state.clone()))
    }

    // -------------------------------------------------------------------------
    // Change tracking
    // -------------------------------------------------------------------------

    /// Check if any operation mutated the form since the last clear.
    pub fn is_changed(&self) -> bool {
        self.changed.load(Ordering::SeqCst)
    }

    /// Clear the changed flag.
    pub fn clear_changed(&self) {
        self.changed.store(false, Ordering::SeqCst)
    }

    /// Check and clear the changed flag in one step (poll-friendly).
    pub fn take_changed(&self) -> bool {
        self.changed.swap(false, Ordering::SeqCst)
    }
}
