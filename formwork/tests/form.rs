use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use formwork::{FailProps, FieldConfig, Form, FormStatus, Rule, rules};
use serde_json::json;

fn props(value: serde_json::Value) -> FailProps {
    value.as_object().cloned().unwrap_or_default()
}

fn required_field() -> Rule<String> {
    Rule::new(|v: &String| !v.is_empty()).fail_prop("error", "Field is required")
}

// ============================================================================
// Submit
// ============================================================================

#[test]
fn empty_form_submits_untouched_and_valid() {
    let form: Form<String> = Form::new(Vec::<(String, FieldConfig<String>)>::new());
    let mut called = false;
    form.submit(|status, fields| {
        assert!(status.valid);
        assert!(!status.touched);
        assert!(fields.is_empty());
        called = true;
    });
    assert!(called);
}

#[test]
fn submit_runs_validation() {
    let form = Form::new([(
        "name",
        FieldConfig::new(vec![Rule::new(|_: &String| false)]),
    )]);
    form.submit(|status, fields| {
        assert!(!status.valid);
        assert!(status.touched);
        assert!(!fields["name"].valid);
    });
}

#[test]
fn submit_touches_every_field() {
    let form = Form::new([
        ("name", FieldConfig::<String>::default()),
        ("email", FieldConfig::default()),
    ]);
    form.submit(|_, fields| {
        assert!(fields.values().all(|f| f.touched));
    });
    assert_eq!(
        form.status(),
        FormStatus {
            valid: true,
            touched: true
        }
    );
}

#[test]
fn advisory_failures_do_not_block_submit() {
    let form = Form::new([(
        "name",
        FieldConfig::new(vec![
            Rule::new(|_: &String| false)
                .advisory()
                .fail_prop("warning", "Consider a longer name"),
        ]),
    )]);
    form.submit(|status, fields| {
        assert!(status.valid);
        assert!(fields["name"].valid);
        assert_eq!(
            fields["name"].fail_props,
            props(json!({"warning": "Consider a longer name"}))
        );
    });
}

#[test]
fn submit_callback_runs_once_per_trigger_invocation() {
    let form = Form::new([("name", FieldConfig::new(vec![required_field()]))]);
    let calls = Arc::new(AtomicUsize::new(0));
    let trigger = {
        let calls = Arc::clone(&calls);
        form.submit_trigger(move |_, _| {
            calls.fetch_add(1, Ordering::SeqCst);
        })
    };
    trigger();
    trigger();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

// ============================================================================
// Defaults
// ============================================================================

#[test]
fn defaults_set_values_without_dirty_or_touched() {
    let form = Form::new([("name", FieldConfig::new(vec![required_field()]))]);
    form.set_default_values([("name", "default name".to_string())]);

    let state = form.field("name").unwrap();
    assert_eq!(state.value.as_deref(), Some("default name"));
    assert!(!state.dirty);
    assert!(!state.touched);

    form.submit(|status, fields| {
        assert!(status.touched);
        assert!(!fields["name"].dirty);
        assert_eq!(fields["name"].value.as_deref(), Some("default name"));
    });
}

#[test]
fn defaults_do_not_run_validation() {
    let form = Form::new([(
        "name",
        FieldConfig::new(vec![Rule::new(|_: &String| false).fail_prop("error", "no")]),
    )]);
    form.set_default_values([("name", "anything".to_string())]);

    let state = form.field("name").unwrap();
    assert!(state.valid);
    assert!(state.fail_props.is_empty());
}

#[test]
fn repeated_defaults_overwrite() {
    let form = Form::new([("name", FieldConfig::<String>::default())]);
    form.set_default_values([("name", "first".to_string())]);
    form.set_default_values([("name", "second".to_string())]);
    assert_eq!(form.field("name").unwrap().value.as_deref(), Some("second"));
}

// ============================================================================
// Updates
// ============================================================================

#[test]
fn update_marks_dirty_and_revalidates() {
    let form = Form::new([(
        "name",
        FieldConfig::new(vec![
            Rule::new(|_: &String| false).fail_prop("error", "something went wrong"),
        ]),
    )]);
    let fields = form.update_fields([("name", "updated value".to_string())]);

    assert_eq!(fields["name"].value.as_deref(), Some("updated value"));
    assert!(fields["name"].dirty);
    assert!(!fields["name"].valid);
    assert_eq!(
        fields["name"].fail_props,
        props(json!({"error": "something went wrong"}))
    );

    form.submit(|status, _| assert!(!status.valid));
}

#[test]
fn update_validates_only_the_updated_fields() {
    let form = Form::new([
        ("name", FieldConfig::new(vec![required_field()])),
        ("email", FieldConfig::new(vec![required_field()])),
    ]);
    // Put both fields into a failed state first.
    form.submit(|_, _| {});

    form.update_fields([("name", "Ann".to_string())]);

    let fields = form.fields();
    assert!(fields["name"].valid);
    assert!(fields["name"].fail_props.is_empty());
    // Sibling keeps its stale failure data; it was not re-validated.
    assert!(!fields["email"].valid);
    assert_eq!(
        fields["email"].fail_props,
        props(json!({"error": "Field is required"}))
    );
}

#[test]
fn update_ignores_unknown_keys() {
    let form = Form::new([("name", FieldConfig::<String>::default())]);
    let fields = form.update_fields([
        ("name", "Ann".to_string()),
        ("unknown", "ignored".to_string()),
    ]);
    assert_eq!(fields.len(), 1);
    assert_eq!(fields["name"].value.as_deref(), Some("Ann"));
}

#[test]
fn dirty_is_unconditional_even_for_equal_values() {
    let form = Form::new([("name", FieldConfig::<String>::default())]);
    form.set_default_values([("name", "same".to_string())]);
    let fields = form.update_fields([("name", "same".to_string())]);
    assert!(fields["name"].dirty);
}

// ============================================================================
// Blur / touch
// ============================================================================

#[test]
fn blur_touches_only_that_field() {
    let form = Form::new([
        ("name", FieldConfig::new(vec![required_field()])),
        ("email", FieldConfig::new(vec![required_field()])),
    ]);
    let blur_name = form.on_blur("name");
    blur_name();

    let fields = form.fields();
    assert!(fields["name"].touched);
    assert!(!fields["name"].valid);
    assert!(!fields["email"].touched);
    // The untouched sibling was never validated, so it shows no errors.
    assert!(fields["email"].fail_props.is_empty());
    assert!(fields["email"].valid);
}

#[test]
fn touch_field_is_idempotent() {
    let form = Form::new([("name", FieldConfig::new(vec![required_field()]))]);
    form.touch_field("name");
    let first = form.field("name").unwrap();
    form.touch_field("name");
    let second = form.field("name").unwrap();

    assert!(first.touched && second.touched);
    assert_eq!(first.valid, second.valid);
    assert_eq!(first.fail_props, second.fail_props);
    assert_eq!(first.value, second.value);
}

// ============================================================================
// Rule evaluation policy
// ============================================================================

#[test]
fn required_field_scenario() {
    let form = Form::new([("name", FieldConfig::new(vec![required_field()]))]);
    form.submit(|status, fields| {
        assert!(!status.valid);
        assert!(!fields["name"].valid);
        assert_eq!(
            fields["name"].fail_props,
            props(json!({"error": "Field is required"}))
        );
    });

    form.update_fields([("name", "Ann".to_string())]);
    form.submit(|status, fields| {
        assert!(status.valid);
        assert!(fields["name"].valid);
        assert!(fields["name"].fail_props.is_empty());
        assert!(fields["name"].dirty);
    });
}

#[test]
fn last_failing_rule_wins() {
    let form = Form::new([(
        "name",
        FieldConfig::new(vec![
            Rule::new(|_: &String| false).fail_prop("error", "first"),
            Rule::new(|_: &String| false)
                .advisory()
                .fail_prop("error", "last"),
        ]),
    )]);
    form.touch_field("name");

    let state = form.field("name").unwrap();
    // The critical failure still invalidates the field, but the advisory
    // rule failed later in the list, so its props are the ones surfaced.
    assert!(!state.valid);
    assert_eq!(state.fail_props, props(json!({"error": "last"})));
}

#[test]
fn passing_rule_after_failure_does_not_clear_props() {
    let form = Form::new([(
        "name",
        FieldConfig::new(vec![
            Rule::new(|_: &String| false).fail_prop("error", "kept"),
            Rule::new(|_: &String| true).fail_prop("error", "never seen"),
        ]),
    )]);
    form.touch_field("name");

    let state = form.field("name").unwrap();
    assert!(!state.valid);
    assert_eq!(state.fail_props, props(json!({"error": "kept"})));
}

#[test]
fn panicking_rule_fails_safe_as_critical() {
    let form = Form::new([(
        "name",
        FieldConfig::new(vec![
            Rule::new(|_: &String| panic!("rule exploded"))
                .advisory()
                .fail_prop("error", "boom"),
        ]),
    )]);
    // The panic must not reach us, and even an advisory rule fails closed.
    form.submit(|status, fields| {
        assert!(!status.valid);
        assert!(!fields["name"].valid);
        assert_eq!(fields["name"].fail_props, props(json!({"error": "boom"})));
    });
}

// ============================================================================
// Built-in rules in a form
// ============================================================================

#[test]
fn built_in_rules_compose() {
    let form = Form::new([
        (
            "name",
            FieldConfig::new(vec![rules::required("Name is required")]),
        ),
        (
            "email",
            FieldConfig::new(vec![
                rules::required("Email is required"),
                rules::email("Please enter a valid email"),
            ]),
        ),
    ]);

    form.update_fields([("email", "not-an-email".to_string())]);
    let fields = form.fields();
    assert!(!fields["email"].valid);
    assert_eq!(
        fields["email"].fail_props,
        props(json!({"error": "Please enter a valid email"}))
    );

    form.update_fields([
        ("name", "Ann".to_string()),
        ("email", "ann@example.com".to_string()),
    ]);
    form.submit(|status, _| assert!(status.valid));
}
