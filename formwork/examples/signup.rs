//! Signup Form Example
//!
//! A minimal host driving the engine the way a view layer would:
//! - configure fields with built-in and custom rules
//! - seed defaults, apply user edits, fire blur triggers
//! - wire the bound submit trigger to a "button"
//!
//! The host renders by polling `take_changed()` and reading the field
//! snapshot after each operation.

use std::fs::File;

use formwork::{FieldConfig, Form, Rule, rules};
use log::LevelFilter;
use simplelog::{Config, WriteLogger};

fn render(form: &Form<String>) {
    if !form.take_changed() {
        return;
    }
    for (key, state) in form.fields() {
        let marker = if state.valid { "ok " } else { "ERR" };
        let error = state
            .fail_props
            .get("error")
            .and_then(|v| v.as_str())
            .unwrap_or("");
        println!(
            "  [{marker}] {key:10} = {:?} (touched={}, dirty={}) {error}",
            state.value.as_deref().unwrap_or(""),
            state.touched,
            state.dirty,
        );
    }
}

fn main() {
    // Initialize file logging
    if let Ok(log_file) = File::create("signup.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), log_file);
    }

    let form = Form::new([
        (
            "username",
            FieldConfig::new(vec![
                rules::required("Username is required"),
                rules::min_length(3, "Username must be at least 3 characters"),
            ]),
        ),
        (
            "email",
            FieldConfig::new(vec![
                rules::required("Email is required"),
                rules::email("Please enter a valid email"),
            ]),
        ),
        (
            "bio",
            FieldConfig::new(vec![
                Rule::new(|v: &String| v.len() < 200)
                    .advisory()
                    .fail_prop("error", "Bios over 200 characters get truncated"),
            ]),
        ),
    ]);

    form.set_default_values([("bio", "Hello!".to_string())]);

    let submit = form.submit_trigger(|status, fields| {
        if status.valid {
            println!("submitted: {} fields", fields.len());
        } else {
            let failed = fields.values().filter(|f| !f.valid).count();
            println!("blocked: {failed} field(s) invalid");
        }
    });

    println!("initial state:");
    render(&form);

    // User tabs through the username field without typing anything.
    let blur_username = form.on_blur("username");
    blur_username();
    println!("\nafter blurring username:");
    render(&form);

    // First submit attempt fails.
    println!("\nfirst submit:");
    submit();
    render(&form);

    // User fills the form in.
    form.update_fields([
        ("username", "ann".to_string()),
        ("email", "ann@example.com".to_string()),
    ]);
    println!("\nafter edits:");
    render(&form);

    println!("\nsecond submit:");
    submit();
    render(&form);
}
