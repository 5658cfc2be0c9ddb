//! Helpers shared by the command-line front end: option arguments, form
//! assembly and preview output.

use std::fmt::Write as _;

use chrono::NaiveDateTime;
use serde_json::{Value, json};

use crate::error::FormError;
use crate::form::{Action, FormState, update};
use crate::options::{Field, FormatConfig};
use crate::preview::LocalePreview;

/// Parse a `field=value` argument. An empty value clears the field.
///
/// # Errors
/// Returns a message when the `=` is missing or the field is unknown.
pub fn parse_option_arg(arg: &str) -> Result<(Field, String), String> {
    let Some((name, value)) = arg.split_once('=') else {
        return Err(format!("expected FIELD=VALUE, got '{arg}'"));
    };
    let name = name.trim();
    let field = Field::from_name(name)
        .ok_or_else(|| FormError::UnknownOption(name.to_owned()).to_string())?;
    Ok((field, value.trim().to_owned()))
}

/// Turn `field=value` arguments into form actions, in order.
///
/// # Errors
/// See [`parse_option_arg`].
pub fn option_actions(args: &[String]) -> Result<Vec<Action>, String> {
    args.iter()
        .map(|arg| parse_option_arg(arg).map(|(field, value)| Action::SetOption(field, value)))
        .collect()
}

/// Apply actions one after another.
///
/// # Errors
/// Returns the first action's error as a message.
pub fn apply_actions(
    state: FormState,
    actions: impl IntoIterator<Item = Action>,
) -> Result<FormState, String> {
    actions
        .into_iter()
        .try_fold(state, |state, action| update(&state, action).map_err(|e| e.to_string()))
}

/// Options built from `field=value` arguments on top of `base`.
///
/// # Errors
/// Returns a message for malformed arguments or invalid `hour12` text.
pub fn config_from_args(base: FormatConfig, args: &[String]) -> Result<FormatConfig, String> {
    let mut config = base;
    for arg in args {
        let (field, value) = parse_option_arg(arg)?;
        config.set(field, &value).map_err(|e| e.to_string())?;
    }
    Ok(config.filtered())
}

/// The form state the CLI starts from: `now`, or the instants given.
///
/// # Errors
/// Returns a message when a date or time argument is malformed.
pub fn initial_state(
    now: NaiveDateTime,
    date: Option<&str>,
    time: Option<&str>,
    end_date: Option<&str>,
    end_time: Option<&str>,
) -> Result<FormState, String> {
    let mut actions = Vec::new();
    if let Some(date) = date {
        actions.push(Action::SetDate(date.to_owned()));
    }
    if let Some(time) = time {
        actions.push(Action::SetTime(time.to_owned()));
    }
    if let Some(end_date) = end_date {
        actions.push(Action::SetEndDate(end_date.to_owned()));
    }
    if let Some(end_time) = end_time {
        actions.push(Action::SetEndTime(end_time.to_owned()));
    }
    let state = apply_actions(FormState::new(now), actions)?;
    state.start().map_err(|e| e.to_string())?;
    state.end().map_err(|e| e.to_string())?;
    Ok(state)
}

/// One block per locale; failures are indented under an `error:` line.
#[must_use]
pub fn format_previews(previews: &[LocalePreview]) -> String {
    let mut out = String::new();
    for preview in previews {
        match &preview.result {
            Ok(text) => {
                let _ = writeln!(out, "{}: {text}", preview.locale);
            }
            Err(e) => {
                let _ = writeln!(out, "{}: error", preview.locale);
                for line in e.message.lines() {
                    let _ = writeln!(out, "  {line}");
                }
            }
        }
    }
    out
}

#[must_use]
pub fn previews_json(previews: &[LocalePreview]) -> Value {
    Value::Array(
        previews
            .iter()
            .map(|preview| match &preview.result {
                Ok(text) => json!({ "locale": preview.locale, "output": text }),
                Err(e) => json!({ "locale": preview.locale, "error": e.message }),
            })
            .collect(),
    )
}

/// Option catalogue as shown by `dtf-tester options`.
#[must_use]
pub fn options_catalogue() -> String {
    let mut out = String::new();
    for field in Field::ALL {
        let values = field.allowed_values();
        if values.is_empty() {
            let _ = writeln!(out, "{field}: <time zone>");
        } else {
            let _ = writeln!(out, "{field}: {}", values.join(", "));
        }
    }
    out
}
