//! `{Name}` placeholder interpolation.
//!
//! A placeholder is `{` followed by one or more ASCII word characters
//! (`[A-Za-z0-9_]`) and a closing `}`. Placeholders whose name is present in
//! the [`TriggerData`] are replaced by the value; all others are left in the
//! output untouched, so a misconfigured template is visibly wrong instead of
//! silently empty.
//!
//! Substitution is a single left-to-right pass: replaced values are never
//! scanned again.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;

use crate::trigger_data::TriggerData;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("placeholder pattern compiles"));

/// Substitute every known `{Name}` placeholder in `template`.
#[must_use]
pub fn interpolate(template: &str, data: &TriggerData) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| match data.get(&caps[1]) {
            Some(value) => value.into_owned(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Interpolate every string leaf of a JSON value, recursing into arrays and
/// objects. Object keys, numbers, booleans and `null` are copied unchanged.
#[must_use]
pub fn interpolate_value(value: &Value, data: &TriggerData) -> Value {
    match value {
        Value::String(s) => Value::String(interpolate(s, data)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| interpolate_value(item, data))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), interpolate_value(v, data)))
                .collect(),
        ),
        other => other.clone(),
    }
}
