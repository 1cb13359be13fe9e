//! Typed decoding of an (already interpolated) action config.
//!
//! Each handler declares a private `#[derive(Deserialize)]` wire shape with
//! every string field optional, decodes it with [`decode`], then promotes
//! required fields with [`required`]. Absent, `null` and `""` all count as
//! missing.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use fieldops_domain::automation::ActionType;

use super::{ActionError, ConfigIssue};

pub(super) fn invalid(action_type: ActionType, issue: ConfigIssue) -> ActionError {
    ActionError::InvalidConfig { action_type, issue }
}

/// Decode `config` into the wire shape `T` of an `action_type` config.
pub(super) fn decode<T: DeserializeOwned>(
    action_type: ActionType,
    config: &Value,
) -> Result<T, ActionError> {
    if !config.is_object() {
        return Err(invalid(action_type, ConfigIssue::NotAnObject));
    }
    T::deserialize(config)
        .map_err(|err| invalid(action_type, ConfigIssue::Malformed(err.to_string())))
}

/// `deserialize_with` helper reading `null` and `""` as `None`.
pub(super) fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
}

pub(super) fn required(
    action_type: ActionType,
    field: &'static str,
    value: Option<String>,
) -> Result<String, ActionError> {
    value.ok_or_else(|| invalid(action_type, ConfigIssue::MissingField(field)))
}
