//! Identifier group: every survey object carries a `_uuid`

use super::group_display_name;
use crate::error::ParamsError;
use crate::validators;
use serde_json::Value;
use uuid::Uuid;

/// Attribute name of the identifier
pub const UUID_ATTRIBUTE: &str = "_uuid";

/// Return `existing` when it is a non-empty string, a new v4 uuid otherwise
#[must_use]
pub fn get_uuid(existing: Option<&str>) -> String {
    match existing {
        Some(uuid) if !uuid.is_empty() => uuid.to_owned(),
        _ => Uuid::new_v4().to_string(),
    }
}

/// Validate the `_uuid` attribute of a dirty parameter bag
///
/// Errors are reported as `Uuidable`, or `<display_name> Uuidable` when a
/// display name is given.
#[must_use]
pub fn validate_params(dirty: &Value, display_name: Option<&str>) -> Vec<ParamsError> {
    validators::is_uuid(
        UUID_ATTRIBUTE,
        dirty.get(UUID_ATTRIBUTE),
        &group_display_name(display_name, "Uuidable"),
    )
}
