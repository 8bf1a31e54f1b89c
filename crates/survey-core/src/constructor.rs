//! Constructor utilities shared by every survey object
//!
//! Splits a raw parameter bag into known attributes and custom attributes,
//! and builds composed children through the child kind's `unserialize`.

use crate::groups::uuidable::UUID_ATTRIBUTE;
use crate::params::Params;
use serde_json::Value;
use std::borrow::Cow;

/// Key holding known attributes in the serialized object shape
pub const SERIALIZED_ATTRIBUTES: &str = "_attributes";
/// Key holding custom attributes in the serialized object shape
pub const SERIALIZED_CUSTOM_ATTRIBUTES: &str = "_customAttributes";

/// Result of partitioning a parameter bag
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InitializedAttributes {
    /// Keys listed as known attributes
    pub attributes: Params,
    /// Keys unknown to the object kind, copied verbatim
    pub custom_attributes: Params,
}

/// Partition `params` into known and custom attributes
///
/// Keys in `known` go to `attributes`. Keys only in `known_with_composed`
/// are composed children and are dropped here. Everything else goes to
/// `custom_attributes`. The input is not modified.
#[must_use]
pub fn initialize_attributes(
    params: &Params,
    known: &[&str],
    known_with_composed: &[&str],
) -> InitializedAttributes {
    let mut initialized = InitializedAttributes::default();
    for (key, value) in params {
        if known.contains(&key.as_str()) {
            initialized.attributes.insert(key.clone(), value.clone());
        } else if !known_with_composed.contains(&key.as_str()) {
            initialized.custom_attributes.insert(key.clone(), value.clone());
        }
    }
    initialized
}

/// Build an array of composed children
///
/// Absent input yields an empty vector. Null or non-object items are
/// skipped. A uuid-keyed map (the in-progress interview shape) is accepted
/// too: its values are ordered by `_sequence` and a missing `_uuid` is
/// taken from the key.
pub fn initialize_composed_array_attributes<T, R: ?Sized>(
    raw: Option<&Value>,
    mut unserialize: impl FnMut(&Params, &R) -> T,
    registry: &R,
) -> Vec<T> {
    let items: Vec<Cow<'_, Params>> = match raw {
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_object).map(Cow::Borrowed).collect(),
        Some(Value::Object(by_uuid)) => flatten_uuid_map(by_uuid),
        _ => Vec::new(),
    };
    items.iter().map(|item| unserialize(&**item, registry)).collect()
}

/// Build a single optional composed child
///
/// Absent, null or non-object input yields `None`.
pub fn initialize_composed_attribute<T, R: ?Sized>(
    raw: Option<&Value>,
    unserialize: impl FnOnce(&Params, &R) -> T,
    registry: &R,
) -> Option<T> {
    raw.and_then(Value::as_object).map(|params| unserialize(params, registry))
}

fn flatten_uuid_map(by_uuid: &Params) -> Vec<Cow<'_, Params>> {
    let mut items: Vec<(Option<u64>, Cow<'_, Params>)> = by_uuid
        .iter()
        .filter_map(|(uuid, value)| {
            let item = value.as_object()?;
            let sequence = item.get("_sequence").and_then(Value::as_u64);
            if item.contains_key(UUID_ATTRIBUTE) {
                Some((sequence, Cow::Borrowed(item)))
            } else {
                let mut owned = item.clone();
                owned.insert(UUID_ATTRIBUTE.to_owned(), Value::String(uuid.clone()));
                Some((sequence, Cow::Owned(owned)))
            }
        })
        .collect();
    // unsequenced items keep map order, after sequenced ones
    items.sort_by_key(|(sequence, _)| sequence.unwrap_or(u64::MAX));
    items.into_iter().map(|(_, item)| item).collect()
}

/// Flatten the serialized object shape into plain params
///
/// `{ "_attributes": {..}, "_customAttributes": {..}, ..rest }` becomes the
/// union of the three, attributes winning over custom attributes and rest.
/// Plain params are returned unchanged.
#[must_use]
pub fn flatten_serialized_data(params: &Params) -> Cow<'_, Params> {
    let Some(attributes) = params.get(SERIALIZED_ATTRIBUTES).and_then(Value::as_object) else {
        return Cow::Borrowed(params);
    };
    let mut flattened = Params::new();
    for (key, value) in params {
        if key != SERIALIZED_ATTRIBUTES && key != SERIALIZED_CUSTOM_ATTRIBUTES {
            flattened.insert(key.clone(), value.clone());
        }
    }
    if let Some(custom) = params.get(SERIALIZED_CUSTOM_ATTRIBUTES).and_then(Value::as_object) {
        for (key, value) in custom {
            flattened.insert(key.clone(), value.clone());
        }
    }
    for (key, value) in attributes {
        flattened.insert(key.clone(), value.clone());
    }
    Cow::Owned(flattened)
}

/// Read a composed child from `_name`, falling back to `name`
#[must_use]
pub fn composed_value<'a>(params: &'a Params, name: &str) -> Option<&'a Value> {
    params.get(&format!("_{name}")).or_else(|| params.get(name))
}
