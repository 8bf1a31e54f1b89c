//! Behavior shared by every survey object kind

use crate::registry::SurveyObjectsRegistry;
use parking_lot::{MappedRwLockReadGuard, MappedRwLockWriteGuard};
use serde_json::Value;
use survey_core::groups::uuidable::{self, UUID_ATTRIBUTE};
use survey_core::groups::weight::WEIGHTS_ATTRIBUTE;
use survey_core::params::{get_attribute, non_empty_str, set_attribute};
use survey_core::constructor::composed_value;
use survey_core::{initialize_attributes, validators, InitializedAttributes};
use survey_core::{Params, ParamsError, ParamsValidator, SurveyResult, Weight};

/// Attribute name of the validity flag
pub const IS_VALID_ATTRIBUTE: &str = "_isValid";

/// Known attributes and custom attributes of one object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectAttributes {
    pub(crate) attributes: Params,
    pub(crate) custom_attributes: Params,
}

impl ObjectAttributes {
    /// Partition `params` and make sure a `_uuid` attribute is set
    ///
    /// `excluded` lists keys handled elsewhere (composed children, parent
    /// references); they land in neither bag.
    pub(crate) fn from_params(params: &Params, known: &[&str], excluded: &[&str], kind: &str) -> Self {
        let mut known_with_composed = known.to_vec();
        known_with_composed.extend_from_slice(excluded);
        let InitializedAttributes {
            mut attributes,
            custom_attributes,
        } = initialize_attributes(params, known, &known_with_composed);

        let existing = non_empty_str(&attributes, UUID_ATTRIBUTE);
        if let Some(uuid) = existing.filter(|uuid| !validators::is_valid_uuid(uuid)) {
            tracing::warn!(kind, uuid, "constructing object with a malformed uuid");
        }
        let uuid = uuidable::get_uuid(existing);
        attributes.insert(UUID_ATTRIBUTE.to_owned(), Value::String(uuid));
        Self {
            attributes,
            custom_attributes,
        }
    }
}

/// Access to the attribute bags of a handle
pub trait AttributeBags {
    /// Read guard over the bags
    fn bags(&self) -> MappedRwLockReadGuard<'_, ObjectAttributes>;

    /// Write guard over the bags
    fn bags_mut(&self) -> MappedRwLockWriteGuard<'_, ObjectAttributes>;

    /// Whether both handles point to the same object
    fn ptr_eq(&self, other: &Self) -> bool
    where
        Self: Sized;
}

/// A survey object kind
///
/// Implementors provide validation and construction; identity, attribute
/// bags, validity and weights come for free.
pub trait SurveyObject: AttributeBags + Clone + Sized {
    /// Display name used in validation errors
    const DISPLAY_NAME: &'static str;

    /// Attributes stripped by [`SurveyObject::export_attributes`]
    const CONFIDENTIAL_ATTRIBUTES: &'static [&'static str] = &[];

    /// Validate untrusted params, returning every field error in order
    fn validate_params(dirty: &Value, display_name: &str) -> Vec<ParamsError>;

    /// Build from sanitized params, accepting flat or serialized shape
    fn unserialize(params: &Params, registry: &SurveyObjectsRegistry) -> Self;

    /// Validate untrusted params and build only when there is no error
    fn create(dirty: &Value, registry: &SurveyObjectsRegistry) -> SurveyResult<Self> {
        let errors = Self::validate_params(dirty, Self::DISPLAY_NAME);
        if !errors.is_empty() {
            tracing::debug!(kind = Self::DISPLAY_NAME, errors = errors.len(), "rejected params");
            return SurveyResult::Errors(errors);
        }
        match dirty.as_object() {
            Some(params) => SurveyResult::Ok(Self::unserialize(params, registry)),
            None => SurveyResult::Errors(
                ParamsValidator::new(dirty, Self::DISPLAY_NAME)
                    .required_object()
                    .finish(),
            ),
        }
    }

    /// Object uuid
    fn uuid(&self) -> String {
        non_empty_str(&self.bags().attributes, UUID_ATTRIBUTE)
            .unwrap_or_default()
            .to_owned()
    }

    /// Copy of the known attributes, including `_uuid`, `_isValid` and `_weights`
    fn attributes(&self) -> Params {
        self.bags().attributes.clone()
    }

    /// Copy of the custom attributes
    fn custom_attributes(&self) -> Params {
        self.bags().custom_attributes.clone()
    }

    /// A single known attribute
    fn attribute(&self, key: &str) -> Option<Value> {
        self.bags().attributes.get(key).cloned()
    }

    /// A single custom attribute
    fn custom_attribute(&self, key: &str) -> Option<Value> {
        self.bags().custom_attributes.get(key).cloned()
    }

    /// Set or clear a custom attribute
    fn set_custom_attribute(&self, key: &str, value: Option<Value>) {
        set_attribute(&mut self.bags_mut().custom_attributes, key, value);
    }

    /// `None` until [`SurveyObject::validate`] has run
    fn is_valid(&self) -> Option<bool> {
        get_attribute(&self.bags().attributes, IS_VALID_ATTRIBUTE)
    }

    /// Mark the object as validated
    ///
    /// Field checks happen in `create`; this only records that validation ran
    /// and always reports the object as valid.
    fn validate(&self) -> bool {
        set_attribute(&mut self.bags_mut().attributes, IS_VALID_ATTRIBUTE, Some(true));
        true
    }

    /// Survey weights, empty when absent or malformed
    fn weights(&self) -> Vec<Weight> {
        get_attribute(&self.bags().attributes, WEIGHTS_ATTRIBUTE).unwrap_or_default()
    }

    /// Set or clear the survey weights
    fn set_weights(&self, weights: Option<Vec<Weight>>) {
        set_attribute(&mut self.bags_mut().attributes, WEIGHTS_ATTRIBUTE, weights);
    }

    /// Names of the attributes only admins may see
    fn confidential_attributes(&self) -> &'static [&'static str] {
        Self::CONFIDENTIAL_ATTRIBUTES
    }

    /// Attributes for export, without confidential ones unless asked
    fn export_attributes(&self, include_confidential: bool) -> Params {
        let mut attributes = self.attributes();
        if !include_confidential {
            for key in self.confidential_attributes() {
                attributes.remove(*key);
            }
        }
        attributes
    }
}

/// Composed child in dirty input, under `_name` or `name`
pub(crate) fn composed_dirty<'a>(dirty: &'a Value, name: &str) -> Option<&'a Value> {
    dirty.as_object().and_then(|params| composed_value(params, name))
}

/// Parent uuid reference held in constructor params
pub(crate) fn reference_uuid(params: &Params, key: &str) -> Option<String> {
    non_empty_str(params, key).map(str::to_owned)
}

/// Validate each item of a composed array, labelling them `"<label> <index>"`
pub(crate) fn validate_children<T: SurveyObject>(value: Option<&Value>, label: &str) -> Vec<ParamsError> {
    composed_items(value)
        .enumerate()
        .flat_map(|(index, item)| T::validate_params(item, &format!("{label} {index}")))
        .collect()
}

/// Validate each item of a composed array under the same display name
pub(crate) fn validate_children_named<T: SurveyObject>(value: Option<&Value>, display_name: &str) -> Vec<ParamsError> {
    composed_items(value)
        .flat_map(|item| T::validate_params(item, display_name))
        .collect()
}

/// Validate an optional composed single child
pub(crate) fn validate_child<T: SurveyObject>(value: Option<&Value>, display_name: &str) -> Vec<ParamsError> {
    match value {
        Some(value) if !value.is_null() => T::validate_params(value, display_name),
        _ => Vec::new(),
    }
}

fn composed_items(value: Option<&Value>) -> Box<dyn Iterator<Item = &Value> + '_> {
    match value {
        Some(Value::Array(items)) => Box::new(items.iter().filter(|item| !item.is_null())),
        Some(Value::Object(by_uuid)) => Box::new(by_uuid.values()),
        _ => Box::new(std::iter::empty()),
    }
}

/// Insert `item` after (or before) the child whose uuid is `anchor`
///
/// An empty list just receives the item. Returns `false` when the anchor
/// is not found.
pub(crate) fn insert_relative<T: SurveyObject>(items: &mut Vec<T>, item: T, anchor: &str, after: bool) -> bool {
    if items.is_empty() {
        items.push(item);
        return true;
    }
    match items.iter().position(|existing| existing.uuid() == anchor) {
        Some(index) => {
            items.insert(if after { index + 1 } else { index }, item);
            true
        }
        None => false,
    }
}

/// Insert `item` at `index`, clamped to the list length
pub(crate) fn insert_at<T>(items: &mut Vec<T>, item: T, index: usize) {
    let index = index.min(items.len());
    items.insert(index, item);
}

/// Remove the child whose uuid is `uuid`
pub(crate) fn remove_by_uuid<T: SurveyObject>(items: &mut Vec<T>, uuid: &str) -> bool {
    match items.iter().position(|existing| existing.uuid() == uuid) {
        Some(index) => {
            items.remove(index);
            true
        }
        None => false,
    }
}

/// Find the child whose uuid is `uuid`
pub(crate) fn find_by_uuid<T: SurveyObject>(items: &[T], uuid: &str) -> Option<T> {
    items.iter().find(|item| item.uuid() == uuid).cloned()
}
