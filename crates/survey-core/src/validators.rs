//! Attribute validators
//!
//! Every validator takes `(field, value, display_name)` and returns an
//! empty vector when the value passes, or exactly one [`ParamsError`].
//! An absent value (`None`) always passes: required-ness is only checked
//! for whole parameter bags, through [`is_required`].
//!
//! JSON `null` counts as absent for every type check, matching how
//! survey payloads clear answers.

use crate::error::{ParamsError, ParamsErrorKind};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static DATE_STRING: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").ok());

static UUID_STRING: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:[0-9a-f]{8}-[0-9a-f]{4}-[1-8][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}|00000000-0000-0000-0000-000000000000)$",
    )
    .ok()
});

fn matches(pattern: &Lazy<Option<Regex>>, text: &str) -> bool {
    pattern.as_ref().is_some_and(|regex| regex.is_match(text))
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|value| !value.is_null())
}

fn check(passes: bool, field: &str, display_name: &str, kind: ParamsErrorKind) -> Vec<ParamsError> {
    if passes {
        Vec::new()
    } else {
        vec![ParamsError::new(display_name, field, kind)]
    }
}

/// Whether `text` is a `YYYY-MM-DD` calendar date
#[must_use]
pub fn is_valid_date_string(text: &str) -> bool {
    matches(&DATE_STRING, text) && NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
}

/// Whether `text` is an RFC 4122 uuid string
#[must_use]
pub fn is_valid_uuid(text: &str) -> bool {
    matches(&UUID_STRING, text)
}

/// Whether `value` is a non-negative whole number
#[must_use]
pub fn is_whole_non_negative(value: &Value) -> bool {
    if value.as_u64().is_some() {
        return true;
    }
    value
        .as_f64()
        .is_some_and(|number| number >= 0.0 && number.fract() == 0.0 && number.is_finite())
}

/// Fails when the whole parameter bag is missing or null
#[must_use]
pub fn is_required(field: &str, value: Option<&Value>, display_name: &str) -> Vec<ParamsError> {
    check(present(value).is_some(), field, display_name, ParamsErrorKind::Required)
}

/// Fails when the value is not a key-value object
#[must_use]
pub fn is_object(field: &str, value: Option<&Value>, display_name: &str) -> Vec<ParamsError> {
    match present(value) {
        None => Vec::new(),
        Some(value) => check(value.is_object(), field, display_name, ParamsErrorKind::NotObject),
    }
}

/// Fails when the value is not a boolean
#[must_use]
pub fn is_boolean(field: &str, value: Option<&Value>, display_name: &str) -> Vec<ParamsError> {
    match present(value) {
        None => Vec::new(),
        Some(value) => check(value.is_boolean(), field, display_name, ParamsErrorKind::NotBoolean),
    }
}

/// Fails when the value is not a string
#[must_use]
pub fn is_string(field: &str, value: Option<&Value>, display_name: &str) -> Vec<ParamsError> {
    match present(value) {
        None => Vec::new(),
        Some(value) => check(value.is_string(), field, display_name, ParamsErrorKind::NotString),
    }
}

/// Fails when the value is not a string or is an empty string
#[must_use]
pub fn is_non_empty_string(field: &str, value: Option<&Value>, display_name: &str) -> Vec<ParamsError> {
    match present(value) {
        None => Vec::new(),
        Some(value) => check(
            value.as_str().is_some_and(|text| !text.trim().is_empty()),
            field,
            display_name,
            ParamsErrorKind::NotNonEmptyString,
        ),
    }
}

/// Fails unless the value is a non-negative whole number (zero allowed)
///
/// Numeric strings are rejected.
#[must_use]
pub fn is_positive_integer(field: &str, value: Option<&Value>, display_name: &str) -> Vec<ParamsError> {
    match present(value) {
        None => Vec::new(),
        Some(value) => check(
            is_whole_non_negative(value),
            field,
            display_name,
            ParamsErrorKind::NotPositiveInteger,
        ),
    }
}

/// Fails unless the value is a non-negative number (zero allowed)
#[must_use]
pub fn is_positive_number(field: &str, value: Option<&Value>, display_name: &str) -> Vec<ParamsError> {
    match present(value) {
        None => Vec::new(),
        Some(value) => check(
            value.as_f64().is_some_and(|number| number >= 0.0 && number.is_finite()),
            field,
            display_name,
            ParamsErrorKind::NotPositiveNumber,
        ),
    }
}

/// Fails when the value is not an array
#[must_use]
pub fn is_array(field: &str, value: Option<&Value>, display_name: &str) -> Vec<ParamsError> {
    match present(value) {
        None => Vec::new(),
        Some(value) => check(value.is_array(), field, display_name, ParamsErrorKind::NotArray),
    }
}

/// Fails when the value is not an array made only of strings
#[must_use]
pub fn is_array_of_strings(field: &str, value: Option<&Value>, display_name: &str) -> Vec<ParamsError> {
    match present(value) {
        None => Vec::new(),
        Some(value) => check(
            value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            field,
            display_name,
            ParamsErrorKind::NotArrayOfStrings,
        ),
    }
}

/// Fails when the value is not a `YYYY-MM-DD` date string
#[must_use]
pub fn is_date_string(field: &str, value: Option<&Value>, display_name: &str) -> Vec<ParamsError> {
    match present(value) {
        None => Vec::new(),
        Some(value) => check(
            value.as_str().is_some_and(is_valid_date_string),
            field,
            display_name,
            ParamsErrorKind::NotDateString,
        ),
    }
}

/// Fails when the value is not a uuid string
#[must_use]
pub fn is_uuid(field: &str, value: Option<&Value>, display_name: &str) -> Vec<ParamsError> {
    match present(value) {
        None => Vec::new(),
        Some(value) => check(
            value.as_str().is_some_and(is_valid_uuid),
            field,
            display_name,
            ParamsErrorKind::NotUuid,
        ),
    }
}

/// Fails when the value is not a GeoJSON `Feature` with a `Point` geometry
#[must_use]
pub fn is_geojson_point(field: &str, value: Option<&Value>, display_name: &str) -> Vec<ParamsError> {
    match present(value) {
        None => Vec::new(),
        Some(value) => check(
            is_point_feature(value),
            field,
            display_name,
            ParamsErrorKind::NotGeojsonPoint,
        ),
    }
}

/// Fails when the value is not one of `allowed`
#[must_use]
pub fn is_in(
    field: &str,
    value: Option<&Value>,
    display_name: &str,
    allowed: &[&str],
    type_name: &str,
) -> Vec<ParamsError> {
    match present(value) {
        None => Vec::new(),
        Some(value) => check(
            value.as_str().is_some_and(|text| allowed.contains(&text)),
            field,
            display_name,
            ParamsErrorKind::NotIn {
                type_name: type_name.to_owned(),
            },
        ),
    }
}

/// Whether `value` is a GeoJSON point feature with numeric `[lon, lat]`
///
/// A feature must carry a `properties` member, either an object or null.
#[must_use]
pub fn is_point_feature(value: &Value) -> bool {
    let is_feature = value.get("type").and_then(Value::as_str) == Some("Feature")
        && value
            .get("properties")
            .is_some_and(|properties| properties.is_object() || properties.is_null());
    let geometry = value.get("geometry");
    let is_point = geometry
        .and_then(|geometry| geometry.get("type"))
        .and_then(Value::as_str)
        == Some("Point");
    let has_coordinates = geometry
        .and_then(|geometry| geometry.get("coordinates"))
        .and_then(Value::as_array)
        .is_some_and(|coordinates| coordinates.len() >= 2 && coordinates.iter().all(Value::is_number));
    is_feature && is_point && has_coordinates
}

/// Accumulates validation errors for one parameter bag
///
/// Checks run in call order, so the resulting list preserves the order in
/// which fields were declared.
#[derive(Debug)]
#[must_use]
pub struct ParamsValidator<'a> {
    dirty: &'a Value,
    display_name: &'a str,
    errors: Vec<ParamsError>,
}

type FieldCheck = fn(&str, Option<&Value>, &str) -> Vec<ParamsError>;

impl<'a> ParamsValidator<'a> {
    /// Start validating `dirty`, reporting errors under `display_name`
    pub fn new(dirty: &'a Value, display_name: &'a str) -> Self {
        Self {
            dirty,
            display_name,
            errors: Vec::new(),
        }
    }

    /// The bag being validated
    #[must_use]
    pub fn dirty(&self) -> &'a Value {
        self.dirty
    }

    /// Display name used for errors
    #[must_use]
    pub fn display_name(&self) -> &'a str {
        self.display_name
    }

    fn each(mut self, fields: &[&str], check: FieldCheck) -> Self {
        for field in fields {
            self.errors
                .extend(check(field, self.dirty.get(*field), self.display_name));
        }
        self
    }

    /// The bag must be present and be an object
    pub fn required_object(mut self) -> Self {
        self.errors
            .extend(is_required("params", Some(self.dirty), self.display_name));
        self.errors
            .extend(is_object("params", Some(self.dirty), self.display_name));
        self
    }

    /// Each field must be a boolean when present
    pub fn booleans(self, fields: &[&str]) -> Self {
        self.each(fields, is_boolean)
    }

    /// Each field must be a string when present
    pub fn strings(self, fields: &[&str]) -> Self {
        self.each(fields, is_string)
    }

    /// Each field must be a non-empty string when present
    pub fn non_empty_strings(self, fields: &[&str]) -> Self {
        self.each(fields, is_non_empty_string)
    }

    /// Each field must be a non-negative whole number when present
    pub fn positive_integers(self, fields: &[&str]) -> Self {
        self.each(fields, is_positive_integer)
    }

    /// Each field must be a non-negative number when present
    pub fn positive_numbers(self, fields: &[&str]) -> Self {
        self.each(fields, is_positive_number)
    }

    /// Each field must be an object when present
    pub fn objects(self, fields: &[&str]) -> Self {
        self.each(fields, is_object)
    }

    /// Each field must be an array of strings when present
    pub fn arrays_of_strings(self, fields: &[&str]) -> Self {
        self.each(fields, is_array_of_strings)
    }

    /// Each field must be a `YYYY-MM-DD` date when present
    pub fn date_strings(self, fields: &[&str]) -> Self {
        self.each(fields, is_date_string)
    }

    /// Each field must be a uuid when present
    pub fn uuids(self, fields: &[&str]) -> Self {
        self.each(fields, is_uuid)
    }

    /// Each field must be a GeoJSON point feature when present
    pub fn geojson_points(self, fields: &[&str]) -> Self {
        self.each(fields, is_geojson_point)
    }

    /// The field must be one of `allowed` when present
    pub fn one_of(mut self, field: &str, allowed: &[&str], type_name: &str) -> Self {
        self.errors.extend(is_in(
            field,
            self.dirty.get(field),
            self.display_name,
            allowed,
            type_name,
        ));
        self
    }

    /// Append errors from a group or nested validator
    pub fn extend(mut self, errors: impl IntoIterator<Item = ParamsError>) -> Self {
        self.errors.extend(errors);
        self
    }

    /// Accumulated errors, in check order
    #[must_use]
    pub fn finish(self) -> Vec<ParamsError> {
        self.errors
    }
}
