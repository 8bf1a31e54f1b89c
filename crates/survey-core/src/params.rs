//! Raw parameter bags and typed attribute conversion
//!
//! Survey payloads are loosely typed, so attribute bags stay as JSON maps
//! and typed access goes through [`AttributeValue`]. A getter returns
//! `None` both when the key is absent and when it holds a value of another
//! type; constructors accept whatever they are given.

use serde_json::{Map, Value};

/// A key-value parameter or attribute bag
pub type Params = Map<String, Value>;

/// Conversion between a typed attribute and its JSON representation
pub trait AttributeValue: Sized {
    /// Read the typed value, `None` when the JSON value has another shape
    fn from_value(value: &Value) -> Option<Self>;

    /// Convert into a JSON value for storage
    fn into_value(self) -> Value;
}

impl AttributeValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }

    fn into_value(self) -> Value {
        Value::String(self)
    }
}

impl AttributeValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }

    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl AttributeValue for u64 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn from_value(value: &Value) -> Option<Self> {
        value.as_u64().or_else(|| {
            // 2.0 is a whole number even when encoded as a float
            value
                .as_f64()
                .filter(|number| number.fract() == 0.0 && *number >= 0.0 && *number <= 9_007_199_254_740_991.0)
                .map(|number| number as u64)
        })
    }

    fn into_value(self) -> Value {
        Value::from(self)
    }
}

impl AttributeValue for i64 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_i64()
    }

    fn into_value(self) -> Value {
        Value::from(self)
    }
}

impl AttributeValue for f64 {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_f64()
    }

    fn into_value(self) -> Value {
        Value::from(self)
    }
}

impl AttributeValue for Vec<String> {
    fn from_value(value: &Value) -> Option<Self> {
        value
            .as_array()?
            .iter()
            .map(|item| item.as_str().map(str::to_owned))
            .collect()
    }

    fn into_value(self) -> Value {
        Value::Array(self.into_iter().map(Value::String).collect())
    }
}

impl AttributeValue for Value {
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }

    fn into_value(self) -> Value {
        self
    }
}

impl AttributeValue for Params {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_object().cloned()
    }

    fn into_value(self) -> Value {
        Value::Object(self)
    }
}

/// Read a typed attribute from a bag
#[inline]
#[must_use]
pub fn get_attribute<T: AttributeValue>(params: &Params, key: &str) -> Option<T> {
    params.get(key).and_then(T::from_value)
}

/// Write a typed attribute into a bag, `None` removes the key
pub fn set_attribute<T: AttributeValue>(params: &mut Params, key: &str, value: Option<T>) {
    match value {
        Some(value) => {
            params.insert(key.to_owned(), value.into_value());
        }
        None => {
            params.remove(key);
        }
    }
}

/// Read a uuid-like string, treating empty strings as absent
#[must_use]
pub fn non_empty_str<'a>(params: &'a Params, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn typed_getters_ignore_wrong_shapes() {
        let params = json!({ "size": 2, "category": "single", "flag": "yes" });
        let params = params.as_object().cloned().unwrap_or_default();
        assert_eq!(get_attribute::<u64>(&params, "size"), Some(2));
        assert_eq!(get_attribute::<String>(&params, "category").as_deref(), Some("single"));
        assert_eq!(get_attribute::<bool>(&params, "flag"), None);
        assert_eq!(get_attribute::<u64>(&params, "missing"), None);
    }

    #[test]
    fn whole_floats_read_as_integers() {
        assert_eq!(u64::from_value(&json!(3.0)), Some(3));
        assert_eq!(u64::from_value(&json!(3.5)), None);
        assert_eq!(u64::from_value(&json!(-1)), None);
    }

    #[test]
    fn string_arrays_require_all_strings() {
        assert_eq!(
            Vec::<String>::from_value(&json!(["a", "b"])),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(Vec::<String>::from_value(&json!(["a", 1])), None);
    }

    #[test]
    fn set_none_removes_key() {
        let mut params = Params::new();
        set_attribute(&mut params, "name", Some("home".to_string()));
        assert_eq!(non_empty_str(&params, "name"), Some("home"));
        set_attribute::<String>(&mut params, "name", None);
        assert!(params.is_empty());
    }
}
