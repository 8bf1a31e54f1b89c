//! Weights group: `_weights` is an array of `{ weight, method }` pairs

use crate::error::{ParamsError, ParamsErrorKind};
use crate::params::AttributeValue;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Attribute name of the weights array
pub const WEIGHTS_ATTRIBUTE: &str = "_weights";

const DISPLAY_NAME: &str = "Weightable";

/// How a weight was computed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightMethod {
    /// Short identifier of the method
    pub shortname: String,
    /// Human-readable name
    pub name: String,
    /// Optional longer description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A survey weight and the method that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weight {
    /// Weight value, non-negative
    pub weight: f64,
    /// Weighting method
    pub method: WeightMethod,
}

impl AttributeValue for Vec<Weight> {
    fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    fn into_value(self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

fn is_weight_method(value: Option<&Value>) -> bool {
    let Some(method) = value.and_then(Value::as_object) else {
        return false;
    };
    let has_string = |key: &str| method.get(key).is_some_and(Value::is_string);
    let description_ok = method
        .get("description")
        .map_or(true, |description| description.is_null() || description.is_string());
    has_string("shortname") && has_string("name") && description_ok
}

/// Validate the `_weights` attribute, absent weights are valid
#[must_use]
pub fn validate_weights(weights: Option<&Value>) -> Vec<ParamsError> {
    let Some(weights) = weights.filter(|value| !value.is_null()) else {
        return Vec::new();
    };
    let Some(items) = weights.as_array() else {
        return vec![ParamsError::new(
            DISPLAY_NAME,
            WEIGHTS_ATTRIBUTE,
            ParamsErrorKind::NotArray,
        )];
    };
    let mut errors = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let weight_ok = item
            .get("weight")
            .and_then(Value::as_f64)
            .is_some_and(|weight| weight >= 0.0);
        if !weight_ok {
            errors.push(ParamsError::new(
                DISPLAY_NAME,
                WEIGHTS_ATTRIBUTE,
                ParamsErrorKind::WeightNotPositive { index },
            ));
        }
        if !is_weight_method(item.get("method")) {
            errors.push(ParamsError::new(
                DISPLAY_NAME,
                WEIGHTS_ATTRIBUTE,
                ParamsErrorKind::WeightMethodInvalid { index },
            ));
        }
    }
    errors
}
