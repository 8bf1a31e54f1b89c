//! Error types for survey objects
//!
//! Two families of errors live here:
//! - [`ParamsError`]: one field-level validation failure, accumulated in
//!   flat ordered lists by `validate_params` functions
//! - [`SurveyError`]: programmer misuse and ambient failures (config,
//!   logging) that are reported through `Result`

use std::fmt;

/// What went wrong with a single validated field
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamsErrorKind {
    /// The parameter bag is missing or null
    Required,
    /// The value is not a key-value object
    NotObject,
    /// The value is not a boolean
    NotBoolean,
    /// The value is not a string
    NotString,
    /// The value is not a string, or is empty
    NotNonEmptyString,
    /// The value is not a non-negative whole number
    NotPositiveInteger,
    /// The value is not a non-negative number
    NotPositiveNumber,
    /// The value is not an array
    NotArray,
    /// The value is not an array whose items are all strings
    NotArrayOfStrings,
    /// The value is not a `YYYY-MM-DD` calendar date
    NotDateString,
    /// The value is not a valid uuid string
    NotUuid,
    /// The value is not a GeoJSON feature with a point geometry
    NotGeojsonPoint,
    /// The value is not one of the allowed values of the named type
    NotIn {
        /// Name of the value type, e.g. `YesNoDontKnow`
        type_name: String,
    },
    /// A uuid reference points to the object itself
    SelfReference,
    /// Weight at the given index is missing or negative
    WeightNotPositive {
        /// Index in the weights array
        index: usize,
    },
    /// Weight method at the given index is malformed
    WeightMethodInvalid {
        /// Index in the weights array
        index: usize,
    },
}

impl ParamsErrorKind {
    /// Name of the validating routine, shown after the display name
    #[must_use]
    pub fn routine(&self) -> &'static str {
        match self {
            Self::WeightNotPositive { .. } | Self::WeightMethodInvalid { .. } => "validateWeights",
            _ => "validateParams",
        }
    }

    fn describe(&self, field: &str) -> String {
        match self {
            Self::Required => format!("{field} is required"),
            Self::NotObject => format!("{field} should be an object"),
            Self::NotBoolean => format!("{field} should be a boolean"),
            Self::NotString => format!("{field} should be a string"),
            Self::NotNonEmptyString => format!("{field} should be a non-empty string"),
            Self::NotPositiveInteger => format!("{field} should be a positive integer"),
            Self::NotPositiveNumber => format!("{field} should be a positive number"),
            Self::NotArray => format!("{field} should be an array"),
            Self::NotArrayOfStrings => format!("{field} should be an array of strings"),
            Self::NotDateString => format!("{field} should be a valid date string"),
            Self::NotUuid => format!("{field} should be a valid uuid"),
            Self::NotGeojsonPoint => format!("{field} should be a GeoJSON Point feature"),
            Self::NotIn { type_name } => format!("{field} should be a valid {type_name}"),
            Self::SelfReference => format!("{field} cannot reference itself"),
            Self::WeightNotPositive { index } => {
                format!("weight at index {index} must be a positive number")
            }
            Self::WeightMethodInvalid { index } => {
                format!("method at index {index} must be a valid WeightMethod")
            }
        }
    }
}

/// A single field-level validation error
///
/// Identifies the offending field and the display name of the object (or
/// nested object, e.g. `"WorkPlace 0"`) that holds it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParamsError {
    /// Display name of the containing object
    pub display_name: String,
    /// Field name, `params` for structural errors
    pub field: String,
    /// Failure kind
    pub kind: ParamsErrorKind,
}

impl ParamsError {
    /// Create a new validation error
    #[inline]
    #[must_use]
    pub fn new(display_name: impl Into<String>, field: impl Into<String>, kind: ParamsErrorKind) -> Self {
        Self {
            display_name: display_name.into(),
            field: field.into(),
            kind,
        }
    }

    /// Whether this error concerns the named field
    #[inline]
    #[must_use]
    pub fn is_for(&self, field: &str) -> bool {
        self.field == field
    }
}

impl fmt::Display for ParamsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {}",
            self.display_name,
            self.kind.routine(),
            self.kind.describe(&self.field)
        )
    }
}

impl std::error::Error for ParamsError {}

/// Errors outside of field validation
#[derive(Debug, thiserror::Error)]
pub enum SurveyError {
    /// A result holding validation errors was unwrapped as a value
    #[error("result holds {} validation error(s), first: {}", .0.len(), first_message(.0))]
    Invalid(Vec<ParamsError>),

    /// Configuration could not be parsed
    #[error("configuration error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be written
    #[error("configuration error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    /// The logging subscriber could not be installed
    #[error("logging initialisation failed: {0}")]
    Logging(String),
}

fn first_message(errors: &[ParamsError]) -> String {
    errors
        .first()
        .map_or_else(|| "none".to_string(), ToString::to_string)
}
