//! Survey Core
//!
//! Building blocks shared by every survey object kind.
//!
//! # Overview
//!
//! - **SurveyResult**: value-or-validation-errors returned by factories
//! - **validators**: stateless `(field, value, display_name)` predicates
//! - **groups**: uuid, start/end and weights field-group validators
//! - **constructor**: attribute partitioning and composed-child building
//! - **KindStore**: uuid-keyed store backing the objects registry
//!
//! # Example
//!
//! ```rust
//! use survey_core::validators;
//! use serde_json::json;
//!
//! let errors = validators::is_positive_integer("size", Some(&json!(-1)), "Household");
//! assert_eq!(errors.len(), 1);
//! assert_eq!(
//!     errors[0].to_string(),
//!     "Household validateParams: size should be a positive integer"
//! );
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod constructor;
pub mod error;
pub mod groups;
pub mod logging;
pub mod params;
pub mod result;
pub mod store;
pub mod validators;

// Re-exports
pub use config::{LoggingConfig, SurveyConfig};
pub use constructor::{
    flatten_serialized_data, initialize_attributes, initialize_composed_array_attributes,
    initialize_composed_attribute, InitializedAttributes,
};
pub use error::{ParamsError, ParamsErrorKind, SurveyError};
pub use groups::weight::{Weight, WeightMethod};
pub use params::{AttributeValue, Params};
pub use result::SurveyResult;
pub use store::KindStore;
pub use validators::ParamsValidator;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for survey object code
    pub use crate::{
        AttributeValue, KindStore, ParamsError, ParamsErrorKind, Params, ParamsValidator, SurveyConfig,
        SurveyError, SurveyResult, Weight, WeightMethod,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
