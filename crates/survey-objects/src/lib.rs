//! Survey Objects
//!
//! The household travel survey object graph: households, persons,
//! journeys, trips, segments and the places they connect.
//!
//! # Core Concepts
//!
//! - [`SurveyObject`]: validation, construction, identity and attribute bags
//!   shared by every kind
//! - [`SurveyObjectsRegistry`]: uuid-indexed stores through which children
//!   resolve their parents
//! - Handles: every object is a cheap `Clone` over shared state, compared by
//!   identity with [`AttributeBags::ptr_eq`]
//!
//! # Example
//!
//! ```rust
//! use survey_objects::{Household, Person, SurveyObject, SurveyObjectsRegistry};
//! use serde_json::json;
//!
//! let registry = SurveyObjectsRegistry::new();
//! let household = Household::create(&json!({ "size": 2 }), &registry).unwrap();
//! let person = Person::create(
//!     &json!({ "age": 34, "_householdUuid": household.uuid() }),
//!     &registry,
//! );
//! assert!(person.is_ok());
//! assert!(person.unwrap().household().is_some());
//!
//! let rejected = Household::create(&json!({ "size": -1 }), &registry);
//! assert!(rejected.errors().iter().any(|error| error.is_for("size")));
//! ```

#![warn(missing_docs)]

#[macro_use]
mod macros;

pub mod attribute_types;
pub mod geography;
pub mod household;
pub mod interview;
pub mod journey;
pub mod junction;
pub mod object;
pub mod organization;
pub mod person;
pub mod place;
pub mod registry;
pub mod routing;
pub mod segment;
pub mod trip;
pub mod trip_chain;
pub mod vehicle;
pub mod visited_place;

// Re-exports
pub use attribute_types::{Mode, ModeCategory, UnknownValue};
pub use household::Household;
pub use interview::{Interview, InterviewLanguage, InterviewParadata};
pub use journey::Journey;
pub use junction::Junction;
pub use object::{AttributeBags, ObjectAttributes, SurveyObject};
pub use organization::Organization;
pub use person::Person;
pub use place::{Address, Place};
pub use registry::SurveyObjectsRegistry;
pub use routing::Routing;
pub use segment::Segment;
pub use trip::Trip;
pub use trip_chain::TripChain;
pub use vehicle::Vehicle;
pub use visited_place::VisitedPlace;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for code working with the survey object graph
    pub use crate::{
        AttributeBags, Household, Interview, Journey, Junction, Mode, ModeCategory, Organization, Person, Place,
        Segment, SurveyObject, SurveyObjectsRegistry, Trip, TripChain, Vehicle, VisitedPlace,
    };
    pub use survey_core::prelude::*;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
