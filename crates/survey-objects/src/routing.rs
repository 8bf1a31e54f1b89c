//! Declared or calculated route between a segment's origin and destination
//!
//! Routings are composed values of a segment and are never registered.

use crate::object::{ObjectAttributes, SurveyObject};
use crate::registry::SurveyObjectsRegistry;
use serde_json::Value;
use survey_core::constructor::flatten_serialized_data;
use survey_core::groups::uuidable;
use survey_core::{Params, ParamsError, ParamsValidator};

/// Known routing attributes
pub const ROUTING_ATTRIBUTES: [&str; 10] = [
    "_uuid",
    "arrivalDate",
    "departureDate",
    "arrivalTime",
    "departureTime",
    "calculatedOn",
    "mode",
    "status",
    "travelTimeS",
    "travelDistanceM",
];

struct RoutingState {
    bags: ObjectAttributes,
}

survey_handle!(
    /// One route alternative
    Routing => RoutingState
);

impl Routing {
    scalar_attributes! {
        arrival_date, set_arrival_date: String = "arrivalDate";
        departure_date, set_departure_date: String = "departureDate";
        arrival_time, set_arrival_time: u64 = "arrivalTime";
        departure_time, set_departure_time: u64 = "departureTime";
        calculated_on, set_calculated_on: u64 = "calculatedOn";
        mode, set_mode: String = "mode";
        status, set_status: String = "status";
        travel_time_s, set_travel_time_s: u64 = "travelTimeS";
        travel_distance_m, set_travel_distance_m: u64 = "travelDistanceM";
    }
}

impl SurveyObject for Routing {
    const DISPLAY_NAME: &'static str = "Routing";

    fn validate_params(dirty: &Value, display_name: &str) -> Vec<ParamsError> {
        ParamsValidator::new(dirty, display_name)
            .required_object()
            .extend(uuidable::validate_params(dirty, None))
            .date_strings(&["arrivalDate", "departureDate"])
            .positive_integers(&["arrivalTime", "departureTime", "calculatedOn"])
            .strings(&["mode", "status"])
            .positive_integers(&["travelTimeS", "travelDistanceM"])
            .finish()
    }

    fn unserialize(params: &Params, _registry: &SurveyObjectsRegistry) -> Self {
        let params = flatten_serialized_data(params);
        Self::from_state(RoutingState {
            bags: ObjectAttributes::from_params(&params, &ROUTING_ATTRIBUTES, &[], Self::DISPLAY_NAME),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn routing_attributes() {
        let registry = SurveyObjectsRegistry::new();
        let params = json!({ "mode": "transit", "travelTimeS": 1200, "route": { "legs": [] } });
        let routing = Routing::unserialize(params.as_object().unwrap_or(&Params::new()), &registry);
        assert_eq!(routing.mode().as_deref(), Some("transit"));
        assert_eq!(routing.travel_time_s(), Some(1200));
        assert!(routing.custom_attribute("route").is_some());
        assert!(registry.is_empty());
    }

    #[test]
    fn invalid_routing_fields() {
        let errors = Routing::validate_params(
            &json!({ "arrivalDate": "tomorrow", "travelDistanceM": -5 }),
            "TransitRouting",
        );
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors[0].to_string(),
            "TransitRouting validateParams: arrivalDate should be a valid date string"
        );
        assert!(errors[1].is_for("travelDistanceM"));
    }
}
