//! Trip chains: consecutive trips anchored at stable locations

use crate::journey::Journey;
use crate::object::{composed_dirty, reference_uuid, validate_children_named, ObjectAttributes, SurveyObject};
use crate::registry::{RegistryRef, SurveyObjectsRegistry};
use crate::trip::Trip;
use crate::visited_place::VisitedPlace;
use serde_json::Value;
use survey_core::constructor::{composed_value, flatten_serialized_data};
use survey_core::groups::{uuidable, weight};
use survey_core::{initialize_composed_array_attributes, Params, ParamsError, ParamsValidator};

/// Known trip chain attributes
pub const TRIP_CHAIN_ATTRIBUTES: [&str; 12] = [
    "_weights",
    "_isValid",
    "_uuid",
    "startDate",
    "endDate",
    "startTime",
    "endTime",
    "category",
    "isMultiLoop",
    "isConstrained",
    "mainActivity",
    "mainActivityCategory",
];

const TRIP_CHAIN_COMPOSED: [&str; 5] = ["_trips", "trips", "_visitedPlaces", "visitedPlaces", "_journeyUuid"];

struct TripChainState {
    bags: ObjectAttributes,
    registry: RegistryRef,
    trips: Vec<Trip>,
    visited_places: Vec<VisitedPlace>,
    journey_uuid: Option<String>,
}

survey_handle!(
    /// Trips grouped between two anchor places (home, work, school)
    TripChain => TripChainState, registered
);

impl TripChain {
    scalar_attributes! {
        start_date, set_start_date: String = "startDate";
        end_date, set_end_date: String = "endDate";
        start_time, set_start_time: u64 = "startTime";
        end_time, set_end_time: u64 = "endTime";
        category, set_category: String = "category";
        is_multi_loop, set_is_multi_loop: bool = "isMultiLoop";
        is_constrained, set_is_constrained: bool = "isConstrained";
        main_activity, set_main_activity: String = "mainActivity";
        main_activity_category, set_main_activity_category: String = "mainActivityCategory";
    }

    composed_children! {
        trips, set_trips: Vec<Trip>;
        visited_places, set_visited_places: Vec<VisitedPlace>;
    }

    reference_uuids! {
        journey_uuid, set_journey_uuid;
    }

    /// Journey the chain belongs to
    #[must_use]
    pub fn journey(&self) -> Option<Journey> {
        let uuid = self.journey_uuid()?;
        self.registry()?.get_journey(&uuid)
    }
}

impl SurveyObject for TripChain {
    const DISPLAY_NAME: &'static str = "TripChain";

    fn validate_params(dirty: &Value, display_name: &str) -> Vec<ParamsError> {
        ParamsValidator::new(dirty, display_name)
            .required_object()
            .extend(uuidable::validate_params(dirty, None))
            .booleans(&["_isValid"])
            .extend(weight::validate_weights(dirty.get(weight::WEIGHTS_ATTRIBUTE)))
            .date_strings(&["startDate", "endDate"])
            .positive_integers(&["startTime", "endTime"])
            .strings(&["category"])
            .booleans(&["isMultiLoop", "isConstrained"])
            .strings(&["mainActivity", "mainActivityCategory"])
            .extend(validate_children_named::<Trip>(composed_dirty(dirty, "trips"), "Trip"))
            .extend(validate_children_named::<VisitedPlace>(
                composed_dirty(dirty, "visitedPlaces"),
                "VisitedPlace",
            ))
            .uuids(&["_journeyUuid"])
            .finish()
    }

    fn unserialize(params: &Params, registry: &SurveyObjectsRegistry) -> Self {
        let params = flatten_serialized_data(params);
        let trip_chain = Self::from_state(TripChainState {
            bags: ObjectAttributes::from_params(
                &params,
                &TRIP_CHAIN_ATTRIBUTES,
                &TRIP_CHAIN_COMPOSED,
                Self::DISPLAY_NAME,
            ),
            registry: registry.downgrade(),
            trips: initialize_composed_array_attributes(composed_value(&params, "trips"), Trip::unserialize, registry),
            visited_places: initialize_composed_array_attributes(
                composed_value(&params, "visitedPlaces"),
                VisitedPlace::unserialize,
                registry,
            ),
            journey_uuid: reference_uuid(&params, "_journeyUuid"),
        });
        registry.register_trip_chain(&trip_chain);
        trip_chain
    }
}
