//! Junctions: transfer points between two segments of a trip

use crate::object::{composed_dirty, reference_uuid, validate_child, ObjectAttributes, SurveyObject};
use crate::place::Place;
use crate::registry::{RegistryRef, SurveyObjectsRegistry};
use crate::trip::Trip;
use serde_json::Value;
use survey_core::constructor::{composed_value, flatten_serialized_data};
use survey_core::groups::{start_endable, uuidable, weight};
use survey_core::{initialize_composed_attribute, Params, ParamsError, ParamsValidator};

/// Known junction attributes
pub const JUNCTION_ATTRIBUTES: [&str; 12] = [
    "startDate",
    "startTime",
    "startTimePeriod",
    "endDate",
    "endTime",
    "endTimePeriod",
    "_weights",
    "_isValid",
    "_uuid",
    "parkingType",
    "parkingFeeType",
    "transitPlaceType",
];

const JUNCTION_COMPOSED: [&str; 3] = ["_place", "place", "_tripUuid"];

struct JunctionState {
    bags: ObjectAttributes,
    registry: RegistryRef,
    place: Option<Place>,
    trip_uuid: Option<String>,
}

survey_handle!(
    /// Where a person switches mode or vehicle during a trip
    Junction => JunctionState, registered
);

impl Junction {
    scalar_attributes! {
        start_date, set_start_date: String = "startDate";
        start_time, set_start_time: u64 = "startTime";
        start_time_period, set_start_time_period: String = "startTimePeriod";
        end_date, set_end_date: String = "endDate";
        end_time, set_end_time: u64 = "endTime";
        end_time_period, set_end_time_period: String = "endTimePeriod";
        parking_type, set_parking_type: String = "parkingType";
        parking_fee_type, set_parking_fee_type: String = "parkingFeeType";
        transit_place_type, set_transit_place_type: String = "transitPlaceType";
    }

    composed_children! {
        place, set_place: Option<Place>;
    }

    reference_uuids! {
        trip_uuid, set_trip_uuid;
    }

    /// Trip this junction belongs to
    #[must_use]
    pub fn trip(&self) -> Option<Trip> {
        let uuid = self.trip_uuid()?;
        self.registry()?.get_trip(&uuid)
    }
}

impl SurveyObject for Junction {
    const DISPLAY_NAME: &'static str = "Junction";

    fn validate_params(dirty: &Value, display_name: &str) -> Vec<ParamsError> {
        ParamsValidator::new(dirty, display_name)
            .required_object()
            .extend(uuidable::validate_params(dirty, None))
            .booleans(&["_isValid"])
            .extend(weight::validate_weights(dirty.get(weight::WEIGHTS_ATTRIBUTE)))
            .extend(start_endable::validate_params(dirty, Some(display_name)))
            .strings(&["parkingType", "parkingFeeType", "transitPlaceType"])
            .extend(validate_child::<Place>(composed_dirty(dirty, "place"), "Junction Place"))
            .uuids(&["_tripUuid"])
            .finish()
    }

    fn unserialize(params: &Params, registry: &SurveyObjectsRegistry) -> Self {
        let params = flatten_serialized_data(params);
        let junction = Self::from_state(JunctionState {
            bags: ObjectAttributes::from_params(&params, &JUNCTION_ATTRIBUTES, &JUNCTION_COMPOSED, Self::DISPLAY_NAME),
            registry: registry.downgrade(),
            place: initialize_composed_attribute(composed_value(&params, "place"), Place::unserialize, registry),
            trip_uuid: reference_uuid(&params, "_tripUuid"),
        });
        registry.register_junction(&junction);
        junction
    }
}
