//! Segments: one single-mode leg of a trip

use crate::attribute_types::{Mode, ModeCategory};
use crate::household::Household;
use crate::journey::Journey;
use crate::junction::Junction;
use crate::object::{
    composed_dirty, reference_uuid, validate_child, validate_children_named, ObjectAttributes, SurveyObject,
};
use crate::person::Person;
use crate::registry::{RegistryRef, SurveyObjectsRegistry};
use crate::routing::Routing;
use crate::trip::Trip;
use serde_json::Value;
use survey_core::constructor::{composed_value, flatten_serialized_data};
use survey_core::groups::{start_endable, uuidable, weight};
use survey_core::{
    initialize_composed_array_attributes, initialize_composed_attribute, Params, ParamsError, ParamsValidator,
};

/// Known segment attributes
pub const SEGMENT_ATTRIBUTES: [&str; 19] = [
    "startDate",
    "startTime",
    "startTimePeriod",
    "endDate",
    "endTime",
    "endTimePeriod",
    "_weights",
    "_isValid",
    "_uuid",
    "_sequence",
    "mode",
    "modeOtherSpecify",
    "driverType",
    "driverUuid",
    "carType",
    "vehicleOccupancy",
    "paidForParking",
    "onDemandType",
    "busLines",
];

const SEGMENT_COMPOSED: [&str; 21] = [
    "_origin",
    "origin",
    "_destination",
    "destination",
    "_transitDeclaredRouting",
    "transitDeclaredRouting",
    "_walkingDeclaredRouting",
    "walkingDeclaredRouting",
    "_cyclingDeclaredRouting",
    "cyclingDeclaredRouting",
    "_drivingDeclaredRouting",
    "drivingDeclaredRouting",
    "_transitCalculatedRoutings",
    "transitCalculatedRoutings",
    "_walkingCalculatedRoutings",
    "walkingCalculatedRoutings",
    "_cyclingCalculatedRoutings",
    "cyclingCalculatedRoutings",
    "_drivingCalculatedRoutings",
    "drivingCalculatedRoutings",
    "_tripUuid",
];

/// Routing families, with the display name used to validate them
const ROUTINGS: [(&str, &str, &str); 4] = [
    ("transitDeclaredRouting", "transitCalculatedRoutings", "TransitRouting"),
    ("walkingDeclaredRouting", "walkingCalculatedRoutings", "WalkingRouting"),
    ("cyclingDeclaredRouting", "cyclingCalculatedRoutings", "CyclingRouting"),
    ("drivingDeclaredRouting", "drivingCalculatedRoutings", "DrivingRouting"),
];

struct SegmentState {
    bags: ObjectAttributes,
    registry: RegistryRef,
    origin: Option<Junction>,
    destination: Option<Junction>,
    transit_declared_routing: Option<Routing>,
    walking_declared_routing: Option<Routing>,
    cycling_declared_routing: Option<Routing>,
    driving_declared_routing: Option<Routing>,
    transit_calculated_routings: Vec<Routing>,
    walking_calculated_routings: Vec<Routing>,
    cycling_calculated_routings: Vec<Routing>,
    driving_calculated_routings: Vec<Routing>,
    trip_uuid: Option<String>,
}

survey_handle!(
    /// One leg of a trip, travelled with a single mode
    Segment => SegmentState, registered
);

impl Segment {
    scalar_attributes! {
        start_date, set_start_date: String = "startDate";
        start_time, set_start_time: u64 = "startTime";
        start_time_period, set_start_time_period: String = "startTimePeriod";
        end_date, set_end_date: String = "endDate";
        end_time, set_end_time: u64 = "endTime";
        end_time_period, set_end_time_period: String = "endTimePeriod";
        sequence, set_sequence: u64 = "_sequence";
        mode_value, set_mode_value: String = "mode";
        mode_other_specify, set_mode_other_specify: String = "modeOtherSpecify";
        driver_type, set_driver_type: String = "driverType";
        driver_uuid, set_driver_uuid: String = "driverUuid";
        car_type, set_car_type: String = "carType";
        vehicle_occupancy, set_vehicle_occupancy: u64 = "vehicleOccupancy";
        paid_for_parking, set_paid_for_parking: bool = "paidForParking";
        on_demand_type, set_on_demand_type: String = "onDemandType";
        bus_lines, set_bus_lines: Vec<String> = "busLines";
    }

    composed_children! {
        origin, set_origin: Option<Junction>;
        destination, set_destination: Option<Junction>;
        transit_declared_routing, set_transit_declared_routing: Option<Routing>;
        walking_declared_routing, set_walking_declared_routing: Option<Routing>;
        cycling_declared_routing, set_cycling_declared_routing: Option<Routing>;
        driving_declared_routing, set_driving_declared_routing: Option<Routing>;
        transit_calculated_routings, set_transit_calculated_routings: Vec<Routing>;
        walking_calculated_routings, set_walking_calculated_routings: Vec<Routing>;
        cycling_calculated_routings, set_cycling_calculated_routings: Vec<Routing>;
        driving_calculated_routings, set_driving_calculated_routings: Vec<Routing>;
    }

    reference_uuids! {
        trip_uuid, set_trip_uuid;
    }

    /// Typed mode, `None` when absent or not a known mode
    #[must_use]
    pub fn mode(&self) -> Option<Mode> {
        self.mode_value()?.parse().ok()
    }

    /// Set or clear the mode
    pub fn set_mode(&self, mode: Option<Mode>) {
        self.set_mode_value(mode.map(|mode| mode.as_str().to_owned()));
    }

    /// Category of the mode
    #[must_use]
    pub fn mode_category(&self) -> Option<ModeCategory> {
        self.mode().map(Mode::category)
    }

    /// Whether the mode is a transit mode
    #[must_use]
    pub fn is_transit(&self) -> bool {
        self.mode_category() == Some(ModeCategory::Transit)
    }

    /// Trip this segment belongs to
    #[must_use]
    pub fn trip(&self) -> Option<Trip> {
        let uuid = self.trip_uuid()?;
        self.registry()?.get_trip(&uuid)
    }

    /// Journey of the trip
    #[must_use]
    pub fn journey(&self) -> Option<Journey> {
        self.trip()?.journey()
    }

    /// Person travelling, through trip and journey
    #[must_use]
    pub fn person(&self) -> Option<Person> {
        self.journey()?.person()
    }

    /// Household of the person travelling
    #[must_use]
    pub fn household(&self) -> Option<Household> {
        self.person()?.household()
    }

    /// Person who drove, when the driver is a household member
    #[must_use]
    pub fn driver(&self) -> Option<Person> {
        let uuid = self.driver_uuid()?;
        self.registry()?.get_person(&uuid)
    }
}

impl SurveyObject for Segment {
    const DISPLAY_NAME: &'static str = "Segment";

    fn validate_params(dirty: &Value, display_name: &str) -> Vec<ParamsError> {
        let mut validator = ParamsValidator::new(dirty, display_name)
            .required_object()
            .extend(uuidable::validate_params(dirty, Some(display_name)))
            .extend(start_endable::validate_params(dirty, Some(display_name)))
            .positive_integers(&["_sequence"])
            .booleans(&["_isValid"])
            .extend(weight::validate_weights(dirty.get(weight::WEIGHTS_ATTRIBUTE)))
            .strings(&["mode", "modeOtherSpecify", "driverType"])
            .uuids(&["driverUuid"])
            .positive_integers(&["vehicleOccupancy"])
            .strings(&["carType"])
            .booleans(&["paidForParking"])
            .strings(&["onDemandType"])
            .arrays_of_strings(&["busLines"])
            .extend(validate_child::<Junction>(composed_dirty(dirty, "origin"), "OriginJunction"))
            .extend(validate_child::<Junction>(
                composed_dirty(dirty, "destination"),
                "DestinationJunction",
            ));
        for (declared, _, routing_name) in ROUTINGS {
            validator = validator.extend(validate_child::<Routing>(composed_dirty(dirty, declared), routing_name));
        }
        for (_, calculated, routing_name) in ROUTINGS {
            validator = validator.extend(validate_children_named::<Routing>(
                composed_dirty(dirty, calculated),
                routing_name,
            ));
        }
        validator.uuids(&["_tripUuid"]).finish()
    }

    fn unserialize(params: &Params, registry: &SurveyObjectsRegistry) -> Self {
        let params = flatten_serialized_data(params);
        let single = |name: &str| initialize_composed_attribute(composed_value(&params, name), Routing::unserialize, registry);
        let array =
            |name: &str| initialize_composed_array_attributes(composed_value(&params, name), Routing::unserialize, registry);
        let segment = Self::from_state(SegmentState {
            bags: ObjectAttributes::from_params(&params, &SEGMENT_ATTRIBUTES, &SEGMENT_COMPOSED, Self::DISPLAY_NAME),
            registry: registry.downgrade(),
            origin: initialize_composed_attribute(composed_value(&params, "origin"), Junction::unserialize, registry),
            destination: initialize_composed_attribute(
                composed_value(&params, "destination"),
                Junction::unserialize,
                registry,
            ),
            transit_declared_routing: single("transitDeclaredRouting"),
            walking_declared_routing: single("walkingDeclaredRouting"),
            cycling_declared_routing: single("cyclingDeclaredRouting"),
            driving_declared_routing: single("drivingDeclaredRouting"),
            transit_calculated_routings: array("transitCalculatedRoutings"),
            walking_calculated_routings: array("walkingCalculatedRoutings"),
            cycling_calculated_routings: array("cyclingCalculatedRoutings"),
            driving_calculated_routings: array("drivingCalculatedRoutings"),
            trip_uuid: reference_uuid(&params, "_tripUuid"),
        });
        registry.register_segment(&segment);
        segment
    }
}
