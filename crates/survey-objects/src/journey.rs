//! Journeys: the visited places and trips of a person over a period

use crate::household::Household;
use crate::object::{
    composed_dirty, find_by_uuid, insert_at, insert_relative, reference_uuid, remove_by_uuid,
    validate_children_named, ObjectAttributes, SurveyObject,
};
use crate::person::Person;
use crate::registry::{RegistryRef, SurveyObjectsRegistry};
use crate::trip::Trip;
use crate::trip_chain::TripChain;
use crate::visited_place::VisitedPlace;
use serde_json::Value;
use survey_core::constructor::{composed_value, flatten_serialized_data};
use survey_core::groups::{start_endable, uuidable, weight};
use survey_core::{initialize_composed_array_attributes, Params, ParamsError, ParamsValidator};

/// Known journey attributes
pub const JOURNEY_ATTRIBUTES: [&str; 19] = [
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
    "name",
    "type",
    "noSchoolTripReason",
    "noSchoolTripReasonSpecify",
    "noWorkTripReason",
    "noWorkTripReasonSpecify",
    "didTrips",
    "previousWeekRemoteWorkDays",
    "previousWeekTravelToWorkDays",
];

const JOURNEY_COMPOSED: [&str; 7] = [
    "_visitedPlaces",
    "visitedPlaces",
    "_trips",
    "trips",
    "_tripChains",
    "tripChains",
    "_personUuid",
];

struct JourneyState {
    bags: ObjectAttributes,
    registry: RegistryRef,
    visited_places: Vec<VisitedPlace>,
    trips: Vec<Trip>,
    trip_chains: Vec<TripChain>,
    person_uuid: Option<String>,
}

survey_handle!(
    /// Visited places, trips and trip chains of one person for a period
    ///
    /// Usually one day, but a journey can also span a weekend or a long
    /// distance trip.
    Journey => JourneyState, registered
);

impl Journey {
    scalar_attributes! {
        start_date, set_start_date: String = "startDate";
        start_time, set_start_time: u64 = "startTime";
        start_time_period, set_start_time_period: String = "startTimePeriod";
        end_date, set_end_date: String = "endDate";
        end_time, set_end_time: u64 = "endTime";
        end_time_period, set_end_time_period: String = "endTimePeriod";
        sequence, set_sequence: u64 = "_sequence";
        name, set_name: String = "name";
        journey_type, set_journey_type: String = "type";
        no_school_trip_reason, set_no_school_trip_reason: String = "noSchoolTripReason";
        no_school_trip_reason_specify, set_no_school_trip_reason_specify: String = "noSchoolTripReasonSpecify";
        no_work_trip_reason, set_no_work_trip_reason: String = "noWorkTripReason";
        no_work_trip_reason_specify, set_no_work_trip_reason_specify: String = "noWorkTripReasonSpecify";
        did_trips, set_did_trips: String = "didTrips";
        previous_week_remote_work_days, set_previous_week_remote_work_days: Params = "previousWeekRemoteWorkDays";
        previous_week_travel_to_work_days, set_previous_week_travel_to_work_days: Params = "previousWeekTravelToWorkDays";
    }

    composed_children! {
        visited_places, set_visited_places: Vec<VisitedPlace>;
        trips, set_trips: Vec<Trip>;
        trip_chains, set_trip_chains: Vec<TripChain>;
    }

    reference_uuids! {
        person_uuid, set_person_uuid;
    }

    /// Person this journey belongs to
    #[must_use]
    pub fn person(&self) -> Option<Person> {
        let uuid = self.person_uuid()?;
        self.registry()?.get_person(&uuid)
    }

    /// Household of the person
    #[must_use]
    pub fn household(&self) -> Option<Household> {
        self.person()?.household()
    }

    /// Append a visited place
    pub fn add_visited_place(&self, visited_place: VisitedPlace) {
        self.state_mut().visited_places.push(visited_place);
    }

    /// Insert a visited place at `index`, clamped to the list length
    pub fn insert_visited_place(&self, visited_place: VisitedPlace, index: usize) {
        insert_at(&mut self.state_mut().visited_places, visited_place, index);
    }

    /// Insert a visited place after the one with uuid `after_uuid`
    ///
    /// An empty list just receives the place; otherwise returns `false`
    /// when no visited place matches.
    pub fn insert_visited_place_after_uuid(&self, visited_place: VisitedPlace, after_uuid: &str) -> bool {
        insert_relative(&mut self.state_mut().visited_places, visited_place, after_uuid, true)
    }

    /// Insert a visited place before the one with uuid `before_uuid`
    pub fn insert_visited_place_before_uuid(&self, visited_place: VisitedPlace, before_uuid: &str) -> bool {
        insert_relative(&mut self.state_mut().visited_places, visited_place, before_uuid, false)
    }

    /// Remove the visited place with uuid `uuid`
    pub fn remove_visited_place(&self, uuid: &str) -> bool {
        remove_by_uuid(&mut self.state_mut().visited_places, uuid)
    }

    /// Visited place with uuid `uuid`
    #[must_use]
    pub fn visited_place_by_uuid(&self, uuid: &str) -> Option<VisitedPlace> {
        find_by_uuid(&self.state().visited_places, uuid)
    }

    /// Append a trip
    pub fn add_trip(&self, trip: Trip) {
        self.state_mut().trips.push(trip);
    }

    /// Insert a trip at `index`, clamped to the list length
    pub fn insert_trip(&self, trip: Trip, index: usize) {
        insert_at(&mut self.state_mut().trips, trip, index);
    }

    /// Insert a trip after the one with uuid `after_uuid`
    pub fn insert_trip_after_uuid(&self, trip: Trip, after_uuid: &str) -> bool {
        insert_relative(&mut self.state_mut().trips, trip, after_uuid, true)
    }

    /// Insert a trip before the one with uuid `before_uuid`
    pub fn insert_trip_before_uuid(&self, trip: Trip, before_uuid: &str) -> bool {
        insert_relative(&mut self.state_mut().trips, trip, before_uuid, false)
    }

    /// Remove the trip with uuid `uuid`
    pub fn remove_trip(&self, uuid: &str) -> bool {
        remove_by_uuid(&mut self.state_mut().trips, uuid)
    }

    /// Trip with uuid `uuid`
    #[must_use]
    pub fn trip_by_uuid(&self, uuid: &str) -> Option<Trip> {
        find_by_uuid(&self.state().trips, uuid)
    }
}

impl SurveyObject for Journey {
    const DISPLAY_NAME: &'static str = "Journey";

    fn validate_params(dirty: &Value, display_name: &str) -> Vec<ParamsError> {
        ParamsValidator::new(dirty, display_name)
            .required_object()
            .extend(uuidable::validate_params(dirty, Some(display_name)))
            .extend(start_endable::validate_params(dirty, Some(display_name)))
            .positive_integers(&["_sequence"])
            .booleans(&["_isValid"])
            .extend(weight::validate_weights(dirty.get(weight::WEIGHTS_ATTRIBUTE)))
            .strings(&[
                "name",
                "type",
                "noSchoolTripReason",
                "noSchoolTripReasonSpecify",
                "noWorkTripReason",
                "noWorkTripReasonSpecify",
                "didTrips",
            ])
            .objects(&["previousWeekRemoteWorkDays", "previousWeekTravelToWorkDays"])
            .extend(validate_children_named::<VisitedPlace>(
                composed_dirty(dirty, "visitedPlaces"),
                "VisitedPlace",
            ))
            .extend(validate_children_named::<Trip>(composed_dirty(dirty, "trips"), "Trip"))
            .extend(validate_children_named::<TripChain>(composed_dirty(dirty, "tripChains"), "TripChain"))
            .uuids(&["_personUuid"])
            .finish()
    }

    fn unserialize(params: &Params, registry: &SurveyObjectsRegistry) -> Self {
        let params = flatten_serialized_data(params);
        let journey = Self::from_state(JourneyState {
            bags: ObjectAttributes::from_params(&params, &JOURNEY_ATTRIBUTES, &JOURNEY_COMPOSED, Self::DISPLAY_NAME),
            registry: registry.downgrade(),
            visited_places: initialize_composed_array_attributes(
                composed_value(&params, "visitedPlaces"),
                VisitedPlace::unserialize,
                registry,
            ),
            trips: initialize_composed_array_attributes(composed_value(&params, "trips"), Trip::unserialize, registry),
            trip_chains: initialize_composed_array_attributes(
                composed_value(&params, "tripChains"),
                TripChain::unserialize,
                registry,
            ),
            person_uuid: reference_uuid(&params, "_personUuid"),
        });
        registry.register_journey(&journey);
        journey
    }
}
