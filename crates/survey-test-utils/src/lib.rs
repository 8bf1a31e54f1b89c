//! Testing utilities for the survey workspace
//!
//! Valid raw parameter bags and fully cross-registered object chains.

#![allow(missing_docs)]

use serde_json::{json, Value};
use survey_core::Params;
use survey_objects::{Household, Journey, Person, Segment, SurveyObject, SurveyObjectsRegistry, Trip};

pub fn new_uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Object view of a JSON value, empty when it is not an object
pub fn params(value: &Value) -> Params {
    value.as_object().cloned().unwrap_or_default()
}

pub fn valid_household_params() -> Value {
    json!({
        "_uuid": new_uuid(),
        "size": 2,
        "carNumber": 1,
        "bicycleNumber": 2,
        "category": "couple",
        "homeCarParkings": ["driveway"],
        "incomeLevel": "medium",
        "contactEmail": "household@example.org"
    })
}

pub fn valid_person_params() -> Value {
    json!({
        "_uuid": new_uuid(),
        "age": 34,
        "gender": "female",
        "drivingLicenseOwnership": "yes",
        "occupation": "fullTimeWorker",
        "nickname": "Sam"
    })
}

pub fn valid_journey_params() -> Value {
    json!({
        "_uuid": new_uuid(),
        "startDate": "2024-03-05",
        "startTime": 21_600,
        "endDate": "2024-03-05",
        "endTime": 79_200,
        "name": "Tuesday"
    })
}

pub fn valid_trip_params() -> Value {
    json!({
        "_uuid": new_uuid(),
        "startDate": "2024-03-05",
        "startTime": 28_800,
        "endDate": "2024-03-05",
        "endTime": 30_600
    })
}

pub fn valid_segment_params() -> Value {
    json!({
        "_uuid": new_uuid(),
        "mode": "walk",
        "_sequence": 1
    })
}

pub fn valid_trip_chain_params() -> Value {
    json!({
        "_uuid": new_uuid(),
        "startDate": "2024-03-05",
        "endDate": "2024-03-05",
        "startTime": 25_200,
        "endTime": 64_800,
        "category": "simple",
        "isMultiLoop": false,
        "isConstrained": true,
        "mainActivity": "workUsual"
    })
}

/// Household, person, journey, trip and segment linked by parent uuids
#[derive(Debug, Clone)]
pub struct Chain {
    pub household: Household,
    pub person: Person,
    pub journey: Journey,
    pub trip: Trip,
    pub segment: Segment,
}

/// Build a fully cross-registered chain in `registry`
///
/// The household composes the whole chain, and every child carries the
/// uuid of its parent, so each level resolves up to the household.
pub fn build_chain(registry: &SurveyObjectsRegistry) -> Chain {
    let mut household = valid_household_params();
    let mut person = valid_person_params();
    let mut journey = valid_journey_params();
    let mut trip = valid_trip_params();
    let mut segment = valid_segment_params();

    segment["_tripUuid"] = trip["_uuid"].clone();
    trip["_journeyUuid"] = journey["_uuid"].clone();
    trip["_segments"] = json!([segment]);
    journey["_personUuid"] = person["_uuid"].clone();
    journey["_trips"] = json!([trip]);
    person["_householdUuid"] = household["_uuid"].clone();
    person["_journeys"] = json!([journey]);
    household["_members"] = json!([person]);

    let household = Household::unserialize(&params(&household), registry);
    let person = household.members().remove(0);
    let journey = person.journeys().remove(0);
    let trip = journey.trips().remove(0);
    let segment = trip.segments().remove(0);
    Chain {
        household,
        person,
        journey,
        trip,
        segment,
    }
}
