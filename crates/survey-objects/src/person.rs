//! Persons: household members and their declared travel

use crate::attribute_types::{ACTIVITY_SCHOOL_USUAL, ACTIVITY_WORK_USUAL};
use crate::geography::coordinates_key;
use crate::household::Household;
use crate::journey::Journey;
use crate::object::{
    composed_dirty, find_by_uuid, insert_at, insert_relative, reference_uuid, remove_by_uuid, validate_children,
    ObjectAttributes, SurveyObject,
};
use crate::place::Place;
use crate::registry::{RegistryRef, SurveyObjectsRegistry};
use crate::vehicle::Vehicle;
use crate::visited_place::VisitedPlace;
use serde_json::Value;
use std::collections::HashSet;
use survey_core::constructor::{composed_value, flatten_serialized_data};
use survey_core::groups::uuidable::{self, UUID_ATTRIBUTE};
use survey_core::groups::weight;
use survey_core::{initialize_composed_array_attributes, Params, ParamsError, ParamsValidator};

/// Known person attributes
pub const PERSON_ATTRIBUTES: [&str; 38] = [
    "_weights",
    "_isValid",
    "_uuid",
    "_sequence",
    "_color",
    "_keepDiscard",
    "age",
    "ageGroup",
    "gender",
    "sexAssignedAtBirth",
    "drivingLicenseOwnership",
    "transitPassOwnership",
    "transitPasses",
    "hasDisability",
    "carsharingMember",
    "carsharingUser",
    "bikesharingMember",
    "bikesharingUser",
    "ridesharingMember",
    "ridesharingUser",
    "occupation",
    "schoolType",
    "schoolPlaceType",
    "studentType",
    "workerType",
    "workPlaceType",
    "jobCategory",
    "jobName",
    "isOnTheRoadWorker",
    "hasTelecommuteCompatibleJob",
    "educationalAttainment",
    "genderCustom",
    "schoolTypeOtherSpecify",
    "whoWillAnswerForThisPerson",
    "isProxy",
    "nickname",
    "contactPhoneNumber",
    "contactEmail",
];

/// Person attributes holding anything but a plain string
const NON_STRING_ATTRIBUTES: [&str; 8] = [
    "_weights",
    "_isValid",
    "_uuid",
    "_sequence",
    "age",
    "transitPasses",
    "whoWillAnswerForThisPerson",
    "isProxy",
];

const PERSON_COMPOSED: [&str; 9] = [
    "_workPlaces",
    "workPlaces",
    "_schoolPlaces",
    "schoolPlaces",
    "_journeys",
    "journeys",
    "_vehicles",
    "vehicles",
    "_householdUuid",
];

struct PersonState {
    bags: ObjectAttributes,
    registry: RegistryRef,
    work_places: Vec<Place>,
    school_places: Vec<Place>,
    journeys: Vec<Journey>,
    vehicles: Vec<Vehicle>,
    household_uuid: Option<String>,
}

survey_handle!(
    /// A household member
    Person => PersonState, registered
);

impl Person {
    scalar_attributes! {
        sequence, set_sequence: u64 = "_sequence";
        color, set_color: String = "_color";
        keep_discard, set_keep_discard: String = "_keepDiscard";
        age, set_age: u64 = "age";
        age_group, set_age_group: String = "ageGroup";
        gender, set_gender: String = "gender";
        sex_assigned_at_birth, set_sex_assigned_at_birth: String = "sexAssignedAtBirth";
        driving_license_ownership, set_driving_license_ownership: String = "drivingLicenseOwnership";
        transit_pass_ownership, set_transit_pass_ownership: String = "transitPassOwnership";
        transit_passes, set_transit_passes: Vec<String> = "transitPasses";
        has_disability, set_has_disability: String = "hasDisability";
        carsharing_member, set_carsharing_member: String = "carsharingMember";
        carsharing_user, set_carsharing_user: String = "carsharingUser";
        bikesharing_member, set_bikesharing_member: String = "bikesharingMember";
        bikesharing_user, set_bikesharing_user: String = "bikesharingUser";
        ridesharing_member, set_ridesharing_member: String = "ridesharingMember";
        ridesharing_user, set_ridesharing_user: String = "ridesharingUser";
        occupation, set_occupation: String = "occupation";
        school_type, set_school_type: String = "schoolType";
        school_place_type, set_school_place_type: String = "schoolPlaceType";
        student_type, set_student_type: String = "studentType";
        worker_type, set_worker_type: String = "workerType";
        work_place_type, set_work_place_type: String = "workPlaceType";
        job_category, set_job_category: String = "jobCategory";
        job_name, set_job_name: String = "jobName";
        is_on_the_road_worker, set_is_on_the_road_worker: String = "isOnTheRoadWorker";
        has_telecommute_compatible_job, set_has_telecommute_compatible_job: String = "hasTelecommuteCompatibleJob";
        educational_attainment, set_educational_attainment: String = "educationalAttainment";
        gender_custom, set_gender_custom: String = "genderCustom";
        school_type_other_specify, set_school_type_other_specify: String = "schoolTypeOtherSpecify";
        who_will_answer_for_this_person, set_who_will_answer_for_this_person: String = "whoWillAnswerForThisPerson";
        is_proxy, set_is_proxy: bool = "isProxy";
        nickname, set_nickname: String = "nickname";
        contact_phone_number, set_contact_phone_number: String = "contactPhoneNumber";
        contact_email, set_contact_email: String = "contactEmail";
    }

    composed_children! {
        work_places, set_work_places: Vec<Place>;
        school_places, set_school_places: Vec<Place>;
        journeys, set_journeys: Vec<Journey>;
        vehicles, set_vehicles: Vec<Vehicle>;
    }

    reference_uuids! {
        household_uuid, set_household_uuid;
    }

    /// Household this person belongs to
    #[must_use]
    pub fn household(&self) -> Option<Household> {
        let uuid = self.household_uuid()?;
        self.registry()?.get_household(&uuid)
    }

    /// Append a journey
    pub fn add_journey(&self, journey: Journey) {
        self.state_mut().journeys.push(journey);
    }

    /// Insert a journey at `index`, clamped to the journey count
    pub fn insert_journey(&self, journey: Journey, index: usize) {
        insert_at(&mut self.state_mut().journeys, journey, index);
    }

    /// Insert a journey after the one with uuid `after_uuid`
    ///
    /// An empty list just receives the journey; otherwise returns `false`
    /// when no journey matches.
    pub fn insert_journey_after_uuid(&self, journey: Journey, after_uuid: &str) -> bool {
        insert_relative(&mut self.state_mut().journeys, journey, after_uuid, true)
    }

    /// Insert a journey before the one with uuid `before_uuid`
    pub fn insert_journey_before_uuid(&self, journey: Journey, before_uuid: &str) -> bool {
        insert_relative(&mut self.state_mut().journeys, journey, before_uuid, false)
    }

    /// Remove the journey with uuid `uuid`
    pub fn remove_journey(&self, uuid: &str) -> bool {
        remove_by_uuid(&mut self.state_mut().journeys, uuid)
    }

    /// Journey with uuid `uuid`
    #[must_use]
    pub fn journey_by_uuid(&self, uuid: &str) -> Option<Journey> {
        find_by_uuid(&self.state().journeys, uuid)
    }

    /// Visited place with uuid `uuid`, searched across all journeys
    #[must_use]
    pub fn find_visited_place_by_uuid(&self, uuid: &str) -> Option<VisitedPlace> {
        self.journeys()
            .iter()
            .find_map(|journey| journey.visited_place_by_uuid(uuid))
    }

    /// Add usual work and school places declared in the travel diary
    ///
    /// Visited places with a `workUsual` or `schoolUsual` activity become
    /// work or school places, unless a place with the same coordinates is
    /// already there. Each derived place is a copy of the visited place's
    /// place attributes with a new uuid.
    pub fn setup_work_and_school_places(&self) {
        let Some(registry) = self.registry() else {
            tracing::warn!(person = %self.uuid(), "registry dropped, usual places not derived");
            return;
        };
        let visited_places: Vec<VisitedPlace> = self
            .journeys()
            .iter()
            .flat_map(Journey::visited_places)
            .collect();

        let work_places = usual_places(self.work_places(), &visited_places, ACTIVITY_WORK_USUAL, &registry);
        self.set_work_places(work_places);
        let school_places = usual_places(self.school_places(), &visited_places, ACTIVITY_SCHOOL_USUAL, &registry);
        self.set_school_places(school_places);
    }

    /// Store the palette colour for the person at `index` in the household
    ///
    /// The palette comes from the registry configuration and is cycled
    /// when there are more persons than colours.
    pub fn assign_color(&self, index: usize) {
        let Some(registry) = self.registry() else {
            return;
        };
        let color = registry.config().person_color(index).map(str::to_owned);
        if color.is_some() {
            self.set_color(color);
        }
    }
}

fn usual_places(
    existing: Vec<Place>,
    visited_places: &[VisitedPlace],
    activity: &str,
    registry: &SurveyObjectsRegistry,
) -> Vec<Place> {
    let mut known: HashSet<String> = existing
        .iter()
        .filter_map(|place| place.geography().as_ref().and_then(coordinates_key))
        .collect();
    let mut places = existing;
    for visited_place in visited_places
        .iter()
        .filter(|visited_place| visited_place.activity().as_deref() == Some(activity))
    {
        let Some(key) = visited_place.geography().as_ref().and_then(coordinates_key) else {
            continue;
        };
        if !known.insert(key) {
            continue;
        }
        let mut attributes = visited_place.place().map(|place| place.attributes()).unwrap_or_default();
        attributes.remove(UUID_ATTRIBUTE);
        let place = Place::unserialize(&attributes, registry);
        if place.name().is_none() {
            place.set_name(visited_place.name());
        }
        places.push(place);
    }
    places
}

impl SurveyObject for Person {
    const DISPLAY_NAME: &'static str = "Person";
    const CONFIDENTIAL_ATTRIBUTES: &'static [&'static str] = &["nickname", "contactPhoneNumber", "contactEmail"];

    fn validate_params(dirty: &Value, display_name: &str) -> Vec<ParamsError> {
        let string_attributes: Vec<&str> = PERSON_ATTRIBUTES
            .iter()
            .copied()
            .filter(|attribute| !NON_STRING_ATTRIBUTES.contains(attribute))
            .collect();
        ParamsValidator::new(dirty, display_name)
            .required_object()
            .extend(uuidable::validate_params(dirty, None))
            .booleans(&["_isValid"])
            .positive_integers(&["_sequence"])
            .extend(weight::validate_weights(dirty.get(weight::WEIGHTS_ATTRIBUTE)))
            .positive_integers(&["age"])
            .strings(&string_attributes)
            .arrays_of_strings(&["transitPasses"])
            .uuids(&["whoWillAnswerForThisPerson"])
            .booleans(&["isProxy"])
            .extend(validate_children::<Place>(composed_dirty(dirty, "workPlaces"), "WorkPlace"))
            .extend(validate_children::<Place>(composed_dirty(dirty, "schoolPlaces"), "SchoolPlace"))
            .extend(validate_children::<Journey>(composed_dirty(dirty, "journeys"), "Journey"))
            .extend(validate_children::<Vehicle>(composed_dirty(dirty, "vehicles"), "Vehicle"))
            .uuids(&["_householdUuid"])
            .finish()
    }

    fn unserialize(params: &Params, registry: &SurveyObjectsRegistry) -> Self {
        let params = flatten_serialized_data(params);
        let person = Self::from_state(PersonState {
            bags: ObjectAttributes::from_params(&params, &PERSON_ATTRIBUTES, &PERSON_COMPOSED, Self::DISPLAY_NAME),
            registry: registry.downgrade(),
            work_places: initialize_composed_array_attributes(
                composed_value(&params, "workPlaces"),
                Place::unserialize,
                registry,
            ),
            school_places: initialize_composed_array_attributes(
                composed_value(&params, "schoolPlaces"),
                Place::unserialize,
                registry,
            ),
            journeys: initialize_composed_array_attributes(
                composed_value(&params, "journeys"),
                Journey::unserialize,
                registry,
            ),
            vehicles: initialize_composed_array_attributes(
                composed_value(&params, "vehicles"),
                Vehicle::unserialize,
                registry,
            ),
            household_uuid: reference_uuid(&params, "_householdUuid"),
        });
        registry.register_person(&person);
        person
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::AttributeBags;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use survey_core::SurveyConfig;

    const HOUSEHOLD: &str = "9c1b2a3d-4e5f-4a6b-8c7d-9e0f1a2b3c4d";

    fn point(lon: f64, lat: f64) -> Value {
        json!({ "type": "Feature", "geometry": { "type": "Point", "coordinates": [lon, lat] }, "properties": {} })
    }

    fn person(value: Value, registry: &SurveyObjectsRegistry) -> Person {
        Person::unserialize(value.as_object().unwrap_or(&Params::new()), registry)
    }

    #[test]
    fn household_follows_registry() {
        let registry = SurveyObjectsRegistry::new();
        let person = person(json!({ "_householdUuid": HOUSEHOLD }), &registry);
        assert!(person.household().is_none());
        let household = Household::unserialize(
            json!({ "_uuid": HOUSEHOLD }).as_object().unwrap_or(&Params::new()),
            &registry,
        );
        assert!(person.household().is_some_and(|found| found.ptr_eq(&household)));
        registry.unregister_household(HOUSEHOLD);
        assert!(person.household().is_none());
    }

    #[test]
    fn usual_places_are_derived_once_per_location() {
        let registry = SurveyObjectsRegistry::new();
        let person = person(
            json!({
                "_workPlaces": [{ "name": "Existing office", "geography": point(-73.6, 45.5) }],
                "_journeys": [{
                    "_visitedPlaces": [
                        { "activity": "workUsual", "_place": { "_uuid": "office", "geography": point(-73.6, 45.5) } },
                        { "activity": "workUsual", "_place": { "name": "Plant", "geography": point(-73.4, 45.6) } },
                        { "activity": "workUsual", "_place": { "name": "Plant again", "geography": point(-73.4, 45.6) } },
                        { "activity": "schoolUsual", "_place": { "name": "College", "geography": point(-73.5, 45.4) } },
                        { "activity": "shopping", "_place": { "name": "Mall", "geography": point(-73.7, 45.3) } },
                        { "activity": "schoolUsual", "_place": { "name": "Nowhere" } }
                    ]
                }]
            }),
            &registry,
        );
        person.setup_work_and_school_places();

        let work_names: Vec<Option<String>> = person.work_places().iter().map(Place::name).collect();
        assert_eq!(
            work_names,
            vec![Some("Existing office".to_string()), Some("Plant".to_string())]
        );
        let school_places = person.school_places();
        assert_eq!(school_places.len(), 1);
        assert_eq!(school_places[0].name().as_deref(), Some("College"));

        let work_places = person.work_places();
        let derived = &work_places[1];
        let source = person
            .journeys()
            .first()
            .and_then(|journey| journey.visited_places().get(1).and_then(VisitedPlace::place));
        assert!(source.is_some_and(|source| source.uuid() != derived.uuid()));

        person.setup_work_and_school_places();
        assert_eq!(person.work_places().len(), 2);
        assert_eq!(person.school_places().len(), 1);
    }

    #[test]
    fn visited_places_are_found_across_journeys() {
        let registry = SurveyObjectsRegistry::new();
        let person = person(
            json!({
                "_journeys": [
                    { "_visitedPlaces": [{ "_uuid": "vp-a" }] },
                    { "_visitedPlaces": [{ "_uuid": "vp-b" }] }
                ]
            }),
            &registry,
        );
        assert_eq!(
            person.find_visited_place_by_uuid("vp-b").map(|place| place.uuid()).as_deref(),
            Some("vp-b")
        );
        assert!(person.find_visited_place_by_uuid("vp-c").is_none());
    }

    #[test]
    fn journey_management() {
        let registry = SurveyObjectsRegistry::new();
        let person = person(json!({}), &registry);
        let monday = Journey::unserialize(&Params::new(), &registry);
        let tuesday = Journey::unserialize(&Params::new(), &registry);
        let sunday = Journey::unserialize(&Params::new(), &registry);

        assert!(person.insert_journey_before_uuid(monday.clone(), "unknown"));
        assert!(person.insert_journey_after_uuid(tuesday.clone(), &monday.uuid()));
        assert!(!person.insert_journey_after_uuid(sunday.clone(), "unknown"));
        person.insert_journey(sunday.clone(), 0);
        let order: Vec<String> = person.journeys().iter().map(Journey::uuid).collect();
        assert_eq!(order, vec![sunday.uuid(), monday.uuid(), tuesday.uuid()]);
        assert!(person.journey_by_uuid(&monday.uuid()).is_some_and(|found| found.ptr_eq(&monday)));
        assert!(person.remove_journey(&monday.uuid()));
        assert!(person.journey_by_uuid(&monday.uuid()).is_none());
    }

    #[test]
    fn colors_cycle_through_the_configured_palette() {
        let registry =
            SurveyObjectsRegistry::with_config(SurveyConfig::new().with_person_colors(vec!["#111".into(), "#222".into()]));
        let person = person(json!({}), &registry);
        person.assign_color(3);
        assert_eq!(person.color().as_deref(), Some("#222"));
        assert_eq!(person.attribute("_color"), Some(json!("#222")));
    }

    #[test]
    fn nickname_and_contacts_are_confidential() {
        let registry = SurveyObjectsRegistry::new();
        let person = person(
            json!({ "age": 34, "nickname": "Sam", "contactEmail": "sam@example.org", "favouriteColor": "blue" }),
            &registry,
        );
        let exported = person.export_attributes(false);
        assert_eq!(exported.get("age"), Some(&json!(34)));
        assert!(!exported.contains_key("nickname"));
        assert!(!exported.contains_key("contactEmail"));
        assert_eq!(person.custom_attribute("favouriteColor"), Some(json!("blue")));
    }

    #[test]
    fn validate_params_labels_children() {
        let errors = Person::validate_params(
            &json!({
                "age": -3,
                "gender": 1,
                "transitPasses": "monthly",
                "isProxy": "no",
                "_workPlaces": [{}, { "name": 5 }],
                "_journeys": [{ "type": false }],
                "_vehicles": [{ "make": 0 }],
                "_householdUuid": "home"
            }),
            "Person",
        );
        let described: Vec<(String, String)> = errors
            .into_iter()
            .map(|error| (error.display_name, error.field))
            .collect();
        assert_eq!(
            described,
            vec![
                ("Person".to_string(), "age".to_string()),
                ("Person".to_string(), "gender".to_string()),
                ("Person".to_string(), "transitPasses".to_string()),
                ("Person".to_string(), "isProxy".to_string()),
                ("WorkPlace 1".to_string(), "name".to_string()),
                ("Journey 0".to_string(), "type".to_string()),
                ("Vehicle 0".to_string(), "make".to_string()),
                ("Person".to_string(), "_householdUuid".to_string()),
            ]
        );
    }
}
