//! Households: the root of the travel survey object graph

use crate::interview::Interview;
use crate::object::{
    composed_dirty, find_by_uuid, reference_uuid, remove_by_uuid, validate_children, ObjectAttributes, SurveyObject,
};
use crate::person::Person;
use crate::place::Place;
use crate::registry::{RegistryRef, SurveyObjectsRegistry};
use crate::vehicle::Vehicle;
use serde_json::Value;
use survey_core::constructor::{composed_value, flatten_serialized_data};
use survey_core::groups::{uuidable, weight};
use survey_core::{initialize_composed_array_attributes, Params, ParamsError, ParamsValidator};

/// Known household attributes
pub const HOUSEHOLD_ATTRIBUTES: [&str; 18] = [
    "_weights",
    "_isValid",
    "_uuid",
    "size",
    "carNumber",
    "twoWheelNumber",
    "bicycleNumber",
    "electricBicycleNumber",
    "pluginHybridCarNumber",
    "electricCarNumber",
    "hybridCarNumber",
    "category",
    "homeCarParkings",
    "incomeLevel",
    "homeOwnership",
    "contactPhoneNumber",
    "contactEmail",
    "atLeastOnePersonWithDisability",
];

const VEHICLE_COUNTS: [&str; 8] = [
    "size",
    "carNumber",
    "twoWheelNumber",
    "bicycleNumber",
    "electricBicycleNumber",
    "pluginHybridCarNumber",
    "electricCarNumber",
    "hybridCarNumber",
];

const HOUSEHOLD_COMPOSED: [&str; 6] = ["_members", "members", "_vehicles", "vehicles", "_homeUuid", "_interviewUuid"];

struct HouseholdState {
    bags: ObjectAttributes,
    registry: RegistryRef,
    members: Vec<Person>,
    vehicles: Vec<Vehicle>,
    home_uuid: Option<String>,
    interview_uuid: Option<String>,
}

survey_handle!(
    /// A household, its members and their vehicles
    Household => HouseholdState, registered
);

impl Household {
    scalar_attributes! {
        size, set_size: u64 = "size";
        car_number, set_car_number: u64 = "carNumber";
        two_wheel_number, set_two_wheel_number: u64 = "twoWheelNumber";
        bicycle_number, set_bicycle_number: u64 = "bicycleNumber";
        electric_bicycle_number, set_electric_bicycle_number: u64 = "electricBicycleNumber";
        plugin_hybrid_car_number, set_plugin_hybrid_car_number: u64 = "pluginHybridCarNumber";
        electric_car_number, set_electric_car_number: u64 = "electricCarNumber";
        hybrid_car_number, set_hybrid_car_number: u64 = "hybridCarNumber";
        category, set_category: String = "category";
        home_car_parkings, set_home_car_parkings: Vec<String> = "homeCarParkings";
        income_level, set_income_level: String = "incomeLevel";
        home_ownership, set_home_ownership: String = "homeOwnership";
        contact_phone_number, set_contact_phone_number: String = "contactPhoneNumber";
        contact_email, set_contact_email: String = "contactEmail";
        at_least_one_person_with_disability, set_at_least_one_person_with_disability: String = "atLeastOnePersonWithDisability";
    }

    composed_children! {
        members, set_members: Vec<Person>;
        vehicles, set_vehicles: Vec<Vehicle>;
    }

    reference_uuids! {
        home_uuid, set_home_uuid;
        interview_uuid, set_interview_uuid;
    }

    /// Home place, looked up in the registry
    #[must_use]
    pub fn home(&self) -> Option<Place> {
        let uuid = self.home_uuid()?;
        self.registry()?.get_place(&uuid)
    }

    /// Interview the household answered
    #[must_use]
    pub fn interview(&self) -> Option<Interview> {
        let uuid = self.interview_uuid()?;
        self.registry()?.get_interview(&uuid)
    }

    /// Append a member
    pub fn add_member(&self, member: Person) {
        self.state_mut().members.push(member);
    }

    /// Remove the member with uuid `uuid`
    pub fn remove_member(&self, uuid: &str) -> bool {
        remove_by_uuid(&mut self.state_mut().members, uuid)
    }

    /// Member with uuid `uuid`
    #[must_use]
    pub fn member_by_uuid(&self, uuid: &str) -> Option<Person> {
        find_by_uuid(&self.state().members, uuid)
    }
}

impl SurveyObject for Household {
    const DISPLAY_NAME: &'static str = "Household";
    const CONFIDENTIAL_ATTRIBUTES: &'static [&'static str] = &["contactPhoneNumber", "contactEmail"];

    fn validate_params(dirty: &Value, display_name: &str) -> Vec<ParamsError> {
        ParamsValidator::new(dirty, display_name)
            .required_object()
            .extend(uuidable::validate_params(dirty, None))
            .booleans(&["_isValid"])
            .extend(weight::validate_weights(dirty.get(weight::WEIGHTS_ATTRIBUTE)))
            .positive_integers(&VEHICLE_COUNTS)
            .strings(&["category"])
            .arrays_of_strings(&["homeCarParkings"])
            .strings(&[
                "incomeLevel",
                "homeOwnership",
                "contactPhoneNumber",
                "contactEmail",
                "atLeastOnePersonWithDisability",
            ])
            .extend(validate_children::<Person>(composed_dirty(dirty, "members"), "Person"))
            .extend(validate_children::<Vehicle>(composed_dirty(dirty, "vehicles"), "Vehicle"))
            .uuids(&["_homeUuid", "_interviewUuid"])
            .finish()
    }

    fn unserialize(params: &Params, registry: &SurveyObjectsRegistry) -> Self {
        let params = flatten_serialized_data(params);
        let household = Self::from_state(HouseholdState {
            bags: ObjectAttributes::from_params(
                &params,
                &HOUSEHOLD_ATTRIBUTES,
                &HOUSEHOLD_COMPOSED,
                Self::DISPLAY_NAME,
            ),
            registry: registry.downgrade(),
            members: initialize_composed_array_attributes(
                composed_value(&params, "members"),
                Person::unserialize,
                registry,
            ),
            vehicles: initialize_composed_array_attributes(
                composed_value(&params, "vehicles"),
                Vehicle::unserialize,
                registry,
            ),
            home_uuid: reference_uuid(&params, "_homeUuid"),
            interview_uuid: reference_uuid(&params, "_interviewUuid"),
        });
        registry.register_household(&household);
        household
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::AttributeBags;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const HOME: &str = "3e4f5a6b-7c8d-4e9f-a0b1-c2d3e4f5a6b7";

    #[test]
    fn create_valid_household() {
        let registry = SurveyObjectsRegistry::new();
        let result = Household::create(&json!({ "size": 2, "carNumber": 1 }), &registry);
        assert!(result.is_ok());
        let household = result.unwrap();
        assert_eq!(household.size(), Some(2));
        assert_eq!(household.car_number(), Some(1));
        assert!(registry.get_household(&household.uuid()).is_some());
    }

    #[test]
    fn create_rejects_negative_size() {
        let registry = SurveyObjectsRegistry::new();
        let result = Household::create(&json!({ "size": -1 }), &registry);
        assert!(result.has_errors());
        assert!(result.errors().iter().any(|error| error.is_for("size")));
        assert!(registry.is_empty());
    }

    #[test]
    fn create_rejects_non_object() {
        let registry = SurveyObjectsRegistry::new();
        let result = Household::create(&json!("household"), &registry);
        assert_eq!(
            result.errors().iter().map(ToString::to_string).collect::<Vec<_>>(),
            vec!["Household validateParams: params should be an object".to_string()]
        );
    }

    #[test]
    fn members_vehicles_and_home() {
        let registry = SurveyObjectsRegistry::new();
        let params = json!({
            "_members": [{ "age": 40 }, { "age": 8 }],
            "vehicles": [{ "make": "Honda" }],
            "_homeUuid": HOME,
            "homeCarParkings": ["driveway", "street"]
        });
        let household = Household::unserialize(params.as_object().unwrap_or(&Params::new()), &registry);
        assert_eq!(household.members().len(), 2);
        assert_eq!(household.vehicles().len(), 1);
        assert_eq!(
            household.home_car_parkings(),
            Some(vec!["driveway".to_string(), "street".to_string()])
        );
        assert!(household.home().is_none());
        let home = Place::unserialize(json!({ "_uuid": HOME }).as_object().unwrap_or(&Params::new()), &registry);
        assert!(household.home().is_some_and(|found| found.ptr_eq(&home)));
        assert!(household.interview().is_none());
    }

    #[test]
    fn member_management() {
        let registry = SurveyObjectsRegistry::new();
        let household = Household::unserialize(&Params::new(), &registry);
        let member = Person::unserialize(&Params::new(), &registry);
        household.add_member(member.clone());
        assert!(household.member_by_uuid(&member.uuid()).is_some_and(|found| found.ptr_eq(&member)));
        assert!(household.remove_member(&member.uuid()));
        assert!(!household.remove_member(&member.uuid()));
        assert!(household.members().is_empty());
    }

    #[test]
    fn contacts_are_confidential() {
        let registry = SurveyObjectsRegistry::new();
        let params = json!({ "size": 3, "contactEmail": "home@example.org", "contactPhoneNumber": "555-0100" });
        let household = Household::unserialize(params.as_object().unwrap_or(&Params::new()), &registry);
        let exported = household.export_attributes(false);
        assert!(!exported.contains_key("contactEmail"));
        assert!(!exported.contains_key("contactPhoneNumber"));
        assert!(exported.contains_key("size"));
        assert_eq!(household.export_attributes(true).len(), household.attributes().len());
    }

    #[test]
    fn validate_params_order() {
        let errors = Household::validate_params(
            &json!({
                "_uuid": "x",
                "bicycleNumber": 1.5,
                "homeCarParkings": "street",
                "incomeLevel": 3,
                "_members": [{}, { "age": "old" }],
                "_vehicles": [{ "modelYear": "new" }],
                "_interviewUuid": 1
            }),
            "Household",
        );
        let described: Vec<(String, String)> = errors
            .into_iter()
            .map(|error| (error.display_name, error.field))
            .collect();
        assert_eq!(
            described,
            vec![
                ("Uuidable".to_string(), "_uuid".to_string()),
                ("Household".to_string(), "bicycleNumber".to_string()),
                ("Household".to_string(), "homeCarParkings".to_string()),
                ("Household".to_string(), "incomeLevel".to_string()),
                ("Person 1".to_string(), "age".to_string()),
                ("Vehicle 0".to_string(), "modelYear".to_string()),
                ("Household".to_string(), "_interviewUuid".to_string()),
            ]
        );
    }
}
