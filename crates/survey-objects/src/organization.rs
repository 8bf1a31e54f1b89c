//! Organizations surveyed alongside or instead of households

use crate::interview::Interview;
use crate::object::{composed_dirty, reference_uuid, validate_children_named, ObjectAttributes, SurveyObject};
use crate::place::Place;
use crate::registry::{RegistryRef, SurveyObjectsRegistry};
use crate::vehicle::Vehicle;
use serde_json::Value;
use survey_core::constructor::{composed_value, flatten_serialized_data};
use survey_core::groups::{uuidable, weight};
use survey_core::{initialize_composed_array_attributes, Params, ParamsError, ParamsValidator};

/// Known organization attributes
pub const ORGANIZATION_ATTRIBUTES: [&str; 12] = [
    "_weights",
    "_isValid",
    "_uuid",
    "name",
    "shortname",
    "numberOfEmployees",
    "category",
    "contactFirstName",
    "contactLastName",
    "contactPhoneNumber",
    "contactEmail",
    "revenueLevel",
];

const ORGANIZATION_COMPOSED: [&str; 5] = ["_vehicles", "vehicles", "_places", "places", "_interviewUuid"];

struct OrganizationState {
    bags: ObjectAttributes,
    registry: RegistryRef,
    vehicles: Vec<Vehicle>,
    places: Vec<Place>,
    interview_uuid: Option<String>,
}

survey_handle!(
    /// A company or institution, with its fleet and sites
    Organization => OrganizationState, registered
);

impl Organization {
    scalar_attributes! {
        name, set_name: String = "name";
        shortname, set_shortname: String = "shortname";
        number_of_employees, set_number_of_employees: u64 = "numberOfEmployees";
        category, set_category: String = "category";
        contact_first_name, set_contact_first_name: String = "contactFirstName";
        contact_last_name, set_contact_last_name: String = "contactLastName";
        contact_phone_number, set_contact_phone_number: String = "contactPhoneNumber";
        contact_email, set_contact_email: String = "contactEmail";
        revenue_level, set_revenue_level: String = "revenueLevel";
    }

    composed_children! {
        vehicles, set_vehicles: Vec<Vehicle>;
        places, set_places: Vec<Place>;
    }

    reference_uuids! {
        interview_uuid, set_interview_uuid;
    }

    /// Interview the organization answered
    #[must_use]
    pub fn interview(&self) -> Option<Interview> {
        let uuid = self.interview_uuid()?;
        self.registry()?.get_interview(&uuid)
    }
}

impl SurveyObject for Organization {
    const DISPLAY_NAME: &'static str = "Organization";
    const CONFIDENTIAL_ATTRIBUTES: &'static [&'static str] = &["contactPhoneNumber", "contactEmail"];

    fn validate_params(dirty: &Value, display_name: &str) -> Vec<ParamsError> {
        ParamsValidator::new(dirty, display_name)
            .required_object()
            .extend(uuidable::validate_params(dirty, None))
            .booleans(&["_isValid"])
            .extend(weight::validate_weights(dirty.get(weight::WEIGHTS_ATTRIBUTE)))
            .strings(&["name", "shortname"])
            .positive_integers(&["numberOfEmployees"])
            .strings(&[
                "category",
                "contactFirstName",
                "contactLastName",
                "contactPhoneNumber",
                "contactEmail",
                "revenueLevel",
            ])
            .extend(validate_children_named::<Vehicle>(composed_dirty(dirty, "vehicles"), "Vehicle"))
            .extend(validate_children_named::<Place>(composed_dirty(dirty, "places"), "Place"))
            .uuids(&["_interviewUuid"])
            .finish()
    }

    fn unserialize(params: &Params, registry: &SurveyObjectsRegistry) -> Self {
        let params = flatten_serialized_data(params);
        let organization = Self::from_state(OrganizationState {
            bags: ObjectAttributes::from_params(
                &params,
                &ORGANIZATION_ATTRIBUTES,
                &ORGANIZATION_COMPOSED,
                Self::DISPLAY_NAME,
            ),
            registry: registry.downgrade(),
            vehicles: initialize_composed_array_attributes(
                composed_value(&params, "vehicles"),
                Vehicle::unserialize,
                registry,
            ),
            places: initialize_composed_array_attributes(composed_value(&params, "places"), Place::unserialize, registry),
            interview_uuid: reference_uuid(&params, "_interviewUuid"),
        });
        registry.register_organization(&organization);
        organization
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::AttributeBags;
    use serde_json::json;

    const ORGANIZATION: &str = "6b7c8d9e-0f1a-4b2c-9d3e-4f5a6b7c8d9e";

    #[test]
    fn fleet_points_back_to_organization() {
        let registry = SurveyObjectsRegistry::new();
        let params = json!({
            "_uuid": ORGANIZATION,
            "name": "Transit Co",
            "numberOfEmployees": 120,
            "_vehicles": [{ "_uuid": "bus-1", "_organizationUuid": ORGANIZATION }],
            "places": [{ "name": "Garage" }]
        });
        let organization = Organization::unserialize(params.as_object().unwrap_or(&Params::new()), &registry);
        assert_eq!(organization.number_of_employees(), Some(120));
        assert_eq!(organization.places().len(), 1);
        let bus = registry.get_vehicle("bus-1");
        assert!(bus
            .and_then(|bus| bus.organization())
            .is_some_and(|found| found.ptr_eq(&organization)));
        assert!(organization.interview().is_none());
    }

    #[test]
    fn nested_errors_use_plain_names() {
        let errors = Organization::validate_params(
            &json!({
                "numberOfEmployees": "many",
                "revenueLevel": 2,
                "_vehicles": [{ "isElectric": 1 }, { "isHybrid": 0 }],
                "_places": [{ "zoom": -2 }]
            }),
            "Organization",
        );
        let described: Vec<String> = errors.iter().map(ToString::to_string).collect();
        assert_eq!(
            described,
            vec![
                "Organization validateParams: numberOfEmployees should be a positive integer",
                "Organization validateParams: revenueLevel should be a string",
                "Vehicle validateParams: isElectric should be a boolean",
                "Vehicle validateParams: isHybrid should be a boolean",
                "Place validateParams: zoom should be a positive integer",
            ]
        );
    }

    #[test]
    fn contact_details_are_confidential() {
        let registry = SurveyObjectsRegistry::new();
        let params = json!({ "contactEmail": "fleet@example.org", "contactFirstName": "Ada" });
        let organization = Organization::unserialize(params.as_object().unwrap_or(&Params::new()), &registry);
        let exported = organization.export_attributes(false);
        assert!(!exported.contains_key("contactEmail"));
        assert!(exported.contains_key("contactFirstName"));
    }
}
