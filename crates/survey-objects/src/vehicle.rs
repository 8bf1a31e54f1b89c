//! Vehicles owned by a person, a household or an organization

use crate::object::{reference_uuid, ObjectAttributes, SurveyObject};
use crate::organization::Organization;
use crate::person::Person;
use crate::registry::{RegistryRef, SurveyObjectsRegistry};
use serde_json::Value;
use survey_core::constructor::flatten_serialized_data;
use survey_core::groups::{uuidable, weight};
use survey_core::{Params, ParamsError, ParamsValidator};

/// Known vehicle attributes
pub const VEHICLE_ATTRIBUTES: [&str; 16] = [
    "_weights",
    "_isValid",
    "_uuid",
    "make",
    "model",
    "type",
    "capacitySeated",
    "capacityStanding",
    "modelYear",
    "isElectric",
    "isPluginHybrid",
    "isHybrid",
    "isHydrogen",
    "acquiredYear",
    "licensePlateNumber",
    "internalId",
];

const VEHICLE_REFERENCES: [&str; 2] = ["_ownerUuid", "_organizationUuid"];

struct VehicleState {
    bags: ObjectAttributes,
    registry: RegistryRef,
    owner_uuid: Option<String>,
    organization_uuid: Option<String>,
}

survey_handle!(
    /// A car, bicycle or any other vehicle
    Vehicle => VehicleState, registered
);

impl Vehicle {
    scalar_attributes! {
        make, set_make: String = "make";
        model, set_model: String = "model";
        vehicle_type, set_vehicle_type: String = "type";
        capacity_seated, set_capacity_seated: u64 = "capacitySeated";
        capacity_standing, set_capacity_standing: u64 = "capacityStanding";
        model_year, set_model_year: u64 = "modelYear";
        is_electric, set_is_electric: bool = "isElectric";
        is_plugin_hybrid, set_is_plugin_hybrid: bool = "isPluginHybrid";
        is_hybrid, set_is_hybrid: bool = "isHybrid";
        is_hydrogen, set_is_hydrogen: bool = "isHydrogen";
        acquired_year, set_acquired_year: u64 = "acquiredYear";
        license_plate_number, set_license_plate_number: String = "licensePlateNumber";
        internal_id, set_internal_id: String = "internalId";
    }

    reference_uuids! {
        owner_uuid, set_owner_uuid;
        organization_uuid, set_organization_uuid;
    }

    /// Owning person, looked up in the registry
    #[must_use]
    pub fn owner(&self) -> Option<Person> {
        let uuid = self.owner_uuid()?;
        self.registry()?.get_person(&uuid)
    }

    /// Owning organization, looked up in the registry
    #[must_use]
    pub fn organization(&self) -> Option<Organization> {
        let uuid = self.organization_uuid()?;
        self.registry()?.get_organization(&uuid)
    }
}

impl SurveyObject for Vehicle {
    const DISPLAY_NAME: &'static str = "Vehicle";
    const CONFIDENTIAL_ATTRIBUTES: &'static [&'static str] = &["licensePlateNumber", "internalId"];

    fn validate_params(dirty: &Value, display_name: &str) -> Vec<ParamsError> {
        ParamsValidator::new(dirty, display_name)
            .required_object()
            .extend(uuidable::validate_params(dirty, None))
            .booleans(&["_isValid"])
            .extend(weight::validate_weights(dirty.get(weight::WEIGHTS_ATTRIBUTE)))
            .strings(&["make", "model", "type"])
            .positive_integers(&["capacitySeated", "capacityStanding", "modelYear"])
            .booleans(&["isElectric", "isPluginHybrid", "isHybrid", "isHydrogen"])
            .positive_integers(&["acquiredYear"])
            .strings(&["licensePlateNumber", "internalId"])
            .uuids(&VEHICLE_REFERENCES)
            .finish()
    }

    fn unserialize(params: &Params, registry: &SurveyObjectsRegistry) -> Self {
        let params = flatten_serialized_data(params);
        let vehicle = Self::from_state(VehicleState {
            bags: ObjectAttributes::from_params(&params, &VEHICLE_ATTRIBUTES, &VEHICLE_REFERENCES, Self::DISPLAY_NAME),
            registry: registry.downgrade(),
            owner_uuid: reference_uuid(&params, "_ownerUuid"),
            organization_uuid: reference_uuid(&params, "_organizationUuid"),
        });
        registry.register_vehicle(&vehicle);
        vehicle
    }
}
