//! Places and their postal addresses
//!
//! A [`Place`] is a geolocated location (home, work place, shop...). Its
//! optional [`Address`] is a composed value that is never registered.

use crate::geography;
use crate::object::{composed_dirty, validate_child, ObjectAttributes, SurveyObject};
use crate::registry::{RegistryRef, SurveyObjectsRegistry};
use serde_json::Value;
use survey_core::constructor::{composed_value, flatten_serialized_data};
use survey_core::groups::{uuidable, weight};
use survey_core::{initialize_composed_attribute, validators, Params, ParamsError, ParamsValidator};

/// Known place attributes
pub const PLACE_ATTRIBUTES: [&str; 19] = [
    "_weights",
    "_isValid",
    "_uuid",
    "geography",
    "name",
    "shortname",
    "osmId",
    "propertyRegistryId",
    "buildingId",
    "internalId",
    "parkingType",
    "parkingFeeType",
    "geocodingPrecisionCategory",
    "geocodingPrecisionMeters",
    "geocodingQueryString",
    "geocodingName",
    "lastAction",
    "deviceUsed",
    "zoom",
];

const PLACE_COMPOSED: [&str; 2] = ["_address", "address"];

const PLACE_STRINGS: [&str; 13] = [
    "name",
    "shortname",
    "osmId",
    "propertyRegistryId",
    "buildingId",
    "internalId",
    "parkingType",
    "parkingFeeType",
    "geocodingPrecisionCategory",
    "geocodingQueryString",
    "geocodingName",
    "lastAction",
    "deviceUsed",
];

/// Known address attributes
pub const ADDRESS_ATTRIBUTES: [&str; 15] = [
    "_uuid",
    "_isValid",
    "civicNumber",
    "civicNumberSuffix",
    "unitNumber",
    "streetName",
    "streetNameHomogenized",
    "streetNameId",
    "municipalityName",
    "municipalityCode",
    "postalMunicipalityName",
    "region",
    "country",
    "postalCode",
    "addressId",
];

struct PlaceState {
    bags: ObjectAttributes,
    registry: RegistryRef,
    address: Option<Address>,
}

survey_handle!(
    /// A geolocated place
    Place => PlaceState, registered
);

impl Place {
    scalar_attributes! {
        geography, set_geography: Value = "geography";
        name, set_name: String = "name";
        shortname, set_shortname: String = "shortname";
        osm_id, set_osm_id: String = "osmId";
        property_registry_id, set_property_registry_id: String = "propertyRegistryId";
        building_id, set_building_id: String = "buildingId";
        internal_id, set_internal_id: String = "internalId";
        parking_type, set_parking_type: String = "parkingType";
        parking_fee_type, set_parking_fee_type: String = "parkingFeeType";
        geocoding_precision_category, set_geocoding_precision_category: String = "geocodingPrecisionCategory";
        geocoding_precision_meters, set_geocoding_precision_meters: f64 = "geocodingPrecisionMeters";
        geocoding_query_string, set_geocoding_query_string: String = "geocodingQueryString";
        geocoding_name, set_geocoding_name: String = "geocodingName";
        last_action, set_last_action: String = "lastAction";
        device_used, set_device_used: String = "deviceUsed";
        zoom, set_zoom: u64 = "zoom";
    }

    composed_children! {
        address, set_address: Option<Address>;
    }

    /// `None` without geography, otherwise whether it is a GeoJSON point feature
    #[must_use]
    pub fn geography_is_valid(&self) -> Option<bool> {
        self.geography().map(|geography| validators::is_point_feature(&geography))
    }

    /// `(longitude, latitude)` of a valid point geography
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.geography().as_ref().and_then(geography::point_coordinates)
    }
}

impl SurveyObject for Place {
    const DISPLAY_NAME: &'static str = "Place";

    fn validate_params(dirty: &Value, display_name: &str) -> Vec<ParamsError> {
        ParamsValidator::new(dirty, display_name)
            .required_object()
            .extend(uuidable::validate_params(dirty, None))
            .booleans(&["_isValid"])
            .extend(weight::validate_weights(dirty.get(weight::WEIGHTS_ATTRIBUTE)))
            .geojson_points(&["geography"])
            .strings(&PLACE_STRINGS[..9])
            .positive_numbers(&["geocodingPrecisionMeters"])
            .strings(&PLACE_STRINGS[9..])
            .positive_integers(&["zoom"])
            .extend(validate_child::<Address>(composed_dirty(dirty, "address"), "Address"))
            .finish()
    }

    fn unserialize(params: &Params, registry: &SurveyObjectsRegistry) -> Self {
        let params = flatten_serialized_data(params);
        let place = Self::from_state(PlaceState {
            bags: ObjectAttributes::from_params(&params, &PLACE_ATTRIBUTES, &PLACE_COMPOSED, Self::DISPLAY_NAME),
            registry: registry.downgrade(),
            address: initialize_composed_attribute(composed_value(&params, "address"), Address::unserialize, registry),
        });
        registry.register_place(&place);
        place
    }
}

struct AddressState {
    bags: ObjectAttributes,
}

survey_handle!(
    /// Postal address of a place
    Address => AddressState
);

impl Address {
    scalar_attributes! {
        civic_number, set_civic_number: u64 = "civicNumber";
        civic_number_suffix, set_civic_number_suffix: String = "civicNumberSuffix";
        unit_number, set_unit_number: String = "unitNumber";
        street_name, set_street_name: String = "streetName";
        street_name_homogenized, set_street_name_homogenized: String = "streetNameHomogenized";
        street_name_id, set_street_name_id: String = "streetNameId";
        municipality_name, set_municipality_name: String = "municipalityName";
        municipality_code, set_municipality_code: String = "municipalityCode";
        postal_municipality_name, set_postal_municipality_name: String = "postalMunicipalityName";
        region, set_region: String = "region";
        country, set_country: String = "country";
        postal_code, set_postal_code: String = "postalCode";
        address_id, set_address_id: String = "addressId";
    }
}

impl SurveyObject for Address {
    const DISPLAY_NAME: &'static str = "Address";

    fn validate_params(dirty: &Value, display_name: &str) -> Vec<ParamsError> {
        ParamsValidator::new(dirty, display_name)
            .required_object()
            .extend(uuidable::validate_params(dirty, None))
            .booleans(&["_isValid"])
            .positive_integers(&["civicNumber"])
            .strings(&["civicNumberSuffix", "unitNumber"])
            .non_empty_strings(&["streetName"])
            .strings(&["streetNameHomogenized", "streetNameId"])
            .non_empty_strings(&["municipalityName"])
            .strings(&["municipalityCode", "postalMunicipalityName"])
            .non_empty_strings(&["region", "country"])
            .strings(&["postalCode", "addressId"])
            .finish()
    }

    fn unserialize(params: &Params, _registry: &SurveyObjectsRegistry) -> Self {
        let params = flatten_serialized_data(params);
        Self::from_state(AddressState {
            bags: ObjectAttributes::from_params(&params, &ADDRESS_ATTRIBUTES, &[], Self::DISPLAY_NAME),
        })
    }
}
