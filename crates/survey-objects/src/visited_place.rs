//! Visited places: a place where an activity happened during a journey

use crate::household::Household;
use crate::journey::Journey;
use crate::object::{composed_dirty, reference_uuid, validate_child, ObjectAttributes, SurveyObject};
use crate::person::Person;
use crate::place::Place;
use crate::registry::{RegistryRef, SurveyObjectsRegistry};
use serde_json::Value;
use survey_core::constructor::{composed_value, flatten_serialized_data};
use survey_core::groups::{start_endable, uuidable, weight};
use survey_core::{initialize_composed_attribute, Params, ParamsError, ParamsErrorKind, ParamsValidator};

/// Known visited place attributes
pub const VISITED_PLACE_ATTRIBUTES: [&str; 14] = [
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
    "activity",
    "activityCategory",
    "shortcut",
    "preData",
];

const VISITED_PLACE_COMPOSED: [&str; 3] = ["_place", "place", "_journeyUuid"];

struct VisitedPlaceState {
    bags: ObjectAttributes,
    registry: RegistryRef,
    place: Option<Place>,
    journey_uuid: Option<String>,
}

survey_handle!(
    /// A place visited for an activity (home, work, shopping...)
    VisitedPlace => VisitedPlaceState, registered
);

impl VisitedPlace {
    scalar_attributes! {
        start_date, set_start_date: String = "startDate";
        start_time, set_start_time: u64 = "startTime";
        start_time_period, set_start_time_period: String = "startTimePeriod";
        end_date, set_end_date: String = "endDate";
        end_time, set_end_time: u64 = "endTime";
        end_time_period, set_end_time_period: String = "endTimePeriod";
        sequence, set_sequence: u64 = "_sequence";
        activity, set_activity: String = "activity";
        activity_category, set_activity_category: String = "activityCategory";
        shortcut, set_shortcut: String = "shortcut";
        pre_data, set_pre_data: Params = "preData";
    }

    composed_children! {
        place, set_place: Option<Place>;
    }

    reference_uuids! {
        journey_uuid, set_journey_uuid;
    }

    /// Geography of the composed place
    #[must_use]
    pub fn geography(&self) -> Option<Value> {
        self.place()?.geography()
    }

    /// Name of the composed place
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.place()?.name()
    }

    /// Journey this place was visited in
    #[must_use]
    pub fn journey(&self) -> Option<Journey> {
        let uuid = self.journey_uuid()?;
        self.registry()?.get_journey(&uuid)
    }

    /// Person who visited the place, through the journey
    #[must_use]
    pub fn person(&self) -> Option<Person> {
        self.journey()?.person()
    }

    /// Household of the person who visited the place
    #[must_use]
    pub fn household(&self) -> Option<Household> {
        self.person()?.household()
    }
}

impl SurveyObject for VisitedPlace {
    const DISPLAY_NAME: &'static str = "VisitedPlace";
    const CONFIDENTIAL_ATTRIBUTES: &'static [&'static str] = &["preData"];

    fn validate_params(dirty: &Value, display_name: &str) -> Vec<ParamsError> {
        let validator = ParamsValidator::new(dirty, display_name)
            .required_object()
            .extend(uuidable::validate_params(dirty, None))
            .booleans(&["_isValid"])
            .extend(weight::validate_weights(dirty.get(weight::WEIGHTS_ATTRIBUTE)))
            .extend(start_endable::validate_params(dirty, Some(display_name)))
            .positive_integers(&["_sequence"])
            .strings(&["activity", "activityCategory"])
            .uuids(&["shortcut"])
            .objects(&["preData"]);

        let uuid = dirty.get(uuidable::UUID_ATTRIBUTE).and_then(Value::as_str);
        let shortcut = dirty.get("shortcut").and_then(Value::as_str);
        let self_reference = match (uuid, shortcut) {
            (Some(uuid), Some(shortcut)) if uuid == shortcut => Some(ParamsError::new(
                display_name,
                "shortcut",
                ParamsErrorKind::SelfReference,
            )),
            _ => None,
        };

        validator
            .extend(self_reference)
            .extend(validate_child::<Place>(composed_dirty(dirty, "place"), "VisitedPlace Place"))
            .uuids(&["_journeyUuid"])
            .finish()
    }

    fn unserialize(params: &Params, registry: &SurveyObjectsRegistry) -> Self {
        let params = flatten_serialized_data(params);
        let visited_place = Self::from_state(VisitedPlaceState {
            bags: ObjectAttributes::from_params(
                &params,
                &VISITED_PLACE_ATTRIBUTES,
                &VISITED_PLACE_COMPOSED,
                Self::DISPLAY_NAME,
            ),
            registry: registry.downgrade(),
            place: initialize_composed_attribute(composed_value(&params, "place"), Place::unserialize, registry),
            journey_uuid: reference_uuid(&params, "_journeyUuid"),
        });
        registry.register_visited_place(&visited_place);
        visited_place
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const VISIT: &str = "5a1f7c3e-8d2b-4e6f-9a0c-1b2d3e4f5a6b";

    #[test]
    fn delegates_geography_and_name_to_place() {
        let registry = SurveyObjectsRegistry::new();
        let params = json!({
            "activity": "workUsual",
            "_place": {
                "name": "Office",
                "geography": { "type": "Feature", "geometry": { "type": "Point", "coordinates": [-73.5, 45.4] }, "properties": {} }
            }
        });
        let visited_place = VisitedPlace::unserialize(params.as_object().unwrap_or(&Params::new()), &registry);
        assert_eq!(visited_place.activity().as_deref(), Some("workUsual"));
        assert_eq!(visited_place.name().as_deref(), Some("Office"));
        assert!(visited_place.geography().is_some());
        assert!(visited_place.journey().is_none());
        assert!(visited_place.household().is_none());
    }

    #[test]
    fn shortcut_cannot_reference_itself() {
        let errors = VisitedPlace::validate_params(&json!({ "_uuid": VISIT, "shortcut": VISIT }), "VisitedPlace");
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "VisitedPlace validateParams: shortcut cannot reference itself"
        );
    }

    #[test]
    fn pre_data_must_be_an_object() {
        let errors = VisitedPlace::validate_params(&json!({ "preData": [1, 2] }), "StartVisitedPlace");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].display_name, "StartVisitedPlace");
        assert!(errors[0].is_for("preData"));
    }

    #[test]
    fn pre_data_is_confidential() {
        let registry = SurveyObjectsRegistry::new();
        let params = json!({ "preData": { "source": "previous wave" }, "activity": "shopping" });
        let visited_place = VisitedPlace::unserialize(params.as_object().unwrap_or(&Params::new()), &registry);
        assert!(visited_place.pre_data().is_some());
        assert!(!visited_place.export_attributes(false).contains_key("preData"));
    }
}
