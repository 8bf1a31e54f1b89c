//! Interviews and their paradata
//!
//! An interview carries reviewing flags, respondent feedback and the
//! paradata collected while the questionnaire was filled. Older payloads
//! keep paradata in flat `_startedAt`, `_language`, ... keys; they are
//! folded into [`InterviewParadata`] when no `_paradata` object is given.

use crate::attribute_types::YES_NO_DONT_KNOW_VALUES;
use crate::object::{composed_dirty, ObjectAttributes, SurveyObject};
use crate::registry::{RegistryRef, SurveyObjectsRegistry};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use survey_core::constructor::{composed_value, flatten_serialized_data};
use survey_core::groups::uuidable;
use survey_core::params::{get_attribute, set_attribute};
use survey_core::validators::{is_positive_integer, is_string};
use survey_core::{Params, ParamsError, ParamsValidator};

/// Known interview attributes
pub const INTERVIEW_ATTRIBUTES: [&str; 24] = [
    "_uuid",
    "_id",
    "_participant_id",
    "_isValid",
    "_isCompleted",
    "_isQuestionable",
    "_isValidated",
    "accessCode",
    "assignedDate",
    "contactPhoneNumber",
    "helpContactPhoneNumber",
    "contactEmail",
    "helpContactEmail",
    "acceptToBeContactedForHelp",
    "wouldLikeToParticipateInOtherSurveys",
    "respondentComments",
    "interviewerComments",
    "auditorComments",
    "durationRange",
    "durationRespondentEstimationMin",
    "interestRange",
    "difficultyRange",
    "burdenRange",
    "consideredAbandoning",
];

// Paradata, either composed or as legacy flat keys
const INTERVIEW_COMPOSED: [&str; 11] = [
    "_paradata",
    "paradata",
    "_language",
    "_languages",
    "_browser",
    "_startedAt",
    "_updatedAt",
    "_completedAt",
    "_source",
    "_personRandomSequence",
    "_sections",
];

const RANGES: [&str; 5] = [
    "durationRange",
    "durationRespondentEstimationMin",
    "interestRange",
    "difficultyRange",
    "burdenRange",
];

/// Known paradata attributes
pub const PARADATA_ATTRIBUTES: [&str; 8] = [
    "startedAt",
    "updatedAt",
    "completedAt",
    "source",
    "personsRandomSequence",
    "languages",
    "browsers",
    "sections",
];

/// A language the questionnaire was displayed in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewLanguage {
    /// Language code
    pub language: String,
    /// When the respondent switched to this language
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_timestamp: Option<u64>,
    /// When the respondent switched away
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_timestamp: Option<u64>,
}

/// Data about how the interview was filled, not answers themselves
///
/// A plain value: it is neither registered nor given a uuid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterviewParadata {
    attributes: Params,
}

impl InterviewParadata {
    /// Display name used in validation errors
    pub const DISPLAY_NAME: &'static str = "InterviewParadata";

    /// Everything but `source` is confidential
    pub const CONFIDENTIAL_ATTRIBUTES: [&'static str; 7] = [
        "startedAt",
        "updatedAt",
        "completedAt",
        "personsRandomSequence",
        "languages",
        "browsers",
        "sections",
    ];

    /// Build from sanitized params, unknown keys are dropped
    #[must_use]
    pub fn new(params: &Params) -> Self {
        let attributes = params
            .iter()
            .filter(|(key, _)| PARADATA_ATTRIBUTES.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Self { attributes }
    }

    /// Paradata from the legacy flat interview keys, `None` if there are none
    #[must_use]
    pub fn from_legacy_params(params: &Params) -> Option<Self> {
        let mut extracted = Params::new();
        if let Some(language) = params.get("_language").filter(|value| truthy(value)) {
            extracted.insert("languages".to_owned(), serde_json::json!([{ "language": language }]));
        }
        if let Some(browser) = params.get("_browser").filter(|value| truthy(value)) {
            extracted.insert("browsers".to_owned(), Value::Array(vec![browser.clone()]));
        }
        for (legacy, key) in [
            ("_startedAt", "startedAt"),
            ("_updatedAt", "updatedAt"),
            ("_completedAt", "completedAt"),
            ("_source", "source"),
            ("_personRandomSequence", "personsRandomSequence"),
            ("_sections", "sections"),
        ] {
            if let Some(value) = params.get(legacy).filter(|value| !value.is_null()) {
                extracted.insert(key.to_owned(), value.clone());
            }
        }
        (!extracted.is_empty()).then(|| Self { attributes: extracted })
    }

    /// Copy of the attributes
    #[must_use]
    pub fn attributes(&self) -> Params {
        self.attributes.clone()
    }

    /// Start timestamp, in seconds
    #[must_use]
    pub fn started_at(&self) -> Option<u64> {
        get_attribute(&self.attributes, "startedAt")
    }

    /// Set or clear the start timestamp
    pub fn set_started_at(&mut self, value: Option<u64>) {
        set_attribute(&mut self.attributes, "startedAt", value);
    }

    /// Last update timestamp, in seconds
    #[must_use]
    pub fn updated_at(&self) -> Option<u64> {
        get_attribute(&self.attributes, "updatedAt")
    }

    /// Set or clear the last update timestamp
    pub fn set_updated_at(&mut self, value: Option<u64>) {
        set_attribute(&mut self.attributes, "updatedAt", value);
    }

    /// Completion timestamp, in seconds
    #[must_use]
    pub fn completed_at(&self) -> Option<u64> {
        get_attribute(&self.attributes, "completedAt")
    }

    /// Set or clear the completion timestamp
    pub fn set_completed_at(&mut self, value: Option<u64>) {
        set_attribute(&mut self.attributes, "completedAt", value);
    }

    /// Where the interview came from (web, phone, import, ...)
    #[must_use]
    pub fn source(&self) -> Option<String> {
        get_attribute(&self.attributes, "source")
    }

    /// Set or clear the source
    pub fn set_source(&mut self, value: Option<String>) {
        set_attribute(&mut self.attributes, "source", value);
    }

    /// Person uuids in the random order they were asked about
    #[must_use]
    pub fn persons_random_sequence(&self) -> Option<Vec<String>> {
        get_attribute(&self.attributes, "personsRandomSequence")
    }

    /// Languages used, empty when absent; malformed entries are skipped
    #[must_use]
    pub fn languages(&self) -> Vec<InterviewLanguage> {
        self.attributes
            .get("languages")
            .and_then(Value::as_array)
            .map(|languages| {
                languages
                    .iter()
                    .filter_map(|language| serde_json::from_value(language.clone()).ok())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Browser descriptions, empty when absent
    #[must_use]
    pub fn browsers(&self) -> Vec<Value> {
        self.attributes
            .get("browsers")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }

    /// Per-section navigation data, empty when absent
    #[must_use]
    pub fn sections(&self) -> Params {
        get_attribute(&self.attributes, "sections").unwrap_or_default()
    }

    /// Attributes for export, without confidential ones unless asked
    #[must_use]
    pub fn export_attributes(&self, include_confidential: bool) -> Params {
        let mut attributes = self.attributes();
        if !include_confidential {
            for key in Self::CONFIDENTIAL_ATTRIBUTES {
                attributes.remove(key);
            }
        }
        attributes
    }

    /// Validate untrusted paradata params
    #[must_use]
    pub fn validate_params(dirty: &Value, display_name: &str) -> Vec<ParamsError> {
        let mut errors = ParamsValidator::new(dirty, display_name)
            .required_object()
            .positive_integers(&["startedAt", "updatedAt", "completedAt"])
            .strings(&["source"])
            .arrays_of_strings(&["personsRandomSequence"])
            .finish();

        errors.extend(survey_core::validators::is_array(
            "languages",
            dirty.get("languages"),
            display_name,
        ));
        for (index, language) in items(dirty.get("languages")).enumerate() {
            let field = |name: &str| format!("languages.[{index}].{name}");
            errors.extend(is_string(&field("language"), language.get("language"), display_name));
            errors.extend(is_positive_integer(
                &field("startTimestamp"),
                language.get("startTimestamp"),
                display_name,
            ));
            errors.extend(is_positive_integer(
                &field("endTimestamp"),
                language.get("endTimestamp"),
                display_name,
            ));
        }

        errors.extend(survey_core::validators::is_array(
            "browsers",
            dirty.get("browsers"),
            display_name,
        ));
        for (index, browser) in items(dirty.get("browsers")).enumerate() {
            let field = |name: &str| format!("browsers.[{index}].{name}");
            errors.extend(is_string(&field("ua"), browser.get("ua"), display_name));
            for (group, keys) in [
                ("browser", &["name", "version"][..]),
                ("engine", &["name", "version"][..]),
                ("os", &["name", "version", "versionName"][..]),
                ("platform", &["model", "type", "vendor"][..]),
            ] {
                let Some(details) = browser.get(group).filter(|value| truthy(value)) else {
                    continue;
                };
                for key in keys {
                    errors.extend(is_string(&field(&format!("{group}.{key}")), details.get(*key), display_name));
                }
            }
            errors.extend(is_positive_integer(
                &field("startTimestamp"),
                browser.get("startTimestamp"),
                display_name,
            ));
            errors.extend(is_positive_integer(
                &field("endTimestamp"),
                browser.get("endTimestamp"),
                display_name,
            ));
        }
        errors
    }
}

fn items(value: Option<&Value>) -> impl Iterator<Item = &Value> {
    value.and_then(Value::as_array).into_iter().flatten()
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::String(text) => !text.is_empty(),
        Value::Number(number) => number.as_f64().is_some_and(|number| number != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

struct InterviewState {
    bags: ObjectAttributes,
    registry: RegistryRef,
    paradata: Option<InterviewParadata>,
}

survey_handle!(
    /// One respondent's interview, with reviewing flags and paradata
    Interview => InterviewState, registered
);

impl Interview {
    scalar_attributes! {
        id, set_id: u64 = "_id";
        participant_id, set_participant_id: u64 = "_participant_id";
        is_completed, set_is_completed: bool = "_isCompleted";
        is_questionable, set_is_questionable: bool = "_isQuestionable";
        is_validated, set_is_validated: bool = "_isValidated";
        access_code, set_access_code: String = "accessCode";
        assigned_date, set_assigned_date: String = "assignedDate";
        contact_phone_number, set_contact_phone_number: String = "contactPhoneNumber";
        help_contact_phone_number, set_help_contact_phone_number: String = "helpContactPhoneNumber";
        contact_email, set_contact_email: String = "contactEmail";
        help_contact_email, set_help_contact_email: String = "helpContactEmail";
        accept_to_be_contacted_for_help, set_accept_to_be_contacted_for_help: bool = "acceptToBeContactedForHelp";
        would_like_to_participate_in_other_surveys, set_would_like_to_participate_in_other_surveys: bool = "wouldLikeToParticipateInOtherSurveys";
        respondent_comments, set_respondent_comments: String = "respondentComments";
        interviewer_comments, set_interviewer_comments: String = "interviewerComments";
        auditor_comments, set_auditor_comments: String = "auditorComments";
        duration_range, set_duration_range: u64 = "durationRange";
        duration_respondent_estimation_min, set_duration_respondent_estimation_min: u64 = "durationRespondentEstimationMin";
        interest_range, set_interest_range: u64 = "interestRange";
        difficulty_range, set_difficulty_range: u64 = "difficultyRange";
        burden_range, set_burden_range: u64 = "burdenRange";
        considered_abandoning, set_considered_abandoning: String = "consideredAbandoning";
    }

    composed_children! {
        paradata, set_paradata: Option<InterviewParadata>;
    }

    /// Whether the interview was at least started
    #[must_use]
    pub fn has_minimum_required_data(&self) -> bool {
        self.state()
            .paradata
            .as_ref()
            .is_some_and(|paradata| paradata.started_at().is_some())
    }
}

impl SurveyObject for Interview {
    const DISPLAY_NAME: &'static str = "Interview";
    const CONFIDENTIAL_ATTRIBUTES: &'static [&'static str] = &[
        "_id",
        "_participant_id",
        "accessCode",
        "contactPhoneNumber",
        "helpContactPhoneNumber",
        "contactEmail",
        "helpContactEmail",
        "acceptToBeContactedForHelp",
        "wouldLikeToParticipateInOtherSurveys",
        "respondentComments",
        "interviewerComments",
        "auditorComments",
        "durationRange",
        "durationRespondentEstimationMin",
        "interestRange",
        "difficultyRange",
        "burdenRange",
        "consideredAbandoning",
    ];

    fn validate_params(dirty: &Value, display_name: &str) -> Vec<ParamsError> {
        let validator = ParamsValidator::new(dirty, display_name)
            .positive_numbers(&["_id"])
            .required_object()
            .extend(uuidable::validate_params(dirty, None))
            .positive_numbers(&["_participant_id"])
            .booleans(&["_isValid", "_isCompleted", "_isQuestionable", "_isValidated"])
            .arrays_of_strings(&["_languages"])
            .strings(&["accessCode"])
            .date_strings(&["assignedDate"])
            .strings(&[
                "contactPhoneNumber",
                "helpContactPhoneNumber",
                "contactEmail",
                "helpContactEmail",
            ])
            .booleans(&["acceptToBeContactedForHelp", "wouldLikeToParticipateInOtherSurveys"])
            .strings(&["respondentComments", "interviewerComments", "auditorComments"])
            .positive_integers(&RANGES)
            .one_of("consideredAbandoning", &YES_NO_DONT_KNOW_VALUES, "YesNoDontKnow");

        let paradata = match composed_dirty(dirty, "paradata") {
            Some(paradata) => Some(paradata.clone()),
            None => dirty
                .as_object()
                .and_then(InterviewParadata::from_legacy_params)
                .map(|paradata| Value::Object(paradata.attributes)),
        };
        match paradata {
            Some(paradata) => validator
                .extend(InterviewParadata::validate_params(&paradata, InterviewParadata::DISPLAY_NAME))
                .finish(),
            None => validator.finish(),
        }
    }

    fn unserialize(params: &Params, registry: &SurveyObjectsRegistry) -> Self {
        let params = flatten_serialized_data(params);
        let paradata = match composed_value(&params, "paradata").and_then(Value::as_object) {
            Some(paradata) => Some(InterviewParadata::new(paradata)),
            None => InterviewParadata::from_legacy_params(&params),
        };
        let interview = Self::from_state(InterviewState {
            bags: ObjectAttributes::from_params(
                &params,
                &INTERVIEW_ATTRIBUTES,
                &INTERVIEW_COMPOSED,
                Self::DISPLAY_NAME,
            ),
            registry: registry.downgrade(),
            paradata,
        });
        registry.register_interview(&interview);
        interview
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::household::Household;
    use crate::object::AttributeBags;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const INTERVIEW: &str = "5a6b7c8d-9e0f-4a1b-8c2d-3e4f5a6b7c8d";

    fn build(value: &Value, registry: &SurveyObjectsRegistry) -> Interview {
        Interview::unserialize(value.as_object().unwrap_or(&Params::new()), registry)
    }

    #[test]
    fn composed_paradata() {
        let registry = SurveyObjectsRegistry::new();
        let interview = build(
            &json!({
                "_uuid": INTERVIEW,
                "_id": 12,
                "_isCompleted": true,
                "_paradata": {
                    "startedAt": 1_700_000_000,
                    "source": "web",
                    "languages": [{ "language": "fr", "startTimestamp": 1_700_000_000 }, { "lang": "en" }],
                    "browsers": [{ "ua": "Firefox" }],
                    "unknown": 1
                }
            }),
            &registry,
        );
        assert_eq!(interview.id(), Some(12));
        assert_eq!(interview.is_completed(), Some(true));
        assert!(interview.has_minimum_required_data());
        let paradata = interview.paradata();
        assert!(paradata.is_some());
        let paradata = paradata.unwrap_or_default();
        assert_eq!(paradata.source().as_deref(), Some("web"));
        assert_eq!(
            paradata.languages(),
            vec![InterviewLanguage {
                language: "fr".to_string(),
                start_timestamp: Some(1_700_000_000),
                end_timestamp: None,
            }]
        );
        assert_eq!(paradata.browsers().len(), 1);
        assert!(paradata.sections().is_empty());
        assert!(!paradata.attributes().contains_key("unknown"));
        assert!(interview.custom_attributes().is_empty());
        assert!(registry.get_interview(INTERVIEW).is_some_and(|found| found.ptr_eq(&interview)));
    }

    #[test]
    fn legacy_flat_paradata_is_folded() {
        let registry = SurveyObjectsRegistry::new();
        let interview = build(
            &json!({
                "_language": "en",
                "_browser": { "ua": "Safari" },
                "_startedAt": 1_600_000_000,
                "_personRandomSequence": ["p2", "p1"],
                "_sections": { "home": { "_startedAt": 1_600_000_010 } }
            }),
            &registry,
        );
        let paradata = interview.paradata().unwrap_or_default();
        assert_eq!(paradata.started_at(), Some(1_600_000_000));
        assert_eq!(paradata.languages()[0].language, "en");
        assert_eq!(paradata.browsers(), vec![json!({ "ua": "Safari" })]);
        assert_eq!(
            paradata.persons_random_sequence(),
            Some(vec!["p2".to_string(), "p1".to_string()])
        );
        assert!(paradata.sections().contains_key("home"));
        assert!(interview.attributes().get("_startedAt").is_none());
        assert!(interview.custom_attributes().is_empty());
    }

    #[test]
    fn without_paradata() {
        let registry = SurveyObjectsRegistry::new();
        let interview = build(&json!({ "accessCode": "1234-5678" }), &registry);
        assert!(interview.paradata().is_none());
        assert!(!interview.has_minimum_required_data());
        let mut paradata = InterviewParadata::default();
        paradata.set_started_at(Some(10));
        interview.set_paradata(Some(paradata));
        assert!(interview.has_minimum_required_data());
    }

    #[test]
    fn validate_params_order() {
        let errors = Interview::validate_params(
            &json!({
                "_id": -3,
                "_uuid": "nope",
                "_isQuestionable": "yes",
                "assignedDate": "2024-13-01",
                "burdenRange": 2.5,
                "consideredAbandoning": "maybe",
                "_paradata": { "startedAt": "early", "languages": [{ "language": 3 }], "browsers": [{ "ua": "x", "os": { "name": 1 } }] }
            }),
            "Interview",
        );
        let described: Vec<String> = errors.iter().map(ToString::to_string).collect();
        assert_eq!(
            described,
            vec![
                "Interview validateParams: _id should be a positive number",
                "Uuidable validateParams: _uuid should be a valid uuid",
                "Interview validateParams: _isQuestionable should be a boolean",
                "Interview validateParams: assignedDate should be a valid date string",
                "Interview validateParams: burdenRange should be a positive integer",
                "Interview validateParams: consideredAbandoning should be a valid YesNoDontKnow",
                "InterviewParadata validateParams: startedAt should be a positive integer",
                "InterviewParadata validateParams: languages.[0].language should be a string",
                "InterviewParadata validateParams: browsers.[0].os.name should be a string",
            ]
        );
    }

    #[test]
    fn legacy_paradata_is_validated() {
        let errors = Interview::validate_params(&json!({ "_source": 4 }), "Interview");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].display_name, "InterviewParadata");
        assert!(errors[0].is_for("source"));
    }

    #[test]
    fn admin_attributes_are_confidential() {
        let registry = SurveyObjectsRegistry::new();
        let interview = build(
            &json!({ "_id": 4, "_isValidated": false, "accessCode": "1234", "respondentComments": "long" }),
            &registry,
        );
        let exported = interview.export_attributes(false);
        assert!(exported.contains_key("_isValidated"));
        assert!(exported.contains_key("_uuid"));
        assert!(!exported.contains_key("_id"));
        assert!(!exported.contains_key("accessCode"));
        assert!(!exported.contains_key("respondentComments"));

        let mut paradata = InterviewParadata::default();
        paradata.set_source(Some("phone".to_string()));
        paradata.set_completed_at(Some(99));
        let exported = paradata.export_attributes(false);
        assert_eq!(exported.len(), 1);
        assert_eq!(paradata.export_attributes(true).len(), 2);
    }

    #[test]
    fn households_resolve_their_interview() {
        let registry = SurveyObjectsRegistry::new();
        let household = Household::unserialize(
            json!({ "_interviewUuid": INTERVIEW }).as_object().unwrap_or(&Params::new()),
            &registry,
        );
        assert!(household.interview().is_none());
        let interview = build(&json!({ "_uuid": INTERVIEW }), &registry);
        assert!(household.interview().is_some_and(|found| found.ptr_eq(&interview)));
    }
}
