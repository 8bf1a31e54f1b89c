use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{json, Value};
use survey_core::groups::start_endable;
use survey_core::validators::{self, is_date_string, is_positive_integer};
use survey_core::{KindStore, LoggingConfig, ParamsValidator, SurveyConfig};

#[test]
fn config_round_trips_through_toml() {
    let config = SurveyConfig::new()
        .with_person_colors(vec!["#000000".to_string(), "#FFFFFF".to_string()])
        .with_logging(LoggingConfig {
            filter: "survey_objects=debug".to_string(),
            json: true,
        });
    let text = config.to_toml_string();
    assert!(text.is_ok());
    let parsed = SurveyConfig::from_toml_str(&text.unwrap_or_default());
    assert!(parsed.as_ref().is_ok_and(|parsed| *parsed == config));
    assert_eq!(config.person_color(3), Some("#FFFFFF"));
}

#[test]
fn chained_validator_keeps_check_order() {
    let dirty = json!({ "a": "x", "b": -1, "c": 1, "_uuid": "bad" });
    let errors = ParamsValidator::new(&dirty, "Thing")
        .required_object()
        .positive_integers(&["a", "b", "c"])
        .uuids(&["_uuid"])
        .finish();
    let fields: Vec<&str> = errors.iter().map(|error| error.field.as_str()).collect();
    assert_eq!(fields, vec!["a", "b", "_uuid"]);
}

proptest! {
    #[test]
    fn prop_non_negative_integers_pass(value in 0u64..u64::from(u32::MAX)) {
        prop_assert!(is_positive_integer("size", Some(&json!(value)), "Household").is_empty());
    }

    #[test]
    fn prop_negative_integers_fail(value in i64::MIN..0) {
        prop_assert_eq!(is_positive_integer("size", Some(&json!(value)), "Household").len(), 1);
    }

    #[test]
    fn prop_calendar_dates_pass(days in 0i64..60_000) {
        let date = NaiveDate::from_ymd_opt(1950, 1, 1)
            .and_then(|start| start.checked_add_signed(chrono::Duration::days(days)));
        prop_assume!(date.is_some());
        let text = date.map(|date| date.format("%Y-%m-%d").to_string()).unwrap_or_default();
        prop_assert!(is_date_string("startDate", Some(&Value::from(text)), "Journey").is_empty());
    }

    #[test]
    fn prop_start_end_duration(start in 0i64..86_400, length in 0i64..86_400) {
        let attributes = json!({
            "startDate": "2024-03-05",
            "startTime": start,
            "endDate": "2024-03-05",
            "endTime": start + length,
        });
        let attributes = attributes.as_object().cloned().unwrap_or_default();
        prop_assert_eq!(start_endable::duration_seconds(&attributes), Some(length));
    }

    #[test]
    fn prop_store_keeps_last_registration(uuids in prop::collection::vec("[a-f0-9]{1,4}", 1..20)) {
        let mut store = KindStore::new("things");
        for (index, uuid) in uuids.iter().enumerate() {
            store.register(uuid, index);
        }
        for uuid in &uuids {
            let last = uuids.iter().rposition(|candidate| candidate == uuid);
            prop_assert_eq!(store.get(uuid), last);
        }
        let distinct: std::collections::HashSet<&String> = uuids.iter().collect();
        prop_assert_eq!(store.len(), distinct.len());
    }
}

#[test]
fn uuid_validator_accepts_generated_uuids() {
    let generated = survey_core::groups::uuidable::get_uuid(None);
    assert!(validators::is_valid_uuid(&generated));
}
