use proptest::prelude::*;
use serde_json::{json, Value};
use survey_objects::household::HOUSEHOLD_ATTRIBUTES;
use survey_objects::prelude::*;
use survey_test_utils::{new_uuid, params};

fn dirty_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        (-1.0e6..1.0e6f64).prop_map(Value::from),
        "[a-z0-9-]{0,12}".prop_map(Value::from),
        prop::collection::vec("[a-z]{1,5}", 0..3).prop_map(|items| json!(items)),
    ]
}

proptest! {
    #[test]
    fn prop_valid_household_attributes_round_trip(
        size in 0u64..20,
        car_number in 0u64..5,
        income_level in "[a-z]{1,10}",
    ) {
        let registry = SurveyObjectsRegistry::new();
        let dirty = json!({
            "_uuid": new_uuid(),
            "size": size,
            "carNumber": car_number,
            "incomeLevel": income_level,
        });
        let result = Household::create(&dirty, &registry);
        prop_assert!(result.is_ok());
        let household = result.unwrap();
        prop_assert_eq!(household.attributes(), params(&dirty));
    }

    #[test]
    fn prop_unknown_keys_are_custom(key in "[a-z]{3,12}", value in any::<i64>()) {
        prop_assume!(!HOUSEHOLD_ATTRIBUTES.contains(&key.as_str()));
        prop_assume!(!["members", "vehicles"].contains(&key.as_str()));
        let registry = SurveyObjectsRegistry::new();
        let mut raw = params(&json!({ "size": 1 }));
        raw.insert(key.clone(), Value::from(value));
        let household = Household::unserialize(&raw, &registry);
        prop_assert_eq!(household.custom_attribute(&key), Some(Value::from(value)));
        prop_assert!(household.attribute(&key).is_none());
        prop_assert!(household.custom_attribute("size").is_none());
    }

    #[test]
    fn prop_registry_returns_same_instance(count in 1usize..8) {
        let registry = SurveyObjectsRegistry::new();
        let persons: Vec<Person> = (0..count)
            .map(|_| Person::unserialize(&params(&json!({ "_uuid": new_uuid() })), &registry))
            .collect();
        prop_assert_eq!(registry.person_count(), count);
        for person in &persons {
            let found = registry.get_person(&person.uuid());
            prop_assert!(found.is_some_and(|found| found.ptr_eq(person)));
        }
        for person in &persons {
            registry.unregister_person(&person.uuid());
            prop_assert!(registry.get_person(&person.uuid()).is_none());
        }
        prop_assert!(registry.is_empty());
    }

    #[test]
    fn prop_validate_params_is_idempotent(
        size in dirty_value(),
        start_date in dirty_value(),
        uuid in dirty_value(),
        members in dirty_value(),
    ) {
        let dirty = json!({ "size": size, "startDate": start_date, "_uuid": uuid, "_members": [members] });
        prop_assert_eq!(
            Household::validate_params(&dirty, "Household"),
            Household::validate_params(&dirty, "Household")
        );
        prop_assert_eq!(
            TripChain::validate_params(&dirty, "TripChain"),
            TripChain::validate_params(&dirty, "TripChain")
        );
        prop_assert_eq!(
            Journey::validate_params(&dirty, "Journey"),
            Journey::validate_params(&dirty, "Journey")
        );
    }

    #[test]
    fn prop_unserialize_round_trip(
        age in 0u64..110,
        gender in "[a-z]{1,8}",
        custom in "[a-z]{1,8}",
    ) {
        let registry = SurveyObjectsRegistry::new();
        let person = Person::unserialize(
            &params(&json!({ "age": age, "gender": gender, "favouriteColour": custom })),
            &registry,
        );

        let flat = Person::unserialize(&person.attributes(), &SurveyObjectsRegistry::new());
        prop_assert_eq!(flat.attributes(), person.attributes());

        let serialized = json!({
            "_attributes": person.attributes(),
            "_customAttributes": person.custom_attributes(),
        });
        let rebuilt = Person::unserialize(&params(&serialized), &SurveyObjectsRegistry::new());
        prop_assert_eq!(rebuilt.attributes(), person.attributes());
        prop_assert_eq!(rebuilt.custom_attributes(), person.custom_attributes());
    }
}
