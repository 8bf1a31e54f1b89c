//! Survey objects registry
//!
//! One uuid-keyed store per object kind. Objects never hold references to
//! their parents: they keep the parent uuid and look it up here on every
//! access, so replacing or removing an object is visible immediately to
//! everything that refers to it.
//!
//! Objects keep a weak handle to the registry they were built with. All
//! objects of one unit of work (an interview being loaded or corrected)
//! must share a registry, otherwise parent lookups resolve to `None`.

use crate::household::Household;
use crate::interview::Interview;
use crate::journey::Journey;
use crate::junction::Junction;
use crate::object::SurveyObject;
use crate::organization::Organization;
use crate::person::Person;
use crate::place::Place;
use crate::segment::Segment;
use crate::trip::Trip;
use crate::trip_chain::TripChain;
use crate::vehicle::Vehicle;
use crate::visited_place::VisitedPlace;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::{Arc, Weak};
use survey_core::groups::uuidable;
use survey_core::{KindStore, SurveyConfig};

static SHARED: Lazy<SurveyObjectsRegistry> = Lazy::new(SurveyObjectsRegistry::new);

#[derive(Debug)]
struct Stores {
    interviews: KindStore<Interview>,
    places: KindStore<Place>,
    households: KindStore<Household>,
    persons: KindStore<Person>,
    vehicles: KindStore<Vehicle>,
    organizations: KindStore<Organization>,
    journeys: KindStore<Journey>,
    visited_places: KindStore<VisitedPlace>,
    trips: KindStore<Trip>,
    trip_chains: KindStore<TripChain>,
    segments: KindStore<Segment>,
    junctions: KindStore<Junction>,
}

impl Stores {
    fn new() -> Self {
        Self {
            interviews: KindStore::new("interviews"),
            places: KindStore::new("places"),
            households: KindStore::new("households"),
            persons: KindStore::new("persons"),
            vehicles: KindStore::new("vehicles"),
            organizations: KindStore::new("organizations"),
            journeys: KindStore::new("journeys"),
            visited_places: KindStore::new("visitedPlaces"),
            trips: KindStore::new("trips"),
            trip_chains: KindStore::new("tripChains"),
            segments: KindStore::new("segments"),
            junctions: KindStore::new("junctions"),
        }
    }

    fn clear(&mut self) {
        self.interviews.clear();
        self.places.clear();
        self.households.clear();
        self.persons.clear();
        self.vehicles.clear();
        self.organizations.clear();
        self.journeys.clear();
        self.visited_places.clear();
        self.trips.clear();
        self.trip_chains.clear();
        self.segments.clear();
        self.junctions.clear();
    }

    fn len(&self) -> usize {
        self.interviews.len()
            + self.places.len()
            + self.households.len()
            + self.persons.len()
            + self.vehicles.len()
            + self.organizations.len()
            + self.journeys.len()
            + self.visited_places.len()
            + self.trips.len()
            + self.trip_chains.len()
            + self.segments.len()
            + self.junctions.len()
    }
}

#[derive(Debug)]
struct RegistryInner {
    uuid: String,
    config: SurveyConfig,
    stores: RwLock<Stores>,
}

/// Uuid-indexed stores of live survey objects
///
/// Cloning the registry clones the handle: clones share the same stores.
#[derive(Debug, Clone)]
pub struct SurveyObjectsRegistry {
    inner: Arc<RegistryInner>,
}

/// Non-owning handle from an object back to its registry
#[derive(Debug, Clone)]
pub(crate) struct RegistryRef(Weak<RegistryInner>);

impl RegistryRef {
    pub(crate) fn upgrade(&self) -> Option<SurveyObjectsRegistry> {
        self.0.upgrade().map(|inner| SurveyObjectsRegistry { inner })
    }
}

macro_rules! kind_methods {
    ($($store:ident: $ty:ty => $register:ident, $get:ident, $unregister:ident, $count:ident;)*) => {
        $(
            #[doc = concat!("Register `", stringify!($ty), "` under its uuid, replacing any previous one")]
            pub fn $register(&self, object: &$ty) {
                let uuid = object.uuid();
                self.inner.stores.write().$store.register(&uuid, object.clone());
            }

            #[doc = concat!("Current `", stringify!($ty), "` registered under `uuid`")]
            #[must_use]
            pub fn $get(&self, uuid: &str) -> Option<$ty> {
                self.inner.stores.read().$store.get(uuid)
            }

            #[doc = concat!("Remove the `", stringify!($ty), "` registered under `uuid`, if any")]
            pub fn $unregister(&self, uuid: &str) {
                self.inner.stores.write().$store.unregister(uuid);
            }

            #[doc = concat!("Number of registered `", stringify!($ty), "` objects")]
            #[must_use]
            pub fn $count(&self) -> usize {
                self.inner.stores.read().$store.len()
            }
        )*
    };
}

impl SurveyObjectsRegistry {
    /// Create an empty registry with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SurveyConfig::default())
    }

    /// Create an empty registry with `config`
    #[must_use]
    pub fn with_config(config: SurveyConfig) -> Self {
        let uuid = uuidable::get_uuid(None);
        tracing::debug!(registry = %uuid, "created survey objects registry");
        Self {
            inner: Arc::new(RegistryInner {
                uuid,
                config,
                stores: RwLock::new(Stores::new()),
            }),
        }
    }

    /// Process-wide default registry
    ///
    /// Units of work processed concurrently should use their own registry.
    #[must_use]
    pub fn shared() -> Self {
        SHARED.clone()
    }

    /// Uuid identifying this registry instance
    #[must_use]
    pub fn uuid(&self) -> &str {
        &self.inner.uuid
    }

    /// Configuration objects built with this registry read
    #[must_use]
    pub fn config(&self) -> &SurveyConfig {
        &self.inner.config
    }

    /// Whether both handles share the same stores
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn downgrade(&self) -> RegistryRef {
        RegistryRef(Arc::downgrade(&self.inner))
    }

    /// Empty every store
    pub fn clear(&self) {
        tracing::debug!(registry = %self.inner.uuid, "clearing registry");
        self.inner.stores.write().clear();
    }

    /// Number of registered objects across all kinds
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.stores.read().len()
    }

    /// Whether no object is registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    kind_methods! {
        interviews: Interview => register_interview, get_interview, unregister_interview, interview_count;
        places: Place => register_place, get_place, unregister_place, place_count;
        households: Household => register_household, get_household, unregister_household, household_count;
        persons: Person => register_person, get_person, unregister_person, person_count;
        vehicles: Vehicle => register_vehicle, get_vehicle, unregister_vehicle, vehicle_count;
        organizations: Organization => register_organization, get_organization, unregister_organization, organization_count;
        journeys: Journey => register_journey, get_journey, unregister_journey, journey_count;
        visited_places: VisitedPlace => register_visited_place, get_visited_place, unregister_visited_place, visited_place_count;
        trips: Trip => register_trip, get_trip, unregister_trip, trip_count;
        trip_chains: TripChain => register_trip_chain, get_trip_chain, unregister_trip_chain, trip_chain_count;
        segments: Segment => register_segment, get_segment, unregister_segment, segment_count;
        junctions: Junction => register_junction, get_junction, unregister_junction, junction_count;
    }
}

impl Default for SurveyObjectsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::AttributeBags;
    use serde_json::json;

    fn params(value: serde_json::Value) -> survey_core::Params {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn registry_new_empty() {
        let registry = SurveyObjectsRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get_household("missing").is_none());
        assert!(survey_core::validators::is_valid_uuid(registry.uuid()));
    }

    #[test]
    fn registry_construction_registers() {
        let registry = SurveyObjectsRegistry::new();
        let household = Household::unserialize(&params(json!({ "_uuid": "h1" })), &registry);
        let found = registry.get_household("h1");
        assert!(found.is_some_and(|found| found.ptr_eq(&household)));
    }

    #[test]
    fn registry_last_write_wins() {
        let registry = SurveyObjectsRegistry::new();
        let first = Person::unserialize(&params(json!({ "_uuid": "p1", "age": 30 })), &registry);
        let second = Person::unserialize(&params(json!({ "_uuid": "p1", "age": 31 })), &registry);
        let found = registry.get_person("p1");
        assert!(found.as_ref().is_some_and(|found| found.ptr_eq(&second)));
        assert!(!found.is_some_and(|found| found.ptr_eq(&first)));
    }

    #[test]
    fn registry_unregister_and_clear() {
        let registry = SurveyObjectsRegistry::new();
        Trip::unserialize(&params(json!({ "_uuid": "t1" })), &registry);
        Segment::unserialize(&params(json!({ "_uuid": "s1" })), &registry);
        assert_eq!(registry.trip_count(), 1);
        assert_eq!(registry.len(), 2);
        registry.unregister_trip("t1");
        registry.unregister_trip("t1");
        assert!(registry.get_trip("t1").is_none());
        assert!(registry.get_segment("s1").is_some());
        assert_eq!(registry.trip_count(), 0);
        assert_eq!(registry.segment_count(), 1);
        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn registries_are_isolated() {
        let first = SurveyObjectsRegistry::new();
        let second = SurveyObjectsRegistry::new();
        Vehicle::unserialize(&params(json!({ "_uuid": "v1" })), &first);
        assert!(first.get_vehicle("v1").is_some());
        assert!(second.get_vehicle("v1").is_none());
        assert!(!first.ptr_eq(&second));
        assert!(SurveyObjectsRegistry::shared().ptr_eq(&SurveyObjectsRegistry::shared()));
    }

    #[test]
    fn dropped_registry_resolves_nothing() {
        let registry = SurveyObjectsRegistry::new();
        let person = Person::unserialize(&params(json!({ "_uuid": "p1", "_householdUuid": "h1" })), &registry);
        Household::unserialize(&params(json!({ "_uuid": "h1" })), &registry);
        assert!(person.household().is_some());
        drop(registry);
        assert!(person.registry().is_none());
        assert!(person.household().is_none());
    }
}
