//! Trips: travel between two visited places, split into segments
//!
//! Mode analytics (multimodality, transit share) are derived from the
//! segments on every call and never cached.

use crate::attribute_types::{Mode, ModeCategory};
use crate::geography;
use crate::household::Household;
use crate::journey::Journey;
use crate::junction::Junction;
use crate::object::{
    composed_dirty, find_by_uuid, insert_at, insert_relative, reference_uuid, remove_by_uuid, validate_child,
    validate_children, AttributeBags, ObjectAttributes, SurveyObject,
};
use crate::person::Person;
use crate::registry::{RegistryRef, SurveyObjectsRegistry};
use crate::segment::Segment;
use crate::trip_chain::TripChain;
use crate::visited_place::VisitedPlace;
use serde_json::Value;
use std::collections::HashSet;
use survey_core::constructor::{composed_value, flatten_serialized_data};
use survey_core::groups::{start_endable, uuidable, weight};
use survey_core::{
    initialize_composed_array_attributes, initialize_composed_attribute, Params, ParamsError, ParamsValidator,
};

/// Known trip attributes
pub const TRIP_ATTRIBUTES: [&str; 11] = [
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
    "preData",
];

const TRIP_COMPOSED: [&str; 10] = [
    "_startPlace",
    "startPlace",
    "_endPlace",
    "endPlace",
    "_segments",
    "segments",
    "_junctions",
    "junctions",
    "_journeyUuid",
    "_tripChainUuid",
];

struct TripState {
    bags: ObjectAttributes,
    registry: RegistryRef,
    start_place: Option<VisitedPlace>,
    end_place: Option<VisitedPlace>,
    segments: Vec<Segment>,
    junctions: Vec<Junction>,
    journey_uuid: Option<String>,
    trip_chain_uuid: Option<String>,
}

survey_handle!(
    /// Travel between an origin and a destination visited place
    Trip => TripState, registered
);

impl Trip {
    scalar_attributes! {
        start_date, set_start_date: String = "startDate";
        start_time, set_start_time: u64 = "startTime";
        start_time_period, set_start_time_period: String = "startTimePeriod";
        end_date, set_end_date: String = "endDate";
        end_time, set_end_time: u64 = "endTime";
        end_time_period, set_end_time_period: String = "endTimePeriod";
        sequence, set_sequence: u64 = "_sequence";
        pre_data, set_pre_data: Params = "preData";
    }

    composed_children! {
        start_place, set_start_place: Option<VisitedPlace>;
        end_place, set_end_place: Option<VisitedPlace>;
        segments, set_segments: Vec<Segment>;
        junctions, set_junctions: Vec<Junction>;
    }

    reference_uuids! {
        journey_uuid, set_journey_uuid;
        trip_chain_uuid, set_trip_chain_uuid;
    }

    /// Origin, same as [`Trip::start_place`]
    #[must_use]
    pub fn origin(&self) -> Option<VisitedPlace> {
        self.start_place()
    }

    /// Replace the origin
    pub fn set_origin(&self, place: Option<VisitedPlace>) {
        self.set_start_place(place);
    }

    /// Destination, same as [`Trip::end_place`]
    #[must_use]
    pub fn destination(&self) -> Option<VisitedPlace> {
        self.end_place()
    }

    /// Replace the destination
    pub fn set_destination(&self, place: Option<VisitedPlace>) {
        self.set_end_place(place);
    }

    /// Journey this trip belongs to
    #[must_use]
    pub fn journey(&self) -> Option<Journey> {
        let uuid = self.journey_uuid()?;
        self.registry()?.get_journey(&uuid)
    }

    /// Trip chain this trip belongs to
    #[must_use]
    pub fn trip_chain(&self) -> Option<TripChain> {
        let uuid = self.trip_chain_uuid()?;
        self.registry()?.get_trip_chain(&uuid)
    }

    /// Person who made the trip, through the journey
    #[must_use]
    pub fn person(&self) -> Option<Person> {
        self.journey()?.person()
    }

    /// Household of the person who made the trip
    #[must_use]
    pub fn household(&self) -> Option<Household> {
        self.person()?.household()
    }

    /// Whether the trip has at least one segment
    #[must_use]
    pub fn has_segments(&self) -> bool {
        !self.state().segments.is_empty()
    }

    /// Whether at least one segment uses transit
    #[must_use]
    pub fn has_transit(&self) -> bool {
        self.segments().iter().any(Segment::is_transit)
    }

    /// Mode of each segment, in segment order
    ///
    /// Segments without a known mode are skipped.
    #[must_use]
    pub fn modes(&self) -> Vec<Mode> {
        self.segments().iter().filter_map(Segment::mode).collect()
    }

    /// Mode category of each segment, in segment order
    #[must_use]
    pub fn mode_categories(&self) -> Vec<ModeCategory> {
        self.segments().iter().filter_map(Segment::mode_category).collect()
    }

    /// Whether more than one distinct mode is used
    #[must_use]
    pub fn is_multimodal(&self) -> bool {
        self.modes().into_iter().collect::<HashSet<_>>().len() > 1
    }

    /// Modes, ignoring walking
    #[must_use]
    pub fn modes_without_walk(&self) -> Vec<Mode> {
        self.modes().into_iter().filter(|mode| *mode != Mode::Walk).collect()
    }

    /// Modes of the transit segments
    #[must_use]
    pub fn transit_modes(&self) -> Vec<Mode> {
        self.segments()
            .iter()
            .filter(|segment| segment.is_transit())
            .filter_map(Segment::mode)
            .collect()
    }

    /// Modes of the non-transit segments, walking included
    #[must_use]
    pub fn non_transit_modes(&self) -> Vec<Mode> {
        self.segments()
            .iter()
            .filter(|segment| !segment.is_transit())
            .filter_map(Segment::mode)
            .collect()
    }

    /// Whether transit is combined with more than one non-transit leg
    #[must_use]
    pub fn is_transit_multimodal(&self) -> bool {
        self.non_transit_modes().len() > 1 && self.has_transit()
    }

    /// Whether every mode apart from walking is transit
    #[must_use]
    pub fn is_transit_only(&self) -> bool {
        self.has_transit() && self.transit_modes().len() == self.modes_without_walk().len()
    }

    /// Segments with walking legs removed when other modes are present
    ///
    /// A trip made entirely on foot (even over several walking segments)
    /// keeps all its segments.
    #[must_use]
    pub fn segments_without_walking_in_multimode(&self) -> Vec<Segment> {
        let segments = self.segments();
        let is_walk = |segment: &Segment| segment.mode_value().as_deref() == Some(Mode::Walk.as_str());
        let distinct_modes: HashSet<Option<String>> = segments.iter().map(Segment::mode_value).collect();
        if distinct_modes.len() > 1 && segments.iter().any(|segment| !is_walk(segment)) {
            segments.into_iter().filter(|segment| !is_walk(segment)).collect()
        } else {
            segments
        }
    }

    /// Seconds between start and end, `None` unless both times are set and ordered
    #[must_use]
    pub fn duration_seconds(&self) -> Option<i64> {
        start_endable::duration_seconds(&self.bags().attributes)
    }

    /// Straight-line distance between origin and destination
    #[must_use]
    pub fn bird_distance_meters(&self) -> Option<f64> {
        let origin = self.start_place()?.geography()?;
        let destination = self.end_place()?.geography()?;
        geography::bird_distance_meters(&origin, &destination)
    }

    /// Straight-line speed in km/h, rounded to 3 decimals
    #[must_use]
    pub fn bird_speed_kph(&self) -> Option<f64> {
        geography::bird_speed_kph(self.bird_distance_meters()?, self.duration_seconds()?)
    }

    /// Fill missing start and end times from the visited places
    ///
    /// The trip starts when the origin visit ends and ends when the
    /// destination visit starts. A visit time of zero is not copied.
    pub fn setup_start_and_end_times(&self) {
        if self.start_time().is_none() {
            let time = self.start_place().and_then(|place| place.end_time());
            if let Some(time) = time.filter(|time| *time > 0) {
                self.set_start_time(Some(time));
            }
        }
        if self.end_time().is_none() {
            let time = self.end_place().and_then(|place| place.start_time());
            if let Some(time) = time.filter(|time| *time > 0) {
                self.set_end_time(Some(time));
            }
        }
    }

    /// Append a segment
    pub fn add_segment(&self, segment: Segment) {
        self.state_mut().segments.push(segment);
    }

    /// Insert a segment at `index`, clamped to the segment count
    pub fn insert_segment(&self, segment: Segment, index: usize) {
        insert_at(&mut self.state_mut().segments, segment, index);
    }

    /// Insert a segment after the one with uuid `after_uuid`
    ///
    /// Returns `false` when the trip has segments but none matches.
    pub fn insert_segment_after_uuid(&self, segment: Segment, after_uuid: &str) -> bool {
        insert_relative(&mut self.state_mut().segments, segment, after_uuid, true)
    }

    /// Insert a segment before the one with uuid `before_uuid`
    pub fn insert_segment_before_uuid(&self, segment: Segment, before_uuid: &str) -> bool {
        insert_relative(&mut self.state_mut().segments, segment, before_uuid, false)
    }

    /// Remove the segment with uuid `segment_uuid`
    pub fn remove_segment(&self, segment_uuid: &str) -> bool {
        remove_by_uuid(&mut self.state_mut().segments, segment_uuid)
    }

    /// Segment with uuid `segment_uuid`
    #[must_use]
    pub fn segment_by_uuid(&self, segment_uuid: &str) -> Option<Segment> {
        find_by_uuid(&self.state().segments, segment_uuid)
    }
}

impl SurveyObject for Trip {
    const DISPLAY_NAME: &'static str = "Trip";
    const CONFIDENTIAL_ATTRIBUTES: &'static [&'static str] = &["preData"];

    fn validate_params(dirty: &Value, display_name: &str) -> Vec<ParamsError> {
        ParamsValidator::new(dirty, display_name)
            .required_object()
            .extend(uuidable::validate_params(dirty, Some(display_name)))
            .extend(start_endable::validate_params(dirty, Some(display_name)))
            .positive_integers(&["_sequence"])
            .booleans(&["_isValid"])
            .extend(weight::validate_weights(dirty.get(weight::WEIGHTS_ATTRIBUTE)))
            .objects(&["preData"])
            .extend(validate_child::<VisitedPlace>(
                composed_dirty(dirty, "startPlace"),
                "StartVisitedPlace",
            ))
            .extend(validate_child::<VisitedPlace>(composed_dirty(dirty, "endPlace"), "EndVisitedPlace"))
            .extend(validate_children::<Segment>(composed_dirty(dirty, "segments"), "Segment"))
            .extend(validate_children::<Junction>(composed_dirty(dirty, "junctions"), "Junction"))
            .uuids(&["_journeyUuid", "_tripChainUuid"])
            .finish()
    }

    fn unserialize(params: &Params, registry: &SurveyObjectsRegistry) -> Self {
        let params = flatten_serialized_data(params);
        let trip = Self::from_state(TripState {
            bags: ObjectAttributes::from_params(&params, &TRIP_ATTRIBUTES, &TRIP_COMPOSED, Self::DISPLAY_NAME),
            registry: registry.downgrade(),
            start_place: initialize_composed_attribute(
                composed_value(&params, "startPlace"),
                VisitedPlace::unserialize,
                registry,
            ),
            end_place: initialize_composed_attribute(
                composed_value(&params, "endPlace"),
                VisitedPlace::unserialize,
                registry,
            ),
            segments: initialize_composed_array_attributes(
                composed_value(&params, "segments"),
                Segment::unserialize,
                registry,
            ),
            junctions: initialize_composed_array_attributes(
                composed_value(&params, "junctions"),
                Junction::unserialize,
                registry,
            ),
            journey_uuid: reference_uuid(&params, "_journeyUuid"),
            trip_chain_uuid: reference_uuid(&params, "_tripChainUuid"),
        });
        registry.register_trip(&trip);
        trip
    }
}
