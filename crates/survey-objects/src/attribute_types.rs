//! Enumerated attribute values
//!
//! Attributes are stored as plain strings in the attribute bags; these
//! enums give typed access where behavior depends on the value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Travel mode of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub enum Mode {
    Walk,
    Bicycle,
    BicyclePassenger,
    KickScooterElectric,
    CarDriver,
    CarPassenger,
    TransitBus,
    #[serde(rename = "transitBRT")]
    TransitBrt,
    TransitSchoolBus,
    TransitStreetCar,
    TransitFerry,
    TransitGondola,
    TransitMonorail,
    #[serde(rename = "transitRRT")]
    TransitRrt,
    #[serde(rename = "transitLRT")]
    TransitLrt,
    #[serde(rename = "transitLRRT")]
    TransitLrrt,
    #[serde(rename = "transitHSR")]
    TransitHsr,
    TransitRegionalRail,
    TransitOnDemand,
    TransitTaxi,
    IntercityBus,
    IntercityTrain,
    SchoolBus,
    OtherBus,
    Taxi,
    Paratransit,
    Wheelchair,
    MobilityScooter,
    Motorcycle,
    FerryWithCar,
    Plane,
    OtherActiveMode,
    Other,
    DontKnow,
    PreferNotToAnswer,
}

impl Mode {
    /// Every mode, in questionnaire order
    pub const ALL: [Mode; 35] = [
        Mode::Walk,
        Mode::Bicycle,
        Mode::BicyclePassenger,
        Mode::KickScooterElectric,
        Mode::CarDriver,
        Mode::CarPassenger,
        Mode::TransitBus,
        Mode::TransitBrt,
        Mode::TransitSchoolBus,
        Mode::TransitStreetCar,
        Mode::TransitFerry,
        Mode::TransitGondola,
        Mode::TransitMonorail,
        Mode::TransitRrt,
        Mode::TransitLrt,
        Mode::TransitLrrt,
        Mode::TransitHsr,
        Mode::TransitRegionalRail,
        Mode::TransitOnDemand,
        Mode::TransitTaxi,
        Mode::IntercityBus,
        Mode::IntercityTrain,
        Mode::SchoolBus,
        Mode::OtherBus,
        Mode::Taxi,
        Mode::Paratransit,
        Mode::Wheelchair,
        Mode::MobilityScooter,
        Mode::Motorcycle,
        Mode::FerryWithCar,
        Mode::Plane,
        Mode::OtherActiveMode,
        Mode::Other,
        Mode::DontKnow,
        Mode::PreferNotToAnswer,
    ];

    /// Value as stored in attribute bags
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Walk => "walk",
            Mode::Bicycle => "bicycle",
            Mode::BicyclePassenger => "bicyclePassenger",
            Mode::KickScooterElectric => "kickScooterElectric",
            Mode::CarDriver => "carDriver",
            Mode::CarPassenger => "carPassenger",
            Mode::TransitBus => "transitBus",
            Mode::TransitBrt => "transitBRT",
            Mode::TransitSchoolBus => "transitSchoolBus",
            Mode::TransitStreetCar => "transitStreetCar",
            Mode::TransitFerry => "transitFerry",
            Mode::TransitGondola => "transitGondola",
            Mode::TransitMonorail => "transitMonorail",
            Mode::TransitRrt => "transitRRT",
            Mode::TransitLrt => "transitLRT",
            Mode::TransitLrrt => "transitLRRT",
            Mode::TransitHsr => "transitHSR",
            Mode::TransitRegionalRail => "transitRegionalRail",
            Mode::TransitOnDemand => "transitOnDemand",
            Mode::TransitTaxi => "transitTaxi",
            Mode::IntercityBus => "intercityBus",
            Mode::IntercityTrain => "intercityTrain",
            Mode::SchoolBus => "schoolBus",
            Mode::OtherBus => "otherBus",
            Mode::Taxi => "taxi",
            Mode::Paratransit => "paratransit",
            Mode::Wheelchair => "wheelchair",
            Mode::MobilityScooter => "mobilityScooter",
            Mode::Motorcycle => "motorcycle",
            Mode::FerryWithCar => "ferryWithCar",
            Mode::Plane => "plane",
            Mode::OtherActiveMode => "otherActiveMode",
            Mode::Other => "other",
            Mode::DontKnow => "dontKnow",
            Mode::PreferNotToAnswer => "preferNotToAnswer",
        }
    }

    /// Category the mode belongs to
    #[must_use]
    pub fn category(self) -> ModeCategory {
        match self {
            Mode::Walk | Mode::Wheelchair | Mode::MobilityScooter => ModeCategory::Walk,
            Mode::Bicycle | Mode::BicyclePassenger | Mode::KickScooterElectric => ModeCategory::Bicycle,
            Mode::TransitBus
            | Mode::TransitBrt
            | Mode::TransitStreetCar
            | Mode::TransitFerry
            | Mode::TransitGondola
            | Mode::TransitMonorail
            | Mode::TransitRrt
            | Mode::TransitLrt
            | Mode::TransitLrrt
            | Mode::TransitHsr
            | Mode::TransitRegionalRail
            | Mode::TransitOnDemand
            | Mode::TransitTaxi
            | Mode::IntercityBus
            | Mode::IntercityTrain => ModeCategory::Transit,
            Mode::TransitSchoolBus | Mode::SchoolBus => ModeCategory::SchoolBus,
            Mode::CarDriver => ModeCategory::CarDriver,
            Mode::CarPassenger => ModeCategory::CarPassenger,
            Mode::Taxi => ModeCategory::Taxi,
            Mode::OtherBus
            | Mode::Paratransit
            | Mode::Plane
            | Mode::OtherActiveMode
            | Mode::Motorcycle
            | Mode::FerryWithCar
            | Mode::Other => ModeCategory::Other,
            Mode::DontKnow => ModeCategory::DontKnow,
            Mode::PreferNotToAnswer => ModeCategory::PreferNotToAnswer,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value: {0}")]
pub struct UnknownValue(pub String);

impl FromStr for Mode {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == value)
            .ok_or_else(|| UnknownValue(value.to_owned()))
    }
}

/// Broad grouping of modes used in analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub enum ModeCategory {
    Walk,
    Bicycle,
    Transit,
    SchoolBus,
    CarDriver,
    CarPassenger,
    Taxi,
    Other,
    DontKnow,
    PreferNotToAnswer,
}

/// Who drove a car segment
pub const DRIVER_VALUES: [&str; 10] = [
    "householdMember",
    "familyMember",
    "colleague",
    "taxiDriver",
    "transitTaxiDriver",
    "paraTransit",
    "ridesharing",
    "other",
    "dontKnow",
    "nonApplicable",
];

/// Kind of car used in a car segment
pub const CAR_TYPE_VALUES: [&str; 10] = [
    "householdCar",
    "friendFamilyNonHouseholdCar",
    "rentalCar",
    "companyCar",
    "carsharingStationBased",
    "carsharingFreeFloating",
    "autonomousTaxi",
    "other",
    "dontKnow",
    "nonApplicable",
];

/// Kind of bicycle used in a bicycle segment
pub const BICYCLE_TYPE_VALUES: [&str; 7] = [
    "bicycleNonMotorized",
    "bicycleElectric",
    "bicycleBikesharingNonMotorized",
    "bicycleBikesharingElectric",
    "other",
    "dontKnow",
    "nonApplicable",
];

/// Yes/no/don't know answers
pub const YES_NO_DONT_KNOW_VALUES: [&str; 3] = ["yes", "no", "dontKnow"];

/// Activity of a usual work place visit
pub const ACTIVITY_WORK_USUAL: &str = "workUsual";
/// Activity of a usual school place visit
pub const ACTIVITY_SCHOOL_USUAL: &str = "schoolUsual";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_parse_from_stored_values() {
        for mode in Mode::ALL {
            assert_eq!(mode.as_str().parse::<Mode>(), Ok(mode));
        }
        assert!("teleport".parse::<Mode>().is_err());
    }

    #[test]
    fn serde_names_match_stored_values() {
        for mode in Mode::ALL {
            assert_eq!(serde_json::to_value(mode).ok(), Some(serde_json::Value::from(mode.as_str())));
        }
    }

    #[test]
    fn categories() {
        assert_eq!(Mode::Walk.category(), ModeCategory::Walk);
        assert_eq!(Mode::Wheelchair.category(), ModeCategory::Walk);
        assert_eq!(Mode::TransitBrt.category(), ModeCategory::Transit);
        assert_eq!(Mode::IntercityTrain.category(), ModeCategory::Transit);
        assert_eq!(Mode::TransitSchoolBus.category(), ModeCategory::SchoolBus);
        assert_eq!(Mode::KickScooterElectric.category(), ModeCategory::Bicycle);
        assert_eq!(Mode::Motorcycle.category(), ModeCategory::Other);
        assert_eq!(Mode::PreferNotToAnswer.category(), ModeCategory::PreferNotToAnswer);
    }
}
