//! GeoJSON point helpers used by places and trips

use serde_json::Value;
use survey_core::validators;

const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// `(longitude, latitude)` of a GeoJSON point feature
#[must_use]
pub fn point_coordinates(feature: &Value) -> Option<(f64, f64)> {
    if !validators::is_point_feature(feature) {
        return None;
    }
    let coordinates = feature.get("geometry")?.get("coordinates")?.as_array()?;
    Some((coordinates.first()?.as_f64()?, coordinates.get(1)?.as_f64()?))
}

/// Great-circle distance between two point features, rounded up to whole meters
#[must_use]
pub fn bird_distance_meters(origin: &Value, destination: &Value) -> Option<f64> {
    let (origin_lon, origin_lat) = point_coordinates(origin)?;
    let (destination_lon, destination_lat) = point_coordinates(destination)?;
    let delta_lat = (destination_lat - origin_lat).to_radians();
    let delta_lon = (destination_lon - origin_lon).to_radians();
    let a = (delta_lat / 2.0).sin().powi(2)
        + origin_lat.to_radians().cos() * destination_lat.to_radians().cos() * (delta_lon / 2.0).sin().powi(2);
    Some((2.0 * EARTH_RADIUS_METERS * a.sqrt().atan2((1.0 - a).sqrt())).ceil())
}

/// Speed in km/h rounded to three decimals
///
/// `None` unless the duration is positive and the distance is not negative.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn bird_speed_kph(distance_meters: f64, duration_seconds: i64) -> Option<f64> {
    if duration_seconds <= 0 || distance_meters < 0.0 {
        return None;
    }
    let kph = distance_meters / duration_seconds as f64 * 3.6;
    Some((kph * 1000.0).round() / 1000.0)
}

/// Coordinates rendered as a dedup key
pub(crate) fn coordinates_key(feature: &Value) -> Option<String> {
    point_coordinates(feature).map(|(lon, lat)| format!("{lon},{lat}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn point(lon: f64, lat: f64) -> Value {
        json!({ "type": "Feature", "geometry": { "type": "Point", "coordinates": [lon, lat] }, "properties": {} })
    }

    #[test]
    fn distance_between_identical_points_is_zero() {
        let here = point(-73.6, 45.5);
        assert_eq!(bird_distance_meters(&here, &here), Some(0.0));
    }

    #[test]
    fn one_degree_of_latitude() {
        let distance = bird_distance_meters(&point(0.0, 0.0), &point(0.0, 1.0)).unwrap_or_default();
        assert!((distance - 111_195.0).abs() < 10.0, "got {distance}");
    }

    #[test]
    fn invalid_geometry_has_no_distance() {
        assert_eq!(bird_distance_meters(&json!({ "type": "Feature" }), &point(0.0, 0.0)), None);
    }

    #[test]
    fn distance_and_speed_between_fixture_points() {
        let origin = point(45.5, -75.5);
        let destination = point(45.4, -75.6);
        let distance = bird_distance_meters(&origin, &destination);
        assert_eq!(distance, Some(11_461.0));
        assert_eq!(distance.and_then(|distance| bird_speed_kph(distance, 3600)), Some(11.461));
    }

    #[test]
    fn malformed_points_have_no_distance() {
        let destination = point(45.4, -75.6);
        let invalid = [
            json!({ "type": "Feature", "properties": {} }),
            json!({ "type": "Feature", "geometry": { "type": "Point", "coordinates": [45.4, -75.6] } }),
            json!({ "type": "Feature", "geometry": { "type": "Point", "coordinates": [] }, "properties": {} }),
            json!({ "type": "Feature", "geometry": { "type": "Point", "coordinates": null }, "properties": {} }),
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[45.5, -75.5], [45.4, -75.6], [45.4, -75.4], [45.5, -75.5]]]
                },
                "properties": {}
            }),
        ];
        for feature in &invalid {
            assert_eq!(bird_distance_meters(feature, &destination), None, "{feature}");
            assert_eq!(bird_distance_meters(&destination, feature), None, "{feature}");
        }
    }

    #[test]
    fn speed_needs_positive_duration() {
        assert_eq!(bird_speed_kph(1000.0, 0), None);
        assert_eq!(bird_speed_kph(1000.0, -1), None);
        assert_eq!(bird_speed_kph(1000.0, 600), Some(6.0));
        assert_eq!(bird_speed_kph(1000.0, 7), Some(514.286));
    }

    #[test]
    fn negative_distance_has_no_speed() {
        assert_eq!(bird_speed_kph(-100.0, 3600), None);
    }
}
