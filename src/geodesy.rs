//! Great-circle math on decimal-degree coordinates.
//!
//! All functions are pure. Angles go in as degrees and are converted to
//! radians internally. Distances are kilometres on a sphere of radius
//! [`EARTH_RADIUS_KM`]. A consumer GPS is good for roughly one degree of
//! course precision, the math itself runs at full `f64` precision.
//!
//! Formulas follow <https://www.movable-type.co.uk/scripts/latlong.html>.

use crate::config::EARTH_RADIUS_KM;

/// Great-circle distance between two points using the haversine formula.
/// Read more here: https://en.wikipedia.org/wiki/Haversine_formula
///
/// Always non-negative, and exactly 0 for identical points.
pub fn haversine_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat_from = lat1.to_radians();
    let lat_to = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat_from.cos() * lat_to.cos() * (delta_lon / 2.0).sin().powi(2);

    // Rounding can push `a` a hair above 1 for antipodal points.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Initial compass course from point 1 to point 2 (forward azimuth).
///
/// Returns degrees in `[0, 360)`, 0 being true north, increasing clockwise.
///
/// When both points coincide there is no meaningful direction. The formula
/// degenerates to `atan2(0, 0)`, which yields 0 (north) rather than failing.
pub fn great_circle_course_deg(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat_from = lat1.to_radians();
    let lat_to = lat2.to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let y = delta_lon.sin() * lat_to.cos();
    let x = lat_from.cos() * lat_to.sin() - lat_from.sin() * lat_to.cos() * delta_lon.cos();

    normalize_course(y.atan2(x).to_degrees())
}

/// Wrap any angle into the compass range `[0, 360)`.
pub fn normalize_course(degrees: f64) -> f64 {
    ((degrees % 360.0) + 360.0) % 360.0
}

/// Express a compass course as a signed bearing in `(-180, 180]`.
///
/// Positive values are clockwise (starboard) of north, negative values
/// anticlockwise (port).
pub fn course_to_bearing(course: f64) -> f64 {
    let course = normalize_course(course);
    if course > 180.0 { course - 360.0 } else { course }
}

/// Point reached by travelling `distance_km` from a start point along an
/// initial `course` (degrees). Longitude of the result is wrapped to
/// `[-180, 180)`.
pub fn destination(lat: f64, lon: f64, course: f64, distance_km: f64) -> (f64, f64) {
    let lat1 = lat.to_radians();
    let lon1 = lon.to_radians();
    let brng = course.to_radians();
    let angular_distance = distance_km / EARTH_RADIUS_KM;

    let lat2 = (lat1.sin() * angular_distance.cos()
        + lat1.cos() * angular_distance.sin() * brng.cos())
    .asin();

    let lon2 = lon1
        + (brng.sin() * angular_distance.sin() * lat1.cos())
            .atan2(angular_distance.cos() - lat1.sin() * lat2.sin());

    let lon2_normalized = (lon2.to_degrees() + 540.0) % 360.0 - 180.0;

    (lat2.to_degrees(), lon2_normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f64::consts::PI;

    #[test]
    fn test_quarter_great_circle_along_equator() {
        let distance = haversine_distance_km(0.0, 0.0, 0.0, 90.0);
        let expected = PI * EARTH_RADIUS_KM / 2.0;
        assert!((distance - expected).abs() < 1e-6);
        assert!((distance - 10007.5).abs() < 0.1);

        let course = great_circle_course_deg(0.0, 0.0, 0.0, 90.0);
        assert!((course - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_london_to_new_york() {
        // Roughly 5570 km; exactly 5579.4 km on a 6371 km sphere.
        let distance = haversine_distance_km(51.5, 0.0, 40.7, -74.0);
        assert!((distance - 5579.4).abs() < 0.5, "got {distance}");

        // Initial course out of London heads west-northwest.
        let course = great_circle_course_deg(51.5, 0.0, 40.7, -74.0);
        assert!(course > 280.0 && course < 300.0, "got {course}");
    }

    #[test]
    fn test_cardinal_courses() {
        assert!((great_circle_course_deg(0.0, 0.0, 1.0, 0.0) - 0.0).abs() < 1e-9);
        assert!((great_circle_course_deg(0.0, 0.0, -1.0, 0.0) - 180.0).abs() < 1e-9);
        assert!((great_circle_course_deg(0.0, 0.0, 0.0, -1.0) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_identical_points() {
        assert_eq!(haversine_distance_km(48.05, -123.11, 48.05, -123.11), 0.0);
        assert_eq!(great_circle_course_deg(48.05, -123.11, 48.05, -123.11), 0.0);
    }

    #[test]
    fn test_course_to_bearing() {
        assert_eq!(course_to_bearing(0.0), 0.0);
        assert_eq!(course_to_bearing(90.0), 90.0);
        assert_eq!(course_to_bearing(180.0), 180.0);
        assert_eq!(course_to_bearing(270.0), -90.0);
        assert_eq!(course_to_bearing(359.0), -1.0);
    }

    #[test]
    fn test_normalize_course() {
        assert_eq!(normalize_course(370.0), 10.0);
        assert_eq!(normalize_course(-10.0), 350.0);
        assert_eq!(normalize_course(360.0), 0.0);
        assert_eq!(normalize_course(-1e-15), 0.0);
    }

    #[test]
    fn test_destination_round_trip_distance() {
        let (lat, lon) = destination(48.0, -123.0, 45.0, 3.0);
        let back = haversine_distance_km(48.0, -123.0, lat, lon);
        assert!((back - 3.0).abs() < 1e-6);

        let course = great_circle_course_deg(48.0, -123.0, lat, lon);
        assert!((course - 45.0).abs() < 1e-3);
    }

    #[test]
    fn test_destination_wraps_longitude() {
        let (_, lon) = destination(0.0, 179.9, 90.0, 50.0);
        assert!((-180.0..180.0).contains(&lon));
        assert!(lon < 0.0);
    }

    proptest! {
        #[test]
        fn test_distance_to_self_is_zero(
            lat in -90.0..=90.0_f64,
            lon in -180.0..=180.0_f64,
        ) {
            prop_assert_eq!(haversine_distance_km(lat, lon, lat, lon), 0.0);
        }

        #[test]
        fn test_distance_is_symmetric(
            lat1 in -90.0..=90.0_f64,
            lon1 in -180.0..=180.0_f64,
            lat2 in -90.0..=90.0_f64,
            lon2 in -180.0..=180.0_f64,
        ) {
            let there = haversine_distance_km(lat1, lon1, lat2, lon2);
            let back = haversine_distance_km(lat2, lon2, lat1, lon1);
            prop_assert!(there >= 0.0);
            prop_assert!((there - back).abs() < 1e-6, "{} vs {}", there, back);
        }

        #[test]
        fn test_course_in_compass_range(
            lat1 in -90.0..=90.0_f64,
            lon1 in -180.0..=180.0_f64,
            lat2 in -90.0..=90.0_f64,
            lon2 in -180.0..=180.0_f64,
        ) {
            let course = great_circle_course_deg(lat1, lon1, lat2, lon2);
            prop_assert!((0.0..360.0).contains(&course), "course {} out of range", course);
        }
    }
}
