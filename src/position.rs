use std::fmt;

use crate::geodesy;

/// A point on the Earth's surface in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}°, {:.6}°)", self.latitude, self.longitude)
    }
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True when both coordinates are finite and inside the valid
    /// latitude/longitude ranges.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Course from this position to another position.
    /// Returns degrees (0-360, where 0 is North).
    pub fn course_to(&self, other: &Position) -> f64 {
        geodesy::great_circle_course_deg(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }

    /// Great-circle distance to another position in kilometres.
    pub fn distance_km_to(&self, other: &Position) -> f64 {
        geodesy::haversine_distance_km(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }

    /// Project a position forward by a given distance and course
    /// course: degrees (0-360, where 0 is North)
    /// distance: kilometres
    pub fn project(&self, course: f64, distance_km: f64) -> Position {
        let (latitude, longitude) =
            geodesy::destination(self.latitude, self.longitude, course, distance_km);
        Position::new(latitude, longitude)
    }
}
