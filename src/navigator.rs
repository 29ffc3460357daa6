//! Waypoint navigation engine.
//!
//! The [`Navigator`] walks a [`WaypointStore`] in order. Each control cycle
//! it takes one [`PositionSample`], checks whether the active waypoint has
//! been reached, advances to the next one if so, and recomputes the course
//! to steer. Without a fix it keeps reporting the last course it computed,
//! so the vehicle holds its heading until the receiver recovers.
//!
//! Once the final waypoint is active the navigator keeps steering toward it
//! indefinitely. There is no "plan complete" signal beyond
//! [`NavPhase::Holding`].

use std::fmt;

use tracing::{debug, info};

use crate::compass::Direction;
use crate::config::{DEFAULT_COURSE_DEG, WAYPOINT_RADIUS_KM};
use crate::error::NavError;
use crate::geodesy::{self, normalize_course};
use crate::gps_tracker::{GpsFix, PositionSource};
use crate::position::Position;
use crate::waypoint::WaypointStore;

/// What the position source knew at the start of a cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionSample {
    pub has_fix: bool,
    pub latitude: f64,
    pub longitude: f64,
}

impl PositionSample {
    pub fn fix(latitude: f64, longitude: f64) -> Self {
        Self {
            has_fix: true,
            latitude,
            longitude,
        }
    }

    pub fn no_fix() -> Self {
        Self {
            has_fix: false,
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    /// The reported position, if there is a fix and its coordinates are
    /// usable. A receiver glitch reporting NaN or out-of-range values counts
    /// as no fix.
    pub fn position(&self) -> Option<Position> {
        Some(Position::new(self.latitude, self.longitude))
            .filter(|position| self.has_fix && position.is_valid())
    }
}

/// Where the navigator stands relative to the active waypoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavPhase {
    /// Outside the arrival radius (or no fix yet).
    Seeking,
    /// Reached a waypoint on the last fix and moved on to the next one.
    Arrived,
    /// Inside the arrival radius of the final waypoint.
    Holding,
}

impl fmt::Display for NavPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NavPhase::Seeking => "seeking",
            NavPhase::Arrived => "arrived",
            NavPhase::Holding => "holding",
        };
        f.write_str(name)
    }
}

pub struct Navigator<'a> {
    waypoints: &'a WaypointStore,
    arrival_radius_km: f64,
    active_index: usize,
    last_course: f64,
    last_distance_km: Option<f64>,
    phase: NavPhase,
}

impl<'a> Navigator<'a> {
    /// Start at the first waypoint, steering `initial_course` until the
    /// first fix arrives.
    ///
    /// An empty plan cannot reach this point: [`WaypointStore::new`]
    /// rejects it with [`NavError::EmptyPlan`].
    pub fn new(waypoints: &'a WaypointStore, initial_course: f64) -> Result<Self, NavError> {
        Self::with_radius(waypoints, initial_course, WAYPOINT_RADIUS_KM)
    }

    /// Fails with [`NavError::InvalidSetting`] when the course is not finite
    /// or the radius is not a finite, positive distance.
    pub fn with_radius(
        waypoints: &'a WaypointStore,
        initial_course: f64,
        arrival_radius_km: f64,
    ) -> Result<Self, NavError> {
        if !initial_course.is_finite() {
            return Err(NavError::InvalidSetting {
                name: "initial course",
                value: initial_course,
            });
        }
        if !(arrival_radius_km.is_finite() && arrival_radius_km > 0.0) {
            return Err(NavError::InvalidSetting {
                name: "arrival radius",
                value: arrival_radius_km,
            });
        }

        Ok(Self::build(waypoints, initial_course, arrival_radius_km))
    }

    /// Navigator using the default radius and due-east starting course.
    pub fn with_defaults(waypoints: &'a WaypointStore) -> Self {
        Self::build(waypoints, DEFAULT_COURSE_DEG, WAYPOINT_RADIUS_KM)
    }

    fn build(waypoints: &'a WaypointStore, initial_course: f64, arrival_radius_km: f64) -> Self {
        Self {
            waypoints,
            arrival_radius_km,
            active_index: 0,
            last_course: normalize_course(initial_course),
            last_distance_km: None,
            phase: NavPhase::Seeking,
        }
    }

    /// Run one navigation cycle and return the course to steer.
    pub fn update(&mut self, sample: PositionSample) -> f64 {
        let Some(position) = sample.position() else {
            debug!(course = self.last_course, "no fix, holding last course");
            return self.last_course;
        };

        let mut distance = self.distance_to_active(&position);

        if distance < self.arrival_radius_km {
            if self.active_index + 1 < self.waypoints.count() {
                let reached = self.active_index;
                self.active_index += 1;
                self.phase = NavPhase::Arrived;
                info!(
                    reached,
                    next = self.active_index,
                    distance_km = distance,
                    "waypoint reached"
                );
                distance = self.distance_to_active(&position);
            } else {
                if self.phase != NavPhase::Holding {
                    info!(index = self.active_index, "holding at final waypoint");
                }
                self.phase = NavPhase::Holding;
            }
        } else {
            self.phase = NavPhase::Seeking;
        }

        self.last_course = position.course_to(&self.waypoints.at(self.active_index).position());
        self.last_distance_km = Some(distance);

        debug!(
            index = self.active_index,
            course = self.last_course,
            distance_km = distance,
            "course updated"
        );

        self.last_course
    }

    /// Read the source once and run a cycle with the result.
    pub fn poll<S: PositionSource + ?Sized>(&mut self, source: &S) -> f64 {
        self.update(source.sample())
    }

    /// Course to steer, 0-360 degrees from true north.
    pub fn current_course(&self) -> f64 {
        self.last_course
    }

    /// The current course as a signed bearing, -180 (port) to 180 (starboard).
    pub fn current_bearing(&self) -> f64 {
        geodesy::course_to_bearing(self.last_course)
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active_waypoint(&self) -> Position {
        self.waypoints.at(self.active_index).position()
    }

    /// Distance to the active waypoint as of the last fix.
    pub fn last_distance_km(&self) -> Option<f64> {
        self.last_distance_km
    }

    pub fn phase(&self) -> NavPhase {
        self.phase
    }

    pub fn arrival_radius_km(&self) -> f64 {
        self.arrival_radius_km
    }

    pub fn diagnostic(&self) -> Diagnostic {
        Diagnostic {
            active_index: self.active_index,
            waypoint_count: self.waypoints.count(),
            course_deg: self.last_course,
            direction: Direction::from_course(self.last_course),
            last_distance_km: self.last_distance_km,
            phase: self.phase,
            fix: None,
        }
    }

    fn distance_to_active(&self, position: &Position) -> f64 {
        position.distance_km_to(&self.waypoints.at(self.active_index).position())
    }
}

/// Read-only snapshot of the navigator for logging.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Diagnostic {
    pub active_index: usize,
    pub waypoint_count: usize,
    pub course_deg: f64,
    pub direction: Direction,
    pub last_distance_km: Option<f64>,
    pub phase: NavPhase,
    /// Receiver state at the time of the snapshot, when the caller has one.
    pub fix: Option<GpsFix>,
}

impl Diagnostic {
    /// Attach the receiver's latest fix to the snapshot.
    pub fn with_fix(self, fix: GpsFix) -> Self {
        Self {
            fix: Some(fix),
            ..self
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "waypoint {}/{} ({}), course {:.1}° ({})",
            self.active_index + 1,
            self.waypoint_count,
            self.phase,
            self.course_deg,
            self.direction
        )?;
        match self.last_distance_km {
            Some(distance) => write!(f, ", {:.2} km to go", distance)?,
            None => write!(f, ", distance unknown")?,
        }

        let Some(fix) = self.fix else {
            return Ok(());
        };
        match fix.position.filter(|_| fix.has_fix) {
            Some(position) => write!(f, "; fix at {}", position)?,
            None => write!(f, "; no fix")?,
        }
        if let Some(satellites) = fix.satellites {
            write!(f, ", {} satellites", satellites)?;
        }
        if let Some(speed) = fix.speed_knots {
            write!(f, ", {:.1} kn", speed)?;
        }
        if let Some(time) = fix.fix_time {
            write!(f, " at {}", time.format("%H:%M:%S"))?;
        }
        Ok(())
    }
}
