use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use crate::error::NavError;
use crate::position::Position;

/// A single point in the vehicle's plan, in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Waypoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl Waypoint {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.latitude, self.longitude)
    }
}

/// The ordered, read-only list of waypoints to visit.
///
/// A store is never empty: construction rejects empty plans, so anything
/// holding a `WaypointStore` can rely on `count() >= 1`.
#[derive(Clone, Debug)]
pub struct WaypointStore {
    waypoints: Vec<Waypoint>,
}

impl WaypointStore {
    pub fn new(waypoints: Vec<Waypoint>) -> Result<Self, NavError> {
        if waypoints.is_empty() {
            return Err(NavError::EmptyPlan);
        }

        for (index, waypoint) in waypoints.iter().enumerate() {
            if !waypoint.position().is_valid() {
                return Err(NavError::InvalidWaypoint {
                    index,
                    latitude: waypoint.latitude,
                    longitude: waypoint.longitude,
                });
            }
        }

        Ok(Self { waypoints })
    }

    /// Parse a plan from JSON: an array of `{"latitude": .., "longitude": ..}`.
    pub fn from_json<R: Read>(reader: R) -> Result<Self, NavError> {
        let waypoints: Vec<Waypoint> = serde_json::from_reader(reader)?;
        Self::new(waypoints)
    }

    /// Load a JSON plan from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, NavError> {
        let file = File::open(path)?;
        Self::from_json(BufReader::new(file))
    }

    pub fn count(&self) -> usize {
        self.waypoints.len()
    }

    pub fn last_index(&self) -> usize {
        self.waypoints.len() - 1
    }

    /// Waypoint at `index`.
    ///
    /// # Panics
    /// If `index >= count()`. The navigator never indexes past the last
    /// waypoint, so this indicates a bug in the caller.
    pub fn at(&self, index: usize) -> Waypoint {
        self.waypoints[index]
    }

    pub fn get(&self, index: usize) -> Option<Waypoint> {
        self.waypoints.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Waypoint> {
        self.waypoints.iter()
    }
}
