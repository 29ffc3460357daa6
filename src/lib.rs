pub mod compass;
pub mod config;
pub mod error;
pub mod geodesy;
pub mod gps_tracker;
pub mod logging;
pub mod motor;
pub mod navigator;
pub mod nmea_feed;
pub mod position;
pub mod waypoint;

// Re-export commonly used types
pub use error::NavError;
pub use gps_tracker::{GpsFix, GpsTracker, PositionSource, SharedTracker};
pub use navigator::{Diagnostic, NavPhase, Navigator, PositionSample};
pub use position::Position;
pub use waypoint::{Waypoint, WaypointStore};

#[cfg(test)]
pub(crate) mod mocks;
