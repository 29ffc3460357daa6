use std::sync::{Arc, Mutex};

use chrono::NaiveTime;

use crate::navigator::PositionSample;
use crate::position::Position;

/// Anything the navigator can poll for the latest position.
pub trait PositionSource {
    fn sample(&self) -> PositionSample;
}

/// One complete reading from the GPS receiver.
///
/// Fixes are published whole, so a reader always sees fields that belong to
/// the same sentence batch.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GpsFix {
    pub has_fix: bool,
    pub position: Option<Position>,
    pub satellites: Option<u32>,
    pub speed_knots: Option<f64>,
    pub course_over_ground: Option<f64>, // degrees
    pub fix_time: Option<NaiveTime>,
}

impl GpsFix {
    /// What the navigator needs to know about this fix.
    pub fn sample(&self) -> PositionSample {
        match self.position {
            Some(position) if self.has_fix => {
                PositionSample::fix(position.latitude, position.longitude)
            }
            _ => PositionSample::no_fix(),
        }
    }
}

/// Holds the freshest fix published by the NMEA feed.
#[derive(Debug, Default)]
pub struct GpsTracker {
    latest: GpsFix,
    updates: u64,
}

/// Tracker shared between the feed thread (writer) and control loop (reader).
pub type SharedTracker = Arc<Mutex<GpsTracker>>;

impl GpsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedTracker {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Replace the current fix with a newer one.
    pub fn publish(&mut self, fix: GpsFix) {
        self.latest = fix;
        self.updates += 1;
    }

    pub fn latest(&self) -> GpsFix {
        self.latest
    }

    /// Number of fixes published so far.
    pub fn updates(&self) -> u64 {
        self.updates
    }

    pub fn current_position(&self) -> Option<Position> {
        self.latest.position.filter(|_| self.latest.has_fix)
    }

    /// Course over ground reported by the receiver. Only meaningful while
    /// the vehicle is moving.
    pub fn current_heading(&self) -> Option<f64> {
        self.latest.course_over_ground.filter(|_| self.latest.has_fix)
    }
}

/// Copy out the tracker's latest fix. A poisoned lock reads as no fix.
pub fn latest_fix(tracker: &Mutex<GpsTracker>) -> GpsFix {
    tracker
        .lock()
        .map(|tracker| tracker.latest())
        .unwrap_or_default()
}

impl PositionSource for GpsTracker {
    fn sample(&self) -> PositionSample {
        self.latest.sample()
    }
}

impl PositionSource for Mutex<GpsTracker> {
    fn sample(&self) -> PositionSample {
        // A writer that panicked mid-publish leaves nothing we can trust.
        match self.lock() {
            Ok(tracker) => tracker.sample(),
            Err(_) => PositionSample::no_fix(),
        }
    }
}

impl<S: PositionSource + ?Sized> PositionSource for Arc<S> {
    fn sample(&self) -> PositionSample {
        (**self).sample()
    }
}
