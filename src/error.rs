use std::io;

/// Errors surfaced while setting up or running the vehicle.
///
/// Losing a GPS fix is deliberately absent: that is a normal operating mode
/// handled by the navigator, not a failure.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    #[error("waypoint plan is empty")]
    EmptyPlan,

    #[error("waypoint {index} out of range: ({latitude}, {longitude})")]
    InvalidWaypoint {
        index: usize,
        latitude: f64,
        longitude: f64,
    },

    #[error("invalid {name}: {value}")]
    InvalidSetting { name: &'static str, value: f64 },

    #[error("malformed waypoint plan: {0}")]
    PlanFormat(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("PWM error: {0}")]
    Pwm(#[from] rppal::pwm::Error),

    #[error("invalid PWM pin {0}, use 12, 13, 18 or 19")]
    InvalidPwmPin(u8),
}
