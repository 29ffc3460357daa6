use std::time::Duration;

// ** NAVIGATION CONFIGURATION ** //

/// Mean Earth radius used by the great-circle formulas (km).
pub const EARTH_RADIUS_KM: f64 = 6371.0;
/// A waypoint counts as reached once we are closer than this (km).
pub const WAYPOINT_RADIUS_KM: f64 = 5.0;
/// Course held before the first fix arrives. Due east.
pub const DEFAULT_COURSE_DEG: f64 = 90.0;

// ** GPS CONFIGURATION ** //

/// Serial device the GPS receiver is wired to.
pub const GPS_DEVICE: &str = "/dev/serial0";
/// Receiver baud rate. The port is expected to be configured before launch.
pub const GPS_BAUD_RATE: u32 = 9600;

// ** MOTOR CONFIGURATION ** //

/// Hardware PWM pins for the two ESCs
/// - GPIO 18 (PWM0) left
/// - GPIO 19 (PWM1) right
pub const LEFT_MOTOR_PIN: u8 = 18;
pub const RIGHT_MOTOR_PIN: u8 = 19;
/// Commanded power range.
pub const MOTOR_FULL_FORWARD: i32 = 1000;
pub const MOTOR_FULL_REVERSE: i32 = -1000;
/// ESC pulse width range (microseconds), full reverse to full forward.
pub const ESC_MIN_PULSE_US: i32 = 1000;
pub const ESC_MAX_PULSE_US: i32 = 2000;
pub const ESC_FREQUENCY_HZ: f64 = 50.0;
/// ESCs need a few seconds of neutral signal before they accept commands.
pub const ESC_ARM_DELAY: Duration = Duration::from_secs(5);
/// Forward power while underway.
pub const CRUISE_POWER: i32 = 600;

/// PID controller gains (turn power per degree of heading error)
pub const KP: f64 = 10.0;
pub const KI: f64 = 0.0; // disabled for now
pub const KD: f64 = 0.0; // disabled for now
/// Heading errors smaller than this are ignored (degrees).
pub const HEADING_ERROR_DEADBAND: f64 = 2.0;
/// Largest differential turn power the controller will command.
pub const MAX_TURN_POWER: i32 = 400;

// ** MAIN CONFIGURATION ** //
pub const CONTROL_INTERVAL: Duration = Duration::from_millis(100); // 10Hz
pub const DIAGNOSTIC_INTERVAL: Duration = Duration::from_secs(5);
