use std::thread;
use std::time::Duration;

use tracing::{debug, info};

// Use rppal in production
#[cfg(not(test))]
use rppal::pwm::{Channel, Polarity, Pwm};

// Mock PWM for testing
#[cfg(test)]
use crate::mocks::mock_pwm::Pwm;

use crate::config::{
    ESC_FREQUENCY_HZ, ESC_MAX_PULSE_US, ESC_MIN_PULSE_US, HEADING_ERROR_DEADBAND, KD, KI, KP,
    LEFT_MOTOR_PIN, MAX_TURN_POWER, MOTOR_FULL_FORWARD, MOTOR_FULL_REVERSE, RIGHT_MOTOR_PIN,
};
use crate::error::NavError;
use crate::geodesy::course_to_bearing;

/// Map commanded power onto an ESC pulse width.
/// -1000 → 1000μs (full reverse), 0 → 1500μs, +1000 → 2000μs (full forward)
pub fn power_to_pulse_us(power: i32) -> i32 {
    let power = power.clamp(MOTOR_FULL_REVERSE, MOTOR_FULL_FORWARD);
    (power - MOTOR_FULL_REVERSE) * (ESC_MAX_PULSE_US - ESC_MIN_PULSE_US)
        / (MOTOR_FULL_FORWARD - MOTOR_FULL_REVERSE)
        + ESC_MIN_PULSE_US
}

/// One thruster driven through an ESC on a hardware PWM pin.
pub struct Motor {
    pwm: Pwm,
    pin: u8,
    power: i32,
}

impl Motor {
    /// Open the PWM channel behind `pin`.
    /// Hardware PWM is available on:
    /// - GPIO 12 / 18 (PWM0)
    /// - GPIO 13 / 19 (PWM1)
    pub fn new(pin: u8) -> Result<Self, NavError> {
        #[cfg(not(test))]
        let channel = match pin {
            12 | 18 => Channel::Pwm0,
            13 | 19 => Channel::Pwm1,
            _ => return Err(NavError::InvalidPwmPin(pin)),
        };

        #[cfg(not(test))]
        let pwm = Pwm::with_frequency(
            channel,
            ESC_FREQUENCY_HZ,
            neutral_duty_cycle(),
            Polarity::Normal,
            true, // enabled
        )?;

        #[cfg(test)]
        let pwm = Pwm::new(pin, neutral_duty_cycle())?;

        Ok(Self {
            pwm,
            pin,
            power: 0,
        })
    }

    /// Hold neutral for `delay` so the ESC can arm.
    pub fn arm(&mut self, delay: Duration) -> Result<(), NavError> {
        self.set_power(0)?;
        info!(pin = self.pin, ?delay, "arming ESC");
        thread::sleep(delay);
        Ok(())
    }

    /// Set power between full reverse (-1000) and full forward (1000).
    /// Values outside that range are clamped.
    pub fn set_power(&mut self, power: i32) -> Result<(), NavError> {
        let power = power.clamp(MOTOR_FULL_REVERSE, MOTOR_FULL_FORWARD);
        let pulse_us = power_to_pulse_us(power);

        // Period = 1/50Hz = 20ms = 20000μs
        let period_us = 1_000_000.0 / ESC_FREQUENCY_HZ;
        self.pwm.set_duty_cycle(f64::from(pulse_us) / period_us)?;

        self.power = power;
        Ok(())
    }

    pub fn power(&self) -> i32 {
        self.power
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Disable PWM output
    pub fn disable(&mut self) -> Result<(), NavError> {
        self.pwm.disable()?;
        Ok(())
    }
}

impl Drop for Motor {
    fn drop(&mut self) {
        // Ensure the ESC sees neutral, then release the pin
        let _ = self.set_power(0);
        let _ = self.disable();
    }
}

fn neutral_duty_cycle() -> f64 {
    f64::from(power_to_pulse_us(0)) * ESC_FREQUENCY_HZ / 1_000_000.0
}

/// Port and starboard thrusters steering by differential power.
pub struct MotorPair {
    left: Motor,
    right: Motor,
}

impl MotorPair {
    pub fn new(left: Motor, right: Motor) -> Self {
        Self { left, right }
    }

    /// Open the default left/right PWM pins.
    pub fn open() -> Result<Self, NavError> {
        Ok(Self::new(
            Motor::new(LEFT_MOTOR_PIN)?,
            Motor::new(RIGHT_MOTOR_PIN)?,
        ))
    }

    /// Hold both ESCs at neutral for `delay`.
    pub fn arm(&mut self, delay: Duration) -> Result<(), NavError> {
        self.stop()?;
        info!(?delay, "arming ESCs");
        thread::sleep(delay);
        Ok(())
    }

    /// Positive `turn` pushes the left motor harder, turning to starboard.
    pub fn drive(&mut self, forward: i32, turn: i32) -> Result<(), NavError> {
        self.left.set_power(forward.saturating_add(turn))?;
        self.right.set_power(forward.saturating_sub(turn))?;
        debug!(
            left = self.left.power(),
            right = self.right.power(),
            "motors updated"
        );
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), NavError> {
        self.drive(0, 0)
    }

    pub fn powers(&self) -> (i32, i32) {
        (self.left.power(), self.right.power())
    }
}

/// PID control law turning a course error into differential turn power.
#[derive(Debug, Default)]
pub struct HeadingController {
    integral: f64,
    last_error: f64,
}

impl HeadingController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculate steering correction
    ///
    /// # Arguments
    /// * `target_course` - Course from the navigator (degrees)
    /// * `current_heading` - GPS course over ground, if moving (degrees)
    /// * `dt` - Time delta since last update (seconds)
    ///
    /// # Returns
    /// Turn power (-MAX_TURN_POWER to +MAX_TURN_POWER), positive to starboard.
    /// Without a heading there is nothing to correct against and the result is 0.
    pub fn correction(&mut self, target_course: f64, current_heading: Option<f64>, dt: f64) -> i32 {
        let Some(current_heading) = current_heading else {
            return 0;
        };

        // Error wrapped to -180 to +180
        let error = course_to_bearing(target_course - current_heading);

        // Apply deadband - don't correct small errors
        if error.abs() < HEADING_ERROR_DEADBAND {
            self.last_error = error;
            return 0;
        }

        let p_term = KP * error;

        self.integral += error * dt;
        let i_term = KI * self.integral;

        let d_term = if dt > 0.0 {
            KD * (error - self.last_error) / dt
        } else {
            0.0
        };

        self.last_error = error;

        let correction = (p_term + i_term + d_term).round() as i32;
        correction.clamp(-MAX_TURN_POWER, MAX_TURN_POWER)
    }

    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.last_error = 0.0;
    }
}
