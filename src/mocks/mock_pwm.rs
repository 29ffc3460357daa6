// This file is only compiled during tests

use std::cell::RefCell;
use std::collections::HashMap;

use crate::error::NavError;

thread_local! {
    static MOCK_PWM_DUTY: RefCell<HashMap<u8, f64>> = RefCell::new(HashMap::new());
}

pub struct Pwm {
    pin: u8,
}

impl Pwm {
    pub fn new(pin: u8, duty_cycle: f64) -> Result<Self, NavError> {
        let mut pwm = Pwm { pin };
        pwm.set_duty_cycle(duty_cycle)?;
        Ok(pwm)
    }

    pub fn set_duty_cycle(&mut self, duty_cycle: f64) -> Result<(), NavError> {
        MOCK_PWM_DUTY.with(|duty| {
            duty.borrow_mut().insert(self.pin, duty_cycle);
        });
        Ok(())
    }

    pub fn disable(&mut self) -> Result<(), NavError> {
        Ok(())
    }
}

// Test helper
pub fn get_mock_duty_cycle(pin: u8) -> f64 {
    MOCK_PWM_DUTY.with(|duty| duty.borrow().get(&pin).copied().unwrap_or(0.0))
}
