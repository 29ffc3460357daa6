pub mod mock_pwm;
