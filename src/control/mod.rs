//! # Control Module
//!
//! Scaling primitives that turn raw device readings into calibrated channel
//! values and PWM duty cycles.
//!
//! This module handles:
//! - Bit resolutions and their maximum values
//! - Endpoint calibration with a trimmable midpoint
//! - Potentiometer scaling between resolutions, including half ranges
//! - Analog and on/off PWM duty-cycle generation for a 50Hz servo timer

pub mod binary_pwm;
pub mod endpoint;
pub mod potentiometer;
pub mod pwm;
pub mod range;
pub mod resolution;
pub mod scaling;
pub mod timing;
pub mod trim;

pub use binary_pwm::BinaryPwmControl;
pub use endpoint::EndpointCalibration;
pub use potentiometer::PotentiometerControl;
pub use pwm::PwmControl;
pub use range::RangeSelector;
pub use resolution::{Resolution, MAX_RESOLUTION_BITS, MIN_RESOLUTION_BITS};
pub use timing::{DUTY_RANGE, HALF_DUTY_RANGE, MAX_DUTY, MIN_DUTY};
pub use trim::{apply_trim, Trimmable};
