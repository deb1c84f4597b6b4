//! # PWM Control
//!
//! Converts an output-resolution value into a PWM duty cycle for the 50Hz
//! servo timer.
//!
//! ## Pipeline
//!
//! 1. Remap through the [`EndpointCalibration`]
//! 2. Add the additive trim, saturating into `[0, max_output]`
//! 3. Invert within `[0, max_output]` if configured
//! 4. Scale into `[MIN_DUTY, MAX_DUTY]`, or half of it for the half ranges
//!
//! The additive trim here is independent of the calibration's midpoint trim:
//! it shifts the whole output, endpoints included.

use super::endpoint::EndpointCalibration;
use super::range::RangeSelector;
use super::resolution::Resolution;
use super::scaling::{duty_from_value, invert};
use super::trim::{apply_trim, Trimmable};

/// Produces duty-cycle register values from calibrated channel values.
///
/// # Examples
///
/// ```
/// use rc_hid::control::{PwmControl, RangeSelector, Resolution, MAX_DUTY, MIN_DUTY};
///
/// let servo = PwmControl::new(Resolution::BITS_12);
/// assert_eq!(servo.get_duty_cycle(0, RangeSelector::FullWidth), MIN_DUTY);
/// assert_eq!(servo.get_duty_cycle(4095, RangeSelector::FullWidth), MAX_DUTY);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PwmControl {
    calibration: EndpointCalibration,
    /// Additive trim applied after calibration.
    output_trim: i32,
    inverted: bool,
}

impl PwmControl {
    /// Creates a control with identity calibration, no trim and no inversion.
    #[must_use]
    pub fn new(resolution: Resolution) -> Self {
        Self {
            calibration: EndpointCalibration::new(resolution),
            output_trim: 0,
            inverted: false,
        }
    }

    /// Converts `input` (already at this control's resolution) to a duty cycle.
    #[must_use]
    pub fn get_duty_cycle(&self, input: u16, range: RangeSelector) -> u16 {
        let max_output = self.calibration.max_output();

        let mut value = self.calibration.remap(input);
        value = apply_trim(value, max_output, self);

        if self.inverted {
            value = invert(value, max_output);
        }

        duty_from_value(value, max_output, range)
    }

    /// Sets the calibration endpoints and midpoint trim.
    pub fn set_endpoints(&mut self, lower: u16, upper: u16, trim: i32) {
        self.calibration.set_endpoints(lower, upper, trim);
    }

    /// Sets the additive output trim.
    pub fn set_trim(&mut self, trim: i32) {
        self.output_trim = trim;
    }

    /// Enables or disables inversion.
    pub fn set_inverted(&mut self, inverted: bool) {
        self.inverted = inverted;
    }

    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    #[must_use]
    pub fn calibration(&self) -> &EndpointCalibration {
        &self.calibration
    }
}

impl Trimmable for PwmControl {
    fn trim(&self) -> i32 {
        self.output_trim
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::timing::{MAX_DUTY, MIN_DUTY};

    fn servo() -> PwmControl {
        PwmControl::new(Resolution::BITS_12)
    }

    #[test]
    fn test_new_defaults() {
        let control = servo();
        assert_eq!(Trimmable::trim(&control), 0);
        assert!(!control.is_inverted());
        assert!(control.calibration().is_identity());
    }

    #[test]
    fn test_full_width_extremes() {
        let control = servo();
        assert_eq!(control.get_duty_cycle(0, RangeSelector::FullWidth), MIN_DUTY);
        assert_eq!(control.get_duty_cycle(4095, RangeSelector::FullWidth), MAX_DUTY);
        assert_eq!(control.get_duty_cycle(2047, RangeSelector::FullWidth), 4913);
    }

    #[test]
    fn test_16_bit_extremes() {
        let control = PwmControl::new(Resolution::BITS_16);
        assert_eq!(control.get_duty_cycle(0, RangeSelector::FullWidth), MIN_DUTY);
        assert_eq!(control.get_duty_cycle(65535, RangeSelector::FullWidth), MAX_DUTY);
        assert_eq!(control.get_duty_cycle(32767, RangeSelector::FullWidth), 4914);
    }

    #[test]
    fn test_lower_half() {
        let control = servo();
        assert_eq!(control.get_duty_cycle(0, RangeSelector::LowerHalf), 4914);
        assert_eq!(control.get_duty_cycle(4095, RangeSelector::LowerHalf), MIN_DUTY);
    }

    #[test]
    fn test_upper_half() {
        let control = servo();
        assert_eq!(control.get_duty_cycle(0, RangeSelector::UpperHalf), 4914);
        assert_eq!(control.get_duty_cycle(4095, RangeSelector::UpperHalf), 8190);
    }

    #[test]
    fn test_calibrated_endpoints() {
        let mut control = servo();
        control.set_endpoints(1000, 3000, 0);
        assert_eq!(control.get_duty_cycle(0, RangeSelector::FullWidth), 3238);
        assert_eq!(control.get_duty_cycle(4095, RangeSelector::FullWidth), 6438);
    }

    #[test]
    fn test_positive_trim() {
        let mut control = servo();
        control.set_trim(100);
        // 6553 * 100 / 4095 = 160
        assert_eq!(control.get_duty_cycle(0, RangeSelector::FullWidth), 1798);
    }

    #[test]
    fn test_positive_trim_saturates_at_max() {
        let mut control = servo();
        control.set_trim(100);
        assert_eq!(control.get_duty_cycle(4000, RangeSelector::FullWidth), MAX_DUTY);
        assert_eq!(control.get_duty_cycle(4095, RangeSelector::FullWidth), MAX_DUTY);
    }

    #[test]
    fn test_negative_trim_saturates_at_zero() {
        let mut control = servo();
        control.set_trim(-100);
        assert_eq!(control.get_duty_cycle(0, RangeSelector::FullWidth), MIN_DUTY);
        assert_eq!(control.get_duty_cycle(50, RangeSelector::FullWidth), MIN_DUTY);
        assert_eq!(control.get_duty_cycle(4095, RangeSelector::FullWidth), 8030);
    }

    #[test]
    fn test_inverted() {
        let mut control = servo();
        control.set_inverted(true);
        assert_eq!(control.get_duty_cycle(0, RangeSelector::FullWidth), MAX_DUTY);
        assert_eq!(control.get_duty_cycle(4095, RangeSelector::FullWidth), MIN_DUTY);
        assert_eq!(control.get_duty_cycle(0, RangeSelector::UpperHalf), 8190);
        assert_eq!(control.get_duty_cycle(4095, RangeSelector::LowerHalf), 4914);
    }

    #[test]
    fn test_trim_is_separate_from_midpoint_trim() {
        let mut control = servo();
        control.set_endpoints(0, 4095, 50);
        assert_eq!(Trimmable::trim(&control), 0);
        assert_eq!(control.calibration().trim(), 50);

        control.set_trim(-7);
        assert_eq!(Trimmable::trim(&control), -7);
        assert_eq!(control.calibration().trim(), 50);
    }
}
