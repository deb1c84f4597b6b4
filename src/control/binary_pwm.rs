//! On/off PWM output for switch channels.

use super::scaling::{duty_from_register_value, invert};
use super::timing::REGISTER_MAX;

/// Maps a boolean state to a duty cycle.
///
/// The state becomes `65535` or `0`, is optionally inverted, clamped into
/// `[lower_endpoint, upper_endpoint]` and then scaled linearly into
/// `[MIN_DUTY, MAX_DUTY]`. There is no resolution or midpoint handling.
///
/// # Examples
///
/// ```
/// use rc_hid::control::{BinaryPwmControl, MAX_DUTY, MIN_DUTY};
///
/// let mut lights = BinaryPwmControl::new();
/// assert_eq!(lights.get_duty_cycle(true), MAX_DUTY);
/// assert_eq!(lights.get_duty_cycle(false), MIN_DUTY);
///
/// lights.set_inverted(true);
/// assert_eq!(lights.get_duty_cycle(true), MIN_DUTY);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryPwmControl {
    lower_endpoint: u16,
    upper_endpoint: u16,
    inverted: bool,
}

impl Default for BinaryPwmControl {
    fn default() -> Self {
        Self::new()
    }
}

impl BinaryPwmControl {
    /// Creates a control spanning the full `0..=65535` range.
    #[must_use]
    pub fn new() -> Self {
        Self {
            lower_endpoint: 0,
            upper_endpoint: REGISTER_MAX,
            inverted: false,
        }
    }

    #[must_use]
    pub fn get_duty_cycle(&self, on: bool) -> u16 {
        let mut value = if on { REGISTER_MAX } else { 0 };

        if self.inverted {
            value = invert(value, REGISTER_MAX);
        }

        let clamped = self.upper_endpoint.min(value.max(self.lower_endpoint));
        duty_from_register_value(clamped)
    }

    /// Limits the pre-scaling value to `[lower, upper]`.
    pub fn set_endpoints(&mut self, lower: u16, upper: u16) {
        self.lower_endpoint = lower;
        self.upper_endpoint = upper;
    }

    pub fn set_inverted(&mut self, inverted: bool) {
        self.inverted = inverted;
    }

    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    #[must_use]
    pub fn lower_endpoint(&self) -> u16 {
        self.lower_endpoint
    }

    #[must_use]
    pub fn upper_endpoint(&self) -> u16 {
        self.upper_endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::timing::{MAX_DUTY, MIN_DUTY};

    #[test]
    fn test_defaults() {
        let control = BinaryPwmControl::default();
        assert_eq!(control.lower_endpoint(), 0);
        assert_eq!(control.upper_endpoint(), 65535);
        assert!(!control.is_inverted());
    }

    #[test]
    fn test_on_off() {
        let control = BinaryPwmControl::new();
        assert_eq!(control.get_duty_cycle(true), MAX_DUTY);
        assert_eq!(control.get_duty_cycle(false), MIN_DUTY);
    }

    #[test]
    fn test_inverted_swaps() {
        let mut control = BinaryPwmControl::new();
        control.set_inverted(true);
        assert_eq!(control.get_duty_cycle(true), MIN_DUTY);
        assert_eq!(control.get_duty_cycle(false), MAX_DUTY);
    }

    #[test]
    fn test_upper_endpoint_limits_on() {
        let mut control = BinaryPwmControl::new();
        control.set_endpoints(0, 32767);
        assert_eq!(control.get_duty_cycle(true), 4914);
        assert_eq!(control.get_duty_cycle(false), MIN_DUTY);
    }

    #[test]
    fn test_lower_endpoint_limits_off() {
        let mut control = BinaryPwmControl::new();
        control.set_endpoints(32768, 65535);
        assert_eq!(control.get_duty_cycle(false), 4914);
        assert_eq!(control.get_duty_cycle(true), MAX_DUTY);
    }
}
