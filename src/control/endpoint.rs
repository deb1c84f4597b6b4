//! # Endpoint Calibration
//!
//! Remaps a value already expressed at the output resolution into a
//! calibrated sub-range `[lower_endpoint, upper_endpoint]`.
//!
//! ## Remap
//!
//! When an endpoint sits at the edge of the span the map is a single linear
//! segment anchored at that edge. When both endpoints are interior the map is
//! two linear segments pivoting at `half_max_output`:
//!
//! ```text
//!   output
//!   upper ┤                 ╱
//!         │             ╱
//!     mid ┤ ─ ─ ─ ─ ─ ●         mid = half_max_output + trim
//!         │       ╱
//!   lower ┤  ╱
//!         └──┬────────┬────────┬── value
//!            0   half_max_output  max
//! ```
//!
//! The two slopes are independent, so `0` lands on `lower_endpoint`, `max`
//! on `upper_endpoint`, and the pivot exactly on the trimmed midpoint.
//!
//! ## Usage
//!
//! ```
//! use rc_hid::control::{EndpointCalibration, Resolution};
//!
//! let mut cal = EndpointCalibration::new(Resolution::BITS_12);
//! assert_eq!(cal.remap(1234), 1234); // identity until endpoints are set
//!
//! cal.set_endpoints(1000, 3900, 0);
//! assert_eq!(cal.remap(0), 1000);
//! assert_eq!(cal.remap(4095), 3900);
//! ```

use super::resolution::Resolution;
use super::scaling::truncate;

/// Calibrated output bounds and the slopes derived from them.
///
/// Created with the identity calibration (`0`, `max_output`, trim `0`).
/// All derived fields are recomputed together by
/// [`set_endpoints`](Self::set_endpoints).
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointCalibration {
    max_output: u16,
    half_max_output: f64,
    lower_endpoint: u16,
    upper_endpoint: u16,
    /// Shift of the logical midpoint, in output units.
    trim: i32,
    output_mid_point: f64,
    ratio: f64,
    upper_ratio: f64,
    lower_ratio: f64,
}

impl EndpointCalibration {
    /// Creates an identity calibration for the given output resolution.
    #[must_use]
    pub fn new(output: Resolution) -> Self {
        let max_output = output.max_value();
        let mut calibration = Self {
            max_output,
            half_max_output: f64::from(max_output) / 2.0,
            lower_endpoint: 0,
            upper_endpoint: max_output,
            trim: 0,
            output_mid_point: 0.0,
            ratio: 0.0,
            upper_ratio: 0.0,
            lower_ratio: 0.0,
        };
        calibration.set_endpoints(0, max_output, 0);
        calibration
    }

    /// Sets the output bounds and midpoint trim.
    ///
    /// # Arguments
    ///
    /// * `lower` - Lowest calibrated output, `lower <= upper`
    /// * `upper` - Highest calibrated output, `upper <= max_output`
    /// * `trim` - Signed shift of the midpoint; any magnitude is accepted
    ///
    /// Ordering is the caller's contract. Out-of-order endpoints produce a
    /// negative-width span that maps backwards; a trim that moves
    /// the midpoint outside the endpoints makes one slope change sign.
    pub fn set_endpoints(&mut self, lower: u16, upper: u16, trim: i32) {
        let output_mid_point = self.half_max_output + f64::from(trim);

        *self = Self {
            lower_endpoint: lower,
            upper_endpoint: upper,
            trim,
            output_mid_point,
            ratio: (f64::from(upper) - f64::from(lower)) / f64::from(self.max_output),
            upper_ratio: (f64::from(upper) - output_mid_point) / self.half_max_output,
            lower_ratio: (output_mid_point - f64::from(lower)) / self.half_max_output,
            ..*self
        };
    }

    /// Maps an output-resolution value into the calibrated range.
    ///
    /// Branches are checked in order:
    ///
    /// 1. lower endpoint at zero: `value * ratio`
    /// 2. upper endpoint at max: `value * ratio + lower`
    /// 3. above the pivot: `(value - half) * upper_ratio + mid`
    /// 4. otherwise: `mid - (half - value) * lower_ratio`
    ///
    /// Arithmetic is `f64` and the result is truncated once at the end.
    #[must_use]
    pub fn remap(&self, value: u16) -> u16 {
        let value = f64::from(value);

        if self.lower_endpoint == 0 {
            return truncate(value * self.ratio);
        }

        if self.upper_endpoint == self.max_output {
            return truncate(value * self.ratio + f64::from(self.lower_endpoint));
        }

        if value > self.half_max_output {
            return truncate((value - self.half_max_output) * self.upper_ratio + self.output_mid_point);
        }

        truncate(self.output_mid_point - (self.half_max_output - value) * self.lower_ratio)
    }

    /// Returns the largest value at the output resolution.
    #[must_use]
    pub fn max_output(&self) -> u16 {
        self.max_output
    }

    /// Returns `max_output / 2` as a float.
    #[must_use]
    pub fn half_max_output(&self) -> f64 {
        self.half_max_output
    }

    /// Returns the configured lower endpoint.
    #[must_use]
    pub fn lower_endpoint(&self) -> u16 {
        self.lower_endpoint
    }

    /// Returns the configured upper endpoint.
    #[must_use]
    pub fn upper_endpoint(&self) -> u16 {
        self.upper_endpoint
    }

    /// Returns the midpoint trim.
    #[must_use]
    pub fn trim(&self) -> i32 {
        self.trim
    }

    /// Returns `half_max_output + trim`.
    #[must_use]
    pub fn output_mid_point(&self) -> f64 {
        self.output_mid_point
    }

    /// Returns `true` for the untouched `0..=max_output` calibration.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.lower_endpoint == 0 && self.upper_endpoint == self.max_output && self.trim == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cal(bits: u8) -> EndpointCalibration {
        EndpointCalibration::new(Resolution::new(bits).unwrap())
    }

    // ==================== Construction Tests ====================

    #[test]
    fn test_new_16_bit() {
        let cal = cal(16);
        assert_eq!(cal.max_output(), 65535);
        assert_eq!(cal.lower_endpoint(), 0);
        assert_eq!(cal.upper_endpoint(), 65535);
        assert_eq!(cal.trim(), 0);
        assert!(cal.is_identity());
    }

    #[test]
    fn test_new_12_bit_midpoint() {
        let cal = cal(12);
        assert_eq!(cal.half_max_output(), 2047.5);
        assert_eq!(cal.output_mid_point(), 2047.5);
    }

    #[test]
    fn test_set_endpoints() {
        let mut cal = cal(16);
        cal.set_endpoints(12000, 45000, 0);
        assert_eq!(cal.lower_endpoint(), 12000);
        assert_eq!(cal.upper_endpoint(), 45000);
        assert!(!cal.is_identity());
    }

    #[test]
    fn test_set_endpoints_trim_moves_midpoint() {
        let mut cal = cal(12);
        cal.set_endpoints(1000, 3900, -12);
        assert_eq!(cal.trim(), -12);
        assert_eq!(cal.output_mid_point(), 2035.5);

        cal.set_endpoints(1000, 3900, 300);
        assert_eq!(cal.output_mid_point(), 2347.5);
    }

    #[test]
    fn test_set_endpoints_keeps_resolution() {
        let mut cal = cal(12);
        cal.set_endpoints(10, 20, 5);
        assert_eq!(cal.max_output(), 4095);
        assert_eq!(cal.half_max_output(), 2047.5);
    }

    // ==================== Remap Tests ====================

    #[test]
    fn test_identity_remap() {
        for bits in 1..=16 {
            let cal = cal(bits);
            let max = cal.max_output();
            let step = (max / 512).max(1);
            let mut value = 0u16;
            loop {
                assert_eq!(cal.remap(value), value, "{} bits, value {}", bits, value);
                match value.checked_add(step) {
                    Some(next) if next <= max => value = next,
                    _ => break,
                }
            }
            assert_eq!(cal.remap(max), max);
        }
    }

    #[test]
    fn test_remap_anchored_at_zero() {
        let mut cal = cal(12);
        cal.set_endpoints(0, 2000, 0);
        assert_eq!(cal.remap(0), 0);
        assert_eq!(cal.remap(4095), 2000);
    }

    #[test]
    fn test_remap_anchored_at_top() {
        let mut cal = cal(12);
        cal.set_endpoints(500, 4095, 0);
        assert_eq!(cal.remap(0), 500);
        assert_eq!(cal.remap(4095), 4095);
    }

    #[test]
    fn test_remap_interior_endpoints() {
        let mut cal = cal(12);
        cal.set_endpoints(1000, 3900, 0);
        assert_eq!(cal.remap(0), 1000);
        assert_eq!(cal.remap(4095), 3900);
        assert_eq!(cal.remap(2047), 2047);
        // Just above the pivot the upper slope (< 1) truncates back onto 2047
        assert_eq!(cal.remap(2048), 2047);
    }

    #[test]
    fn test_remap_interior_endpoints_16_bit() {
        let mut cal = cal(16);
        cal.set_endpoints(12000, 45000, 0);
        assert_eq!(cal.remap(0), 12000);
        assert_eq!(cal.remap(65535), 45000);
        assert_eq!(cal.remap(32767), 32767);
    }

    #[test]
    fn test_remap_trim_shifts_pivot_only() {
        let mut cal = cal(12);
        cal.set_endpoints(1000, 3900, -12);
        assert_eq!(cal.remap(2047), 2035);
        assert_eq!(cal.remap(0), 1000);
        assert_eq!(cal.remap(4095), 3900);
    }

    #[test]
    fn test_remap_large_trim_outside_endpoints() {
        let mut cal = cal(12);
        // Midpoint 47.5 sits below the lower endpoint: accepted, not an error
        cal.set_endpoints(1000, 3900, -2000);
        assert_eq!(cal.remap(0), 1000);
        assert_eq!(cal.remap(4095), 3900);
        assert!(cal.remap(2047) < 1000);
    }

    #[test]
    fn test_remap_out_of_order_endpoints() {
        let mut cal = cal(12);
        // Caller contract violation: the mapping runs backwards, no error is raised
        cal.set_endpoints(3000, 1000, 0);
        assert_eq!(cal.remap(0), 3000);
        assert_eq!(cal.remap(4095), 1000);
        cal.set_endpoints(0, 0, 0);
        assert_eq!(cal.remap(4095), 0);
    }

    #[test]
    fn test_remap_monotonic_within_endpoints() {
        let mut cal = cal(12);
        for (lower, upper, trim) in [(1000, 3900, 0), (15, 3760, -217), (335, 2790, -122), (659, 3455, 0)] {
            cal.set_endpoints(lower, upper, trim);
            let mut previous = 0;
            for value in 0..=4095u16 {
                let out = cal.remap(value);
                assert!(out >= previous, "({}, {}, {}) not monotonic at {}", lower, upper, trim, value);
                previous = out;
            }
        }
    }
}
