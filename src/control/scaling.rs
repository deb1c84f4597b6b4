//! # Scaling Functions
//!
//! Pure numeric steps shared by the channel controls. None of these hold
//! state; the controls combine them with their calibration.
//!
//! Float-to-integer conversion always truncates toward zero and saturates at
//! the `u16` bounds (negative and NaN become 0).

use super::range::RangeSelector;
use super::timing::{DUTY_RANGE, HALF_DUTY_RANGE, MIN_DUTY, REGISTER_MAX};

/// Truncates a float to `u16`, saturating out-of-range values.
#[inline]
#[must_use]
pub fn truncate(value: f64) -> u16 {
    value as u16
}

/// Rescales `input` from `[0, input_max]` to `[0, output_max]`.
///
/// Uses integer division with a 64-bit intermediate. Inputs above
/// `input_max` scale proportionally and saturate at `u16::MAX`.
///
/// # Examples
///
/// ```
/// use rc_hid::control::scaling::rescale_resolution;
///
/// // 16-bit midpoint to 12-bit
/// assert_eq!(rescale_resolution(32767, 65535, 4095), 2047);
/// // 8-bit full scale to 12-bit
/// assert_eq!(rescale_resolution(255, 255, 4095), 4095);
/// ```
#[must_use]
pub fn rescale_resolution(input: u16, input_max: u16, output_max: u16) -> u16 {
    let scaled = u64::from(output_max) * u64::from(input) / u64::from(input_max.max(1));
    u16::try_from(scaled).unwrap_or(u16::MAX)
}

/// Projects a full-span value onto half of the span, pivoting at `half_max`.
///
/// `LowerHalf` maps `0` to the midpoint and full scale to `0`; `UpperHalf`
/// maps `0` to the midpoint and full scale to the top. `FullWidth` leaves the
/// value untouched.
#[must_use]
pub fn project_half(value: u16, half_max: f64, range: RangeSelector) -> u16 {
    match range {
        RangeSelector::FullWidth => value,
        RangeSelector::LowerHalf => truncate(half_max - f64::from(value) / 2.0),
        RangeSelector::UpperHalf => truncate(half_max + f64::from(value) / 2.0),
    }
}

/// Mirrors `value` within `[0, max]`.
#[inline]
#[must_use]
pub fn invert(value: u16, max: u16) -> u16 {
    max.saturating_sub(value)
}

/// Scales `value / max` onto `span`, truncating.
#[inline]
fn scale_onto(span: u16, value: u16, max: u16) -> u16 {
    let scaled = u64::from(span) * u64::from(value) / u64::from(max.max(1));
    u16::try_from(scaled).unwrap_or(u16::MAX)
}

/// Converts an output-resolution value into a PWM duty cycle.
///
/// - `FullWidth`: `DUTY_RANGE * value / max + MIN_DUTY`
/// - `LowerHalf`: from the centre pulse down to the shortest pulse
/// - `UpperHalf`: from the centre pulse up to the longest pulse
///
/// # Examples
///
/// ```
/// use rc_hid::control::scaling::duty_from_value;
/// use rc_hid::control::{RangeSelector, MAX_DUTY, MIN_DUTY};
///
/// assert_eq!(duty_from_value(0, 4095, RangeSelector::FullWidth), MIN_DUTY);
/// assert_eq!(duty_from_value(4095, 4095, RangeSelector::FullWidth), MAX_DUTY);
/// ```
#[must_use]
pub fn duty_from_value(value: u16, max: u16, range: RangeSelector) -> u16 {
    match range {
        RangeSelector::FullWidth => scale_onto(DUTY_RANGE, value, max).saturating_add(MIN_DUTY),
        RangeSelector::LowerHalf => {
            let half = scale_onto(HALF_DUTY_RANGE, value, max);
            HALF_DUTY_RANGE.saturating_sub(half).saturating_add(MIN_DUTY)
        }
        RangeSelector::UpperHalf => {
            let half = scale_onto(HALF_DUTY_RANGE, value, max);
            half.saturating_add(HALF_DUTY_RANGE).saturating_add(MIN_DUTY)
        }
    }
}

/// Converts a full 16-bit value (`0..=65535`) into a duty cycle.
#[must_use]
pub fn duty_from_register_value(value: u16) -> u16 {
    scale_onto(DUTY_RANGE, value, REGISTER_MAX).saturating_add(MIN_DUTY)
}
