//! # Potentiometer Control
//!
//! Converts a raw analog sample at its input resolution into a calibrated
//! value at the output resolution.
//!
//! ## Pipeline
//!
//! 1. Rescale `input` from `[0, input_max]` to `[0, max_output]` (integer)
//! 2. Project onto half the span for `LowerHalf` / `UpperHalf`
//! 3. Invert within `[0, max_output]` if configured
//! 4. Remap through the [`EndpointCalibration`]
//!
//! ## Usage
//!
//! ```
//! use rc_hid::control::{PotentiometerControl, RangeSelector, Resolution};
//!
//! // 16-bit steering axis to 12-bit channel
//! let mut steering = PotentiometerControl::new(Resolution::BITS_16, Resolution::BITS_12);
//! assert_eq!(steering.get_output_value(32767, RangeSelector::FullWidth), 2047);
//!
//! steering.set_endpoints(1000, 3900, 0);
//! assert_eq!(steering.get_output_value(0, RangeSelector::FullWidth), 1000);
//! assert_eq!(steering.get_output_value(65535, RangeSelector::FullWidth), 3900);
//! ```

use super::endpoint::EndpointCalibration;
use super::range::RangeSelector;
use super::resolution::Resolution;
use super::scaling::{invert, project_half, rescale_resolution};

/// Maps raw potentiometer samples onto a calibrated output range.
#[derive(Debug, Clone, PartialEq)]
pub struct PotentiometerControl {
    input_resolution: Resolution,
    output_resolution: Resolution,
    input_max_value: u16,
    inverted: bool,
    calibration: EndpointCalibration,
}

impl PotentiometerControl {
    /// Creates a control with identity calibration and no inversion.
    ///
    /// # Arguments
    ///
    /// * `input` - Resolution of the raw samples (e.g. 8-bit pedal, 16-bit wheel)
    /// * `output` - Resolution of the produced values
    #[must_use]
    pub fn new(input: Resolution, output: Resolution) -> Self {
        Self {
            input_resolution: input,
            output_resolution: output,
            input_max_value: input.max_value(),
            inverted: false,
            calibration: EndpointCalibration::new(output),
        }
    }

    /// Converts a raw sample into a calibrated output value.
    ///
    /// # Arguments
    ///
    /// * `input` - Raw sample in `[0, input_max_value]`. Larger values are not
    ///   rejected; they scale proportionally and saturate.
    /// * `range` - Which part of the output span to project onto
    ///
    /// # Examples
    ///
    /// ```
    /// use rc_hid::control::{PotentiometerControl, RangeSelector, Resolution};
    ///
    /// let throttle = PotentiometerControl::new(Resolution::BITS_8, Resolution::BITS_12);
    ///
    /// // Released pedal sits at the midpoint in either half
    /// assert_eq!(throttle.get_output_value(0, RangeSelector::UpperHalf), 2047);
    /// assert_eq!(throttle.get_output_value(0, RangeSelector::LowerHalf), 2047);
    ///
    /// // Full travel reaches the end of the selected half
    /// assert_eq!(throttle.get_output_value(255, RangeSelector::UpperHalf), 4095);
    /// assert_eq!(throttle.get_output_value(255, RangeSelector::LowerHalf), 0);
    /// ```
    #[must_use]
    pub fn get_output_value(&self, input: u16, range: RangeSelector) -> u16 {
        let max_output = self.calibration.max_output();

        let mut value = rescale_resolution(input, self.input_max_value, max_output);
        value = project_half(value, self.calibration.half_max_output(), range);

        if self.inverted {
            value = invert(value, max_output);
        }

        self.calibration.remap(value)
    }

    /// Sets the output endpoints and midpoint trim.
    ///
    /// See [`EndpointCalibration::set_endpoints`].
    pub fn set_endpoints(&mut self, lower: u16, upper: u16, trim: i32) {
        self.calibration.set_endpoints(lower, upper, trim);
    }

    /// Enables or disables output inversion.
    pub fn set_inverted(&mut self, inverted: bool) {
        self.inverted = inverted;
    }

    /// Returns whether output inversion is enabled.
    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Returns the largest accepted raw sample.
    #[must_use]
    pub fn input_max_value(&self) -> u16 {
        self.input_max_value
    }

    /// Returns the input resolution.
    #[must_use]
    pub fn input_resolution(&self) -> Resolution {
        self.input_resolution
    }

    /// Returns the output resolution.
    #[must_use]
    pub fn output_resolution(&self) -> Resolution {
        self.output_resolution
    }

    /// Returns the output calibration.
    #[must_use]
    pub fn calibration(&self) -> &EndpointCalibration {
        &self.calibration
    }
}
