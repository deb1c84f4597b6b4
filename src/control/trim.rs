//! Additive output trim shared by controls that expose one.

/// A control that carries an additive trim applied after calibration.
///
/// This is separate from the midpoint trim held by
/// [`EndpointCalibration`](super::EndpointCalibration).
pub trait Trimmable {
    /// Returns the signed additive trim in output units.
    fn trim(&self) -> i32;
}

/// Adds the control's trim to `value`, saturating into `[0, max_output]`.
///
/// # Examples
///
/// ```
/// use rc_hid::control::{apply_trim, Trimmable};
///
/// struct Fixed(i32);
/// impl Trimmable for Fixed {
///     fn trim(&self) -> i32 { self.0 }
/// }
///
/// assert_eq!(apply_trim(100, 4095, &Fixed(25)), 125);
/// assert_eq!(apply_trim(10, 4095, &Fixed(-25)), 0);
/// assert_eq!(apply_trim(4090, 4095, &Fixed(25)), 4095);
/// ```
#[must_use]
pub fn apply_trim<T: Trimmable + ?Sized>(value: u16, max_output: u16, control: &T) -> u16 {
    let trim = control.trim();
    if trim == 0 {
        return value;
    }

    let trimmed = i64::from(value) + i64::from(trim);
    trimmed.clamp(0, i64::from(max_output)) as u16
}
