//! Bit resolution of a sampled or output value.

use crate::error::{RcHidError, Result};

/// Smallest supported resolution in bits.
pub const MIN_RESOLUTION_BITS: u8 = 1;

/// Largest supported resolution in bits (the maximum still fits in a `u16`).
pub const MAX_RESOLUTION_BITS: u8 = 16;

/// An integer bit-width in `1..=16`.
///
/// The maximum representable value is `2^bits - 1`, which is never zero, so
/// every division by a resolution's maximum is well-defined.
///
/// # Examples
///
/// ```
/// use rc_hid::control::Resolution;
///
/// let res = Resolution::new(12)?;
/// assert_eq!(res.max_value(), 4095);
/// assert!(Resolution::new(17).is_err());
/// # Ok::<(), rc_hid::error::RcHidError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resolution(u8);

impl Resolution {
    /// 8-bit resolution (pedal axes).
    pub const BITS_8: Resolution = Resolution(8);

    /// 12-bit resolution (receiver channel values).
    pub const BITS_12: Resolution = Resolution(12);

    /// 16-bit resolution (steering axis, PWM register).
    pub const BITS_16: Resolution = Resolution(16);

    /// Creates a resolution, rejecting widths outside `1..=16`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidResolution` if `bits` is 0 or greater than 16.
    pub fn new(bits: u8) -> Result<Self> {
        if (MIN_RESOLUTION_BITS..=MAX_RESOLUTION_BITS).contains(&bits) {
            Ok(Self(bits))
        } else {
            Err(RcHidError::InvalidResolution(bits))
        }
    }

    /// Returns the width in bits.
    #[must_use]
    pub fn bits(&self) -> u8 {
        self.0
    }

    /// Returns `2^bits - 1`.
    #[must_use]
    pub fn max_value(&self) -> u16 {
        ((1u32 << self.0) - 1) as u16
    }
}

impl TryFrom<u8> for Resolution {
    type Error = RcHidError;

    fn try_from(bits: u8) -> Result<Self> {
        Self::new(bits)
    }
}
