//! # PWM Timing Constants
//!
//! Hardware duty-cycle constants for a 16-bit PWM compare register driving
//! standard hobby servos and ESCs.
//!
//! The register spans one full period (`0..=65535`), so a pulse width in
//! microseconds converts to register counts as `65535 * pulse_us / period_us`,
//! truncated. These values must be derived exactly this way so that duty
//! cycles are bit-for-bit reproducible on the receiver.

/// Servo signal frequency in Hz
pub const FREQUENCY_HZ: u32 = 50;

/// Shortest pulse width in microseconds
pub const MIN_PULSE_US: u32 = 500;

/// Longest pulse width in microseconds
pub const MAX_PULSE_US: u32 = 2500;

/// Signal period in microseconds (20ms at 50Hz)
pub const PERIOD_US: u32 = 1_000_000 / FREQUENCY_HZ;

/// Full-scale value of the 16-bit compare register
pub const REGISTER_MAX: u16 = u16::MAX;

/// Register count for the longest pulse (8191)
pub const MAX_DUTY: u16 = pulse_to_duty(MAX_PULSE_US);

/// Register count for the shortest pulse (1638)
pub const MIN_DUTY: u16 = pulse_to_duty(MIN_PULSE_US);

/// Span between the shortest and longest pulse (6553)
pub const DUTY_RANGE: u16 = MAX_DUTY - MIN_DUTY;

/// Half of [`DUTY_RANGE`], integer-truncated (3276)
pub const HALF_DUTY_RANGE: u16 = DUTY_RANGE / 2;

/// Converts a pulse width to register counts, truncating toward zero.
const fn pulse_to_duty(pulse_us: u32) -> u16 {
    (REGISTER_MAX as u32 * pulse_us / PERIOD_US) as u16
}
