//! Property-based tests for the channel scaling core.
//!
//! Covers resolution bounds, endpoint remapping, potentiometer rescaling and
//! duty-cycle generation across arbitrary resolutions and calibrations.

use proptest::prelude::*;
use rc_hid::control::{
    BinaryPwmControl, EndpointCalibration, PotentiometerControl, PwmControl, RangeSelector,
    Resolution, MAX_DUTY, MIN_DUTY,
};

fn range_selector() -> impl Strategy<Value = RangeSelector> {
    prop_oneof![
        Just(RangeSelector::FullWidth),
        Just(RangeSelector::LowerHalf),
        Just(RangeSelector::UpperHalf),
    ]
}

/// Resolution plus a value within it.
fn resolution_and_value() -> impl Strategy<Value = (Resolution, u16)> {
    (1u8..=16).prop_flat_map(|bits| {
        let resolution = Resolution::new(bits).unwrap();
        (Just(resolution), 0..=resolution.max_value())
    })
}

/// Resolution with ordered endpoints `lower <= upper <= max`.
fn ordered_endpoints() -> impl Strategy<Value = (Resolution, u16, u16)> {
    (1u8..=16)
        .prop_flat_map(|bits| {
            let resolution = Resolution::new(bits).unwrap();
            (Just(resolution), 0..=resolution.max_value())
        })
        .prop_flat_map(|(resolution, lower)| (Just(resolution), Just(lower), lower..=resolution.max_value()))
}

/// Calibration whose trimmed midpoint stays between the endpoints.
fn bracketing_calibration() -> impl Strategy<Value = (Resolution, u16, u16, i32)> {
    (2u8..=16)
        .prop_flat_map(|bits| {
            let resolution = Resolution::new(bits).unwrap();
            let max = resolution.max_value();
            (Just(resolution), 0..=max / 2, (max / 2 + 1)..=max)
        })
        .prop_flat_map(|(resolution, lower, upper)| {
            let half = f64::from(resolution.max_value()) / 2.0;
            let min_trim = (f64::from(lower) - half).ceil() as i32;
            let max_trim = (f64::from(upper) - half).floor() as i32;
            (Just(resolution), Just(lower), Just(upper), min_trim..=max_trim)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Every supported resolution has a maximum of 2^bits - 1.
    #[test]
    fn prop_max_value(bits in 1u8..=16) {
        let resolution = Resolution::new(bits).unwrap();
        prop_assert_eq!(u32::from(resolution.max_value()), (1u32 << bits) - 1);
    }

    /// An untouched calibration maps every value to itself.
    #[test]
    fn prop_identity_remap((resolution, value) in resolution_and_value()) {
        let calibration = EndpointCalibration::new(resolution);
        prop_assert_eq!(calibration.remap(value), value);
    }

    /// Without trim the extremes land exactly on the endpoints.
    #[test]
    fn prop_endpoints_hit((resolution, lower, upper) in ordered_endpoints()) {
        let mut calibration = EndpointCalibration::new(resolution);
        calibration.set_endpoints(lower, upper, 0);

        prop_assert_eq!(calibration.remap(0), lower);
        prop_assert_eq!(calibration.remap(resolution.max_value()), upper);
    }

    /// Remap never decreases while the midpoint sits between the endpoints.
    #[test]
    fn prop_remap_monotonic(
        (resolution, lower, upper, trim) in bracketing_calibration(),
        samples in prop::collection::vec(any::<u16>(), 2..32),
    ) {
        let mut calibration = EndpointCalibration::new(resolution);
        calibration.set_endpoints(lower, upper, trim);

        let max = resolution.max_value();
        let span = u32::from(max) + 1;
        let mut values: Vec<u16> = samples.into_iter().map(|v| (u32::from(v) % span) as u16).collect();
        values.extend([0, max / 2, max / 2 + 1, max]);
        values.sort_unstable();

        let outputs: Vec<u16> = values.iter().map(|&v| calibration.remap(v)).collect();
        for pair in outputs.windows(2) {
            prop_assert!(pair[0] <= pair[1], "remap not monotonic: {:?} for {:?}", outputs, values);
        }
    }

    /// Trim moves the midpoint output by the trim amount and leaves the ends alone.
    #[test]
    fn prop_trim_shifts_midpoint(lower in 1u16..=1500, upper in 2600u16..=4094, trim in -400i32..=400) {
        let mut untrimmed = EndpointCalibration::new(Resolution::BITS_12);
        untrimmed.set_endpoints(lower, upper, 0);
        let mut trimmed = untrimmed.clone();
        trimmed.set_endpoints(lower, upper, trim);

        prop_assert_eq!(trimmed.output_mid_point() - untrimmed.output_mid_point(), f64::from(trim));

        let shift = i32::from(trimmed.remap(2047)) - i32::from(untrimmed.remap(2047));
        prop_assert!((shift - trim).abs() <= 1, "shift {} for trim {}", shift, trim);

        prop_assert_eq!(trimmed.remap(0), lower);
        prop_assert_eq!(trimmed.remap(4095), upper);
    }

    /// 16-bit to 12-bit rescaling is linear within one count.
    #[test]
    fn prop_potentiometer_linear(input in any::<u16>()) {
        let control = PotentiometerControl::new(Resolution::BITS_16, Resolution::BITS_12);
        let output = control.get_output_value(input, RangeSelector::FullWidth);

        let exact = f64::from(input) * 4095.0 / 65535.0;
        prop_assert!((f64::from(output) - exact).abs() <= 1.0, "{} -> {} (exact {})", input, output, exact);
    }

    /// Full-width duty cycle spans exactly MIN_DUTY..=MAX_DUTY.
    #[test]
    fn prop_duty_extremes(bits in 1u8..=16) {
        let resolution = Resolution::new(bits).unwrap();
        let control = PwmControl::new(resolution);

        prop_assert_eq!(control.get_duty_cycle(0, RangeSelector::FullWidth), MIN_DUTY);
        prop_assert_eq!(control.get_duty_cycle(resolution.max_value(), RangeSelector::FullWidth), MAX_DUTY);
    }

    /// Duty cycles stay within servo limits for any trim, inversion and range.
    #[test]
    fn prop_duty_bounded(
        (resolution, value) in resolution_and_value(),
        trim in -70_000i32..=70_000,
        inverted in any::<bool>(),
        range in range_selector(),
    ) {
        let mut control = PwmControl::new(resolution);
        control.set_trim(trim);
        control.set_inverted(inverted);

        let duty = control.get_duty_cycle(value, range);
        prop_assert!((MIN_DUTY..=MAX_DUTY).contains(&duty), "duty {} out of range", duty);
    }

    /// Inverting an on/off output swaps its on and off duty cycles.
    #[test]
    fn prop_binary_invert_swaps(lower in any::<u16>(), span in any::<u16>(), on in any::<bool>()) {
        let upper = lower.saturating_add(span);
        let mut normal = BinaryPwmControl::new();
        normal.set_endpoints(lower, upper);
        let mut inverted = normal;
        inverted.set_inverted(true);

        prop_assert_eq!(inverted.get_duty_cycle(on), normal.get_duty_cycle(!on));
    }
}

#[test]
fn test_binary_defaults() {
    let mut control = BinaryPwmControl::new();
    assert_eq!(control.get_duty_cycle(true), MAX_DUTY);
    assert_eq!(control.get_duty_cycle(false), MIN_DUTY);

    control.set_inverted(true);
    assert_eq!(control.get_duty_cycle(true), MIN_DUTY);
    assert_eq!(control.get_duty_cycle(false), MAX_DUTY);
}

#[test]
fn test_twelve_bit_endpoints() {
    let mut control = PotentiometerControl::new(Resolution::BITS_12, Resolution::BITS_12);
    control.set_endpoints(1000, 3900, 0);

    assert_eq!(control.get_output_value(0, RangeSelector::FullWidth), 1000);
    assert_eq!(control.get_output_value(4095, RangeSelector::FullWidth), 3900);
    let mid = control.get_output_value(2047, RangeSelector::FullWidth);
    assert!(mid == 2047 || mid == 2048, "midpoint {}", mid);
}
