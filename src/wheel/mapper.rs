//! # Wheel Input Mapper Module
//!
//! Parses raw evdev events from the G29 and folds them into a [`WheelState`].
//!
//! ## Axis Codes (EV_ABS)
//!
//! | Axis | evdev Code | Range | Stored as |
//! |------|------------|-------|-----------|
//! | Steering | ABS_X | 0-65535 | raw |
//! | Clutch | ABS_Y | 0-255 | 255 - raw |
//! | Throttle | ABS_Z | 0-255 | 255 - raw |
//! | Brake | ABS_RZ | 0-255 | 255 - raw |
//!
//! The pedals report 255 at rest, so they are inverted on the way in.
//!
//! ## Button Codes (EV_KEY)
//!
//! The kernel exposes the G29 buttons as a joystick: the first sixteen land
//! on `BTN_TRIGGER..=BTN_DEAD` (0x120-0x12f), the rest on
//! `BTN_TRIGGER_HAPPY1..` (0x2c0-).
//!
//! | Codes | Buttons |
//! |-------|---------|
//! | 0x120-0x12b | Cross, Square, Circle, Triangle, paddles, R2, L2, Share, Options, R3, L3 |
//! | 0x12c-0x12f, 0x2c0-0x2c2 | Gears 1-6, Reverse |
//! | 0x2c3-0x2c8 | Plus, Minus, dial right/left/enter, PS |
//!
//! ## Usage
//!
//! ```no_run
//! use rc_hid::wheel::g29::G29Wheel;
//! use rc_hid::wheel::mapper::EventMapper;
//!
//! let mut wheel = G29Wheel::open("")?;
//! let mut mapper = EventMapper::new();
//!
//! loop {
//!     for event in wheel.fetch_events()? {
//!         mapper.process_event(&event);
//!     }
//!     let state = mapper.state();
//!     // Feed state to the channel mapper...
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use evdev::{AbsoluteAxisType, InputEvent, InputEventKind, Key};

use super::state::{Button, Gear, WheelState, PEDAL_MAX};

/// First joystick button code (BTN_TRIGGER)
const JOYSTICK_BUTTON_BASE: u16 = 0x120;

/// First extended button code (BTN_TRIGGER_HAPPY1)
const EXTENDED_BUTTON_BASE: u16 = 0x2c0;

/// Buttons reported on consecutive joystick codes starting at 0x120.
const JOYSTICK_BUTTONS: [Button; 12] = [
    Button::Cross,
    Button::Square,
    Button::Circle,
    Button::Triangle,
    Button::PaddleRight,
    Button::PaddleLeft,
    Button::R2,
    Button::L2,
    Button::Share,
    Button::Options,
    Button::R3,
    Button::L3,
];

/// Shifter positions in report order, starting at 0x12c.
const SHIFTER_GEARS: [Gear; 7] = [
    Gear::First,
    Gear::Second,
    Gear::Third,
    Gear::Fourth,
    Gear::Fifth,
    Gear::Sixth,
    Gear::Reverse,
];

/// Buttons after the shifter, starting at BTN_TRIGGER_HAPPY4.
const EXTENDED_BUTTONS: [Button; 6] = [
    Button::Plus,
    Button::Minus,
    Button::DialRight,
    Button::DialLeft,
    Button::DialEnter,
    Button::Ps,
];

/// What a key code controls on the wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTarget {
    Button(Button),
    Gear(Gear),
}

/// Resolves a key code to the wheel control it reports.
///
/// Report positions 0-15 map onto `0x120 + n`, positions 16 and up onto
/// `0x2c0 + (n - 16)`.
///
/// # Examples
///
/// ```
/// use evdev::Key;
/// use rc_hid::wheel::mapper::{key_target, KeyTarget};
/// use rc_hid::wheel::state::{Button, Gear};
///
/// assert_eq!(key_target(Key::BTN_TRIGGER), Some(KeyTarget::Button(Button::Cross)));
/// assert_eq!(key_target(Key::BTN_DEAD), Some(KeyTarget::Gear(Gear::Fourth)));
/// assert_eq!(key_target(Key::KEY_A), None);
/// ```
#[must_use]
pub fn key_target(key: Key) -> Option<KeyTarget> {
    let code = key.code();
    let position = if (JOYSTICK_BUTTON_BASE..JOYSTICK_BUTTON_BASE + 16).contains(&code) {
        usize::from(code - JOYSTICK_BUTTON_BASE)
    } else if code >= EXTENDED_BUTTON_BASE {
        usize::from(code - EXTENDED_BUTTON_BASE) + 16
    } else {
        return None;
    };

    let gears_start = JOYSTICK_BUTTONS.len();
    let extended_start = gears_start + SHIFTER_GEARS.len();

    if position < gears_start {
        Some(KeyTarget::Button(JOYSTICK_BUTTONS[position]))
    } else if position < extended_start {
        Some(KeyTarget::Gear(SHIFTER_GEARS[position - gears_start]))
    } else {
        EXTENDED_BUTTONS
            .get(position - extended_start)
            .map(|&b| KeyTarget::Button(b))
    }
}

/// Parses raw evdev events and maintains wheel state.
///
/// Not thread-safe; the wheel reader thread owns it and publishes snapshots.
///
/// # Examples
///
/// ```
/// use rc_hid::wheel::mapper::EventMapper;
///
/// let mapper = EventMapper::new();
/// assert_eq!(mapper.state().steering, 32768);
/// ```
#[derive(Debug, Default)]
pub struct EventMapper {
    state: WheelState,
}

impl EventMapper {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: WheelState::default(),
        }
    }

    /// Returns a reference to the current wheel state.
    #[must_use]
    pub fn state(&self) -> &WheelState {
        &self.state
    }

    /// Returns an owned copy of the current state.
    #[must_use]
    pub fn state_snapshot(&self) -> WheelState {
        self.state.clone()
    }

    /// Processes a single evdev input event and updates internal state.
    ///
    /// Sync events, unknown axes and unknown keys are ignored.
    ///
    /// # Arguments
    ///
    /// * `event` - The evdev input event to process
    pub fn process_event(&mut self, event: &InputEvent) {
        match event.kind() {
            InputEventKind::AbsAxis(axis) => self.process_axis_event(axis, event.value()),
            InputEventKind::Key(key) => self.process_key_event(key, event.value() != 0),
            _ => {}
        }
    }

    fn process_axis_event(&mut self, axis: AbsoluteAxisType, value: i32) {
        match axis {
            AbsoluteAxisType::ABS_X => self.state.steering = clamp_u16(value, u16::MAX),
            AbsoluteAxisType::ABS_Y => self.state.clutch = pedal(value),
            AbsoluteAxisType::ABS_Z => self.state.throttle = pedal(value),
            AbsoluteAxisType::ABS_RZ => self.state.brake = pedal(value),
            // D-pad hat and anything else
            _ => {}
        }
    }

    fn process_key_event(&mut self, key: Key, pressed: bool) {
        match key_target(key) {
            Some(KeyTarget::Button(button)) => self.state.set_pressed(button, pressed),
            Some(KeyTarget::Gear(gear)) => {
                if pressed {
                    self.state.gear = gear;
                } else if self.state.gear == gear {
                    self.state.gear = Gear::Neutral;
                }
            }
            None => {}
        }
    }

    /// Resets to the rest state (centred, released, neutral).
    ///
    /// Used when the wheel is reopened.
    pub fn reset(&mut self) {
        self.state = WheelState::default();
    }
}

fn clamp_u16(value: i32, max: u16) -> u16 {
    value.clamp(0, i32::from(max)) as u16
}

fn pedal(raw: i32) -> u16 {
    PEDAL_MAX - clamp_u16(raw, PEDAL_MAX)
}
