//! # Wheel State
//!
//! Snapshot of every axis, the shifter gear and all buttons of a Logitech G29.
//!
//! ## Axes
//!
//! | Axis | Resolution | Rest value | Notes |
//! |------|------------|------------|-------|
//! | Steering | 16-bit | 32768 | 0 = full left |
//! | Throttle | 8-bit | 0 | Stored as `255 - raw` |
//! | Brake | 8-bit | 0 | Stored as `255 - raw` |
//! | Clutch | 8-bit | 0 | Stored as `255 - raw` |

use serde::{Deserialize, Serialize};

use crate::control::Resolution;

/// Steering value with the wheel centred
pub const STEERING_CENTER: u16 = 32768;

/// Largest pedal reading
pub const PEDAL_MAX: u16 = 255;

/// Shifter position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Gear {
    /// No gear engaged
    #[default]
    Neutral,
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    Sixth,
    Reverse,
}

/// Every digital button on the wheel and its base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Button {
    Cross,
    Square,
    Circle,
    Triangle,
    /// Right shift paddle
    PaddleRight,
    /// Left shift paddle
    PaddleLeft,
    R2,
    L2,
    Share,
    Options,
    R3,
    L3,
    Plus,
    Minus,
    /// Rotary dial turned clockwise
    DialRight,
    /// Rotary dial turned counter-clockwise
    DialLeft,
    /// Rotary dial pressed
    DialEnter,
    Ps,
}

/// Analog input a channel can read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisSource {
    Steering,
    Throttle,
    Brake,
    Clutch,
}

impl AxisSource {
    /// Native resolution of the axis as reported by the wheel.
    ///
    /// # Examples
    ///
    /// ```
    /// use rc_hid::wheel::state::AxisSource;
    ///
    /// assert_eq!(AxisSource::Steering.resolution().bits(), 16);
    /// assert_eq!(AxisSource::Throttle.resolution().bits(), 8);
    /// ```
    #[must_use]
    pub fn resolution(self) -> Resolution {
        match self {
            AxisSource::Steering => Resolution::BITS_16,
            AxisSource::Throttle | AxisSource::Brake | AxisSource::Clutch => Resolution::BITS_8,
        }
    }
}

/// Complete state of the wheel.
///
/// # Examples
///
/// ```
/// use rc_hid::wheel::state::{Gear, WheelState};
///
/// let state = WheelState::default();
/// assert_eq!(state.steering, 32768);
/// assert_eq!(state.gear, Gear::Neutral);
/// assert!(!state.triangle);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WheelState {
    /// Steering position (16-bit, 32768 = centre)
    pub steering: u16,
    /// Gas pedal, 0 = released
    pub throttle: u16,
    /// Brake pedal, 0 = released
    pub brake: u16,
    /// Clutch pedal, 0 = released
    pub clutch: u16,
    /// Shifter gear
    pub gear: Gear,

    pub cross: bool,
    pub square: bool,
    pub circle: bool,
    pub triangle: bool,
    pub paddle_right: bool,
    pub paddle_left: bool,
    pub r2: bool,
    pub l2: bool,
    pub share: bool,
    pub options: bool,
    pub r3: bool,
    pub l3: bool,
    pub plus: bool,
    pub minus: bool,
    pub dial_right: bool,
    pub dial_left: bool,
    pub dial_enter: bool,
    pub ps: bool,
}

impl Default for WheelState {
    /// Wheel centred, pedals released, neutral gear, nothing pressed.
    fn default() -> Self {
        Self {
            steering: STEERING_CENTER,
            throttle: 0,
            brake: 0,
            clutch: 0,
            gear: Gear::Neutral,
            cross: false,
            square: false,
            circle: false,
            triangle: false,
            paddle_right: false,
            paddle_left: false,
            r2: false,
            l2: false,
            share: false,
            options: false,
            r3: false,
            l3: false,
            plus: false,
            minus: false,
            dial_right: false,
            dial_left: false,
            dial_enter: false,
            ps: false,
        }
    }
}

impl WheelState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current reading of an axis.
    #[must_use]
    pub fn axis(&self, source: AxisSource) -> u16 {
        match source {
            AxisSource::Steering => self.steering,
            AxisSource::Throttle => self.throttle,
            AxisSource::Brake => self.brake,
            AxisSource::Clutch => self.clutch,
        }
    }

    /// Returns whether a button is held.
    ///
    /// # Examples
    ///
    /// ```
    /// use rc_hid::wheel::state::{Button, WheelState};
    ///
    /// let mut state = WheelState::new();
    /// state.triangle = true;
    /// assert!(state.is_pressed(Button::Triangle));
    /// assert!(!state.is_pressed(Button::Cross));
    /// ```
    #[must_use]
    pub fn is_pressed(&self, button: Button) -> bool {
        *self.button_ref(button)
    }

    /// Sets a button's held state.
    pub fn set_pressed(&mut self, button: Button, pressed: bool) {
        *self.button_mut(button) = pressed;
    }

    /// Checks if any button is currently pressed.
    #[must_use]
    pub fn any_button_pressed(&self) -> bool {
        Button::ALL.iter().any(|&b| self.is_pressed(b))
    }

    fn button_ref(&self, button: Button) -> &bool {
        match button {
            Button::Cross => &self.cross,
            Button::Square => &self.square,
            Button::Circle => &self.circle,
            Button::Triangle => &self.triangle,
            Button::PaddleRight => &self.paddle_right,
            Button::PaddleLeft => &self.paddle_left,
            Button::R2 => &self.r2,
            Button::L2 => &self.l2,
            Button::Share => &self.share,
            Button::Options => &self.options,
            Button::R3 => &self.r3,
            Button::L3 => &self.l3,
            Button::Plus => &self.plus,
            Button::Minus => &self.minus,
            Button::DialRight => &self.dial_right,
            Button::DialLeft => &self.dial_left,
            Button::DialEnter => &self.dial_enter,
            Button::Ps => &self.ps,
        }
    }

    fn button_mut(&mut self, button: Button) -> &mut bool {
        match button {
            Button::Cross => &mut self.cross,
            Button::Square => &mut self.square,
            Button::Circle => &mut self.circle,
            Button::Triangle => &mut self.triangle,
            Button::PaddleRight => &mut self.paddle_right,
            Button::PaddleLeft => &mut self.paddle_left,
            Button::R2 => &mut self.r2,
            Button::L2 => &mut self.l2,
            Button::Share => &mut self.share,
            Button::Options => &mut self.options,
            Button::R3 => &mut self.r3,
            Button::L3 => &mut self.l3,
            Button::Plus => &mut self.plus,
            Button::Minus => &mut self.minus,
            Button::DialRight => &mut self.dial_right,
            Button::DialLeft => &mut self.dial_left,
            Button::DialEnter => &mut self.dial_enter,
            Button::Ps => &mut self.ps,
        }
    }
}

impl Button {
    /// All buttons in G29 HID report order.
    pub const ALL: [Button; 18] = [
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
        Button::Plus,
        Button::Minus,
        Button::DialRight,
        Button::DialLeft,
        Button::DialEnter,
        Button::Ps,
    ];
}
