//! Button edge detection for toggle switches.

use serde::Deserialize;

/// How a switch follows its button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchMode {
    /// Flips on every press
    #[default]
    Toggle,
    /// On while held
    Momentary,
}

/// Remembers the last observed level of a button and reports press edges.
///
/// # Examples
///
/// ```
/// use rc_hid::wheel::latch::ButtonLatch;
///
/// let mut latch = ButtonLatch::new();
/// assert!(latch.rising_edge(true));
/// assert!(!latch.rising_edge(true)); // still held
/// assert!(!latch.rising_edge(false));
/// assert!(latch.rising_edge(true));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonLatch {
    last: bool,
}

impl ButtonLatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `pressed` and returns `true` on a released-to-pressed transition.
    pub fn rising_edge(&mut self, pressed: bool) -> bool {
        let edge = pressed && !self.last;
        self.last = pressed;
        edge
    }
}

/// A switch driven by a button in either toggle or momentary mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchLatch {
    mode: SwitchMode,
    latch: ButtonLatch,
    on: bool,
}

impl SwitchLatch {
    /// Creates a switch that starts off.
    #[must_use]
    pub fn new(mode: SwitchMode) -> Self {
        Self {
            mode,
            latch: ButtonLatch::new(),
            on: false,
        }
    }

    /// Feeds the current button level and returns the switch state.
    pub fn update(&mut self, pressed: bool) -> bool {
        let edge = self.latch.rising_edge(pressed);
        self.on = match self.mode {
            SwitchMode::Toggle => self.on ^ edge,
            SwitchMode::Momentary => pressed,
        };
        self.on
    }

    #[must_use]
    pub fn is_on(&self) -> bool {
        self.on
    }

    #[must_use]
    pub fn mode(&self) -> SwitchMode {
        self.mode
    }
}
