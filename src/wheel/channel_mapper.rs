//! # Channel Mapper Module
//!
//! Runs the configured controls against a [`WheelState`] once per tick and
//! assembles the [`OutputFrame`] sent to the transmitter.
//!
//! ## Default Channel Assignments
//!
//! | Field | Input | Range | Notes |
//! |-------|-------|-------|-------|
//! | 1 | Steering | full width | 16 → 12 bit, inverted |
//! | 2 | Throttle | gear | 3rd = forward, 4th = reverse, inverted |
//! | 3 | Steering | full width | aux placeholder |
//! | switches | Triangle | toggle | lights, `SWB_HIGH` |
//!
//! Switches with a duty stage append one extra field each, after the channels.
//!
//! ## Usage
//!
//! ```
//! use rc_hid::config::Config;
//! use rc_hid::wheel::{ChannelMapper, WheelState};
//!
//! let mut mapper = ChannelMapper::from_config(&Config::default())?;
//! let frame = mapper.map(&WheelState::default());
//! assert_eq!(frame.channels, vec![1830, 1925, 2047]);
//! assert_eq!(frame.switches, 0);
//! # Ok::<(), rc_hid::error::RcHidError>(())
//! ```

use tracing::debug;

use super::latch::SwitchLatch;
use super::state::{AxisSource, Button, Gear, WheelState};
use crate::config::{ChannelConfig, ChannelRange, Config, SwitchConfig};
use crate::control::{BinaryPwmControl, PotentiometerControl, PwmControl, RangeSelector, Resolution};
use crate::error::Result;
use crate::link::protocol::OutputFrame;

/// A channel's controls and how its range is chosen.
#[derive(Debug, Clone)]
struct ChannelStage {
    name: String,
    source: AxisSource,
    range: ChannelRange,
    forward_gear: Gear,
    reverse_gear: Gear,
    pot: PotentiometerControl,
    pwm: Option<(PwmControl, RangeSelector)>,
}

impl ChannelStage {
    fn from_config(config: &ChannelConfig) -> Result<Self> {
        let output = config.output_resolution()?;
        let max = output.max_value();

        let mut pot = PotentiometerControl::new(config.source.resolution(), output);
        pot.set_inverted(config.invert);
        pot.set_endpoints(config.lower.unwrap_or(0), config.upper.unwrap_or(max), config.trim);

        let pwm = config.pwm.as_ref().map(|stage| {
            let mut control = PwmControl::new(output);
            control.set_endpoints(stage.lower.unwrap_or(0), stage.upper.unwrap_or(max), stage.endpoint_trim);
            control.set_trim(stage.trim);
            control.set_inverted(stage.invert);
            (control, stage.range)
        });

        Ok(Self {
            name: config.name.clone(),
            source: config.source,
            range: config.range,
            forward_gear: config.forward_gear,
            reverse_gear: config.reverse_gear,
            pot,
            pwm,
        })
    }

    fn value(&self, state: &WheelState) -> u16 {
        let raw = state.axis(self.source);

        let value = match self.range.selector() {
            Some(selector) => self.pot.get_output_value(raw, selector),
            None if state.gear == self.forward_gear => {
                self.pot.get_output_value(raw, RangeSelector::UpperHalf)
            }
            None if state.gear == self.reverse_gear => {
                self.pot.get_output_value(raw, RangeSelector::LowerHalf)
            }
            // Out of gear: hold the neutral point
            None => self.pot.get_output_value(0, RangeSelector::UpperHalf),
        };

        match &self.pwm {
            Some((control, selector)) => control.get_duty_cycle(value, *selector),
            None => value,
        }
    }
}

/// A switch's latch, bit and optional duty output.
#[derive(Debug, Clone)]
struct SwitchStage {
    name: String,
    button: Button,
    bit: u8,
    latch: SwitchLatch,
    duty: Option<BinaryPwmControl>,
}

impl SwitchStage {
    fn from_config(config: &SwitchConfig) -> Self {
        let duty = config.duty.as_ref().map(|d| {
            let mut control = BinaryPwmControl::new();
            control.set_endpoints(d.lower, d.upper);
            control.set_inverted(d.invert);
            control
        });

        Self {
            name: config.name.clone(),
            button: config.button,
            bit: config.bit,
            latch: SwitchLatch::new(config.mode),
            duty,
        }
    }
}

/// Maps wheel state to output frames.
///
/// Owns every control, so it lives on the tick loop and is never shared.
#[derive(Debug, Clone)]
pub struct ChannelMapper {
    channels: Vec<ChannelStage>,
    switches: Vec<SwitchStage>,
}

impl ChannelMapper {
    /// Builds the controls described by the channel and switch configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidResolution` if a channel's `output_bits` is outside 1-16
    pub fn new(channels: &[ChannelConfig], switches: &[SwitchConfig]) -> Result<Self> {
        let channels = channels
            .iter()
            .map(ChannelStage::from_config)
            .collect::<Result<Vec<_>>>()?;
        let switches = switches.iter().map(SwitchStage::from_config).collect();

        Ok(Self { channels, switches })
    }

    /// Builds the mapper from a loaded configuration.
    ///
    /// # Errors
    ///
    /// See [`ChannelMapper::new`]
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.channels, &config.switches)
    }

    /// Produces one output frame.
    ///
    /// Takes `&mut self` because toggle switches remember the previous
    /// button level.
    ///
    /// # Arguments
    ///
    /// * `state` - Latest wheel snapshot
    ///
    /// # Returns
    ///
    /// Channel values in configuration order, then one duty value for each
    /// switch with a duty stage, and the switch bit field.
    pub fn map(&mut self, state: &WheelState) -> OutputFrame {
        let mut values: Vec<u16> = self.channels.iter().map(|c| c.value(state)).collect();
        let mut switches = 0u8;

        for switch in &mut self.switches {
            let was_on = switch.latch.is_on();
            let on = switch.latch.update(state.is_pressed(switch.button));
            if on != was_on {
                debug!("Switch '{}' {}", switch.name, if on { "on" } else { "off" });
            }

            if on {
                switches |= switch.bit;
            }
            if let Some(duty) = &switch.duty {
                values.push(duty.get_duty_cycle(on));
            }
        }

        OutputFrame {
            channels: values,
            switches,
        }
    }

    /// Channel names in output order, duty-carrying switches last.
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.channels
            .iter()
            .map(|c| c.name.as_str())
            .chain(self.switches.iter().filter(|s| s.duty.is_some()).map(|s| s.name.as_str()))
            .collect()
    }

    /// Output resolution of each channel.
    #[must_use]
    pub fn channel_resolutions(&self) -> Vec<Resolution> {
        self.channels.iter().map(|c| c.pot.output_resolution()).collect()
    }
}
