//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every field has a default. Leaving out `[[channels]]` and `[[switches]]`
//! gives the stock wiring: steering, throttle on the shifter, an aux channel
//! and a lights toggle on triangle.

use serde::de::Error;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::control::{RangeSelector, Resolution, MAX_RESOLUTION_BITS, MIN_RESOLUTION_BITS};
use crate::error::{RcHidError, Result};
use crate::link::protocol::{MAX_FRAME_CHANNELS, SWB_HIGH};
use crate::wheel::latch::SwitchMode;
use crate::wheel::state::{AxisSource, Button, Gear};

/// Baud rates accepted for the transmitter link
pub const SUPPORTED_BAUD_RATES: [u32; 8] = [9600, 19200, 38400, 57600, 115200, 230400, 460800, 921600];

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub serial: SerialConfig,

    #[serde(default)]
    pub wheel: WheelConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default = "default_channels")]
    pub channels: Vec<ChannelConfig>,

    #[serde(default = "default_switches")]
    pub switches: Vec<SwitchConfig>,

    #[serde(default)]
    pub telemetry: TelemetryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Serial port configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SerialConfig {
    #[serde(default = "default_serial_port")]
    pub port: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Wheel configuration
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct WheelConfig {
    /// Event node to open; empty means scan for a G29
    #[serde(default)]
    pub device_path: String,
}

/// Output loop configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,

    #[serde(default = "default_status_interval_ticks")]
    pub status_interval_ticks: u64,
}

/// How a channel selects its output range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelRange {
    #[default]
    FullWidth,
    LowerHalf,
    UpperHalf,
    /// Forward gear uses the upper half, reverse gear the lower half,
    /// anything else holds the neutral value
    Gear,
}

impl ChannelRange {
    /// Fixed range selector, or `None` for [`ChannelRange::Gear`].
    #[must_use]
    pub fn selector(self) -> Option<RangeSelector> {
        match self {
            ChannelRange::FullWidth => Some(RangeSelector::FullWidth),
            ChannelRange::LowerHalf => Some(RangeSelector::LowerHalf),
            ChannelRange::UpperHalf => Some(RangeSelector::UpperHalf),
            ChannelRange::Gear => None,
        }
    }
}

/// One analog output channel
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ChannelConfig {
    pub name: String,

    pub source: AxisSource,

    #[serde(default)]
    pub range: ChannelRange,

    #[serde(default = "default_output_bits")]
    pub output_bits: u8,

    #[serde(default)]
    pub invert: bool,

    /// Lower endpoint; defaults to 0
    #[serde(default)]
    pub lower: Option<u16>,

    /// Upper endpoint; defaults to the output maximum
    #[serde(default)]
    pub upper: Option<u16>,

    #[serde(default)]
    pub trim: i32,

    #[serde(default = "default_forward_gear")]
    pub forward_gear: Gear,

    #[serde(default = "default_reverse_gear")]
    pub reverse_gear: Gear,

    /// Optional duty-cycle stage applied to the channel value
    #[serde(default)]
    pub pwm: Option<PwmStageConfig>,
}

/// Duty-cycle stage of a channel
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct PwmStageConfig {
    #[serde(default)]
    pub lower: Option<u16>,

    #[serde(default)]
    pub upper: Option<u16>,

    /// Midpoint trim of the stage's calibration
    #[serde(default)]
    pub endpoint_trim: i32,

    /// Additive trim applied after calibration
    #[serde(default)]
    pub trim: i32,

    #[serde(default)]
    pub invert: bool,

    #[serde(default)]
    pub range: RangeSelector,
}

/// One button-driven switch
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SwitchConfig {
    pub name: String,

    pub button: Button,

    #[serde(default)]
    pub mode: SwitchMode,

    /// Bit set in the switch byte while on
    pub bit: u8,

    /// Optional duty-cycle value appended after the channels
    #[serde(default)]
    pub duty: Option<SwitchDutyConfig>,
}

/// On/off duty-cycle output of a switch
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SwitchDutyConfig {
    #[serde(default)]
    pub invert: bool,

    #[serde(default)]
    pub lower: u16,

    #[serde(default = "default_duty_upper")]
    pub upper: u16,
}

/// Telemetry configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TelemetryConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default = "default_max_records_per_file")]
    pub max_records_per_file: usize,

    #[serde(default = "default_max_files_to_keep")]
    pub max_files_to_keep: usize,

    #[serde(default = "default_log_interval_ms")]
    pub log_interval_ms: u64,

    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for daily log files; empty disables file logging
    #[serde(default)]
    pub file_dir: String,
}

// Default value functions
fn default_serial_port() -> String { "/dev/ttyUSB0".to_string() }
fn default_baud_rate() -> u32 { 115200 }
fn default_timeout_ms() -> u64 { 100 }

fn default_tick_ms() -> u64 { 15 }
fn default_status_interval_ticks() -> u64 { 1000 }

fn default_output_bits() -> u8 { 12 }
fn default_forward_gear() -> Gear { Gear::Third }
fn default_reverse_gear() -> Gear { Gear::Fourth }
fn default_duty_upper() -> u16 { u16::MAX }

fn default_log_dir() -> String { "./logs".to_string() }
fn default_max_records_per_file() -> usize { 10000 }
fn default_max_files_to_keep() -> usize { 10 }
fn default_log_interval_ms() -> u64 { 100 }
fn default_log_format() -> String { "jsonl".to_string() }

fn default_log_level() -> String { "info".to_string() }

fn default_channels() -> Vec<ChannelConfig> {
    vec![
        ChannelConfig {
            name: "steering".to_string(),
            source: AxisSource::Steering,
            range: ChannelRange::FullWidth,
            output_bits: 12,
            invert: true,
            lower: Some(15),
            upper: Some(3760),
            trim: -217,
            forward_gear: default_forward_gear(),
            reverse_gear: default_reverse_gear(),
            pwm: None,
        },
        ChannelConfig {
            name: "throttle".to_string(),
            source: AxisSource::Throttle,
            range: ChannelRange::Gear,
            output_bits: 12,
            invert: true,
            lower: Some(335),
            upper: Some(2790),
            trim: -122,
            forward_gear: Gear::Third,
            reverse_gear: Gear::Fourth,
            pwm: None,
        },
        // Placeholder until the transmitter's aux knob is wired
        ChannelConfig {
            name: "aux".to_string(),
            source: AxisSource::Steering,
            range: ChannelRange::FullWidth,
            output_bits: 12,
            invert: false,
            lower: Some(659),
            upper: Some(3455),
            trim: 0,
            forward_gear: default_forward_gear(),
            reverse_gear: default_reverse_gear(),
            pwm: None,
        },
    ]
}

fn default_switches() -> Vec<SwitchConfig> {
    vec![SwitchConfig {
        name: "lights".to_string(),
        button: Button::Triangle,
        mode: SwitchMode::Toggle,
        bit: SWB_HIGH,
        duty: None,
    }]
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: default_serial_port(),
            baud_rate: default_baud_rate(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            status_interval_ticks: default_status_interval_ticks(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_dir: default_log_dir(),
            max_records_per_file: default_max_records_per_file(),
            max_files_to_keep: default_max_files_to_keep(),
            log_interval_ms: default_log_interval_ms(),
            format: default_log_format(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_dir: String::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            serial: SerialConfig::default(),
            wheel: WheelConfig::default(),
            output: OutputConfig::default(),
            channels: default_channels(),
            switches: default_switches(),
            telemetry: TelemetryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ChannelConfig {
    /// Output resolution of the channel.
    ///
    /// # Errors
    ///
    /// Returns `InvalidResolution` if `output_bits` is outside 1-16
    pub fn output_resolution(&self) -> Result<Resolution> {
        Resolution::new(self.output_bits)
    }
}

fn invalid(message: impl std::fmt::Display) -> RcHidError {
    RcHidError::Config(toml::de::Error::custom(message))
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rc_hid::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Examples
    ///
    /// ```
    /// use rc_hid::config::Config;
    ///
    /// let config = Config::from_toml("[serial]\nport = \"/dev/ttyACM0\"")?;
    /// assert_eq!(config.serial.port, "/dev/ttyACM0");
    /// assert_eq!(config.channels.len(), 3);
    /// # Ok::<(), rc_hid::error::RcHidError>(())
    /// ```
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns `Config` error describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        // Serial
        if self.serial.port.is_empty() {
            return Err(invalid("serial port cannot be empty"));
        }

        if !SUPPORTED_BAUD_RATES.contains(&self.serial.baud_rate) {
            return Err(invalid(format!(
                "baud_rate must be one of: {:?}",
                SUPPORTED_BAUD_RATES
            )));
        }

        if self.serial.timeout_ms == 0 || self.serial.timeout_ms > 10000 {
            return Err(invalid("timeout_ms must be between 1 and 10000"));
        }

        // Output loop
        if self.output.tick_ms == 0 || self.output.tick_ms > 1000 {
            return Err(invalid("tick_ms must be between 1 and 1000"));
        }

        if self.output.status_interval_ticks == 0 {
            return Err(invalid("status_interval_ticks must be greater than 0"));
        }

        self.validate_channels()?;
        self.validate_switches()?;

        let duty_fields = self.switches.iter().filter(|s| s.duty.is_some()).count();
        if self.channels.len() + duty_fields > MAX_FRAME_CHANNELS {
            return Err(invalid(format!(
                "channels plus switch duty outputs must not exceed {}",
                MAX_FRAME_CHANNELS
            )));
        }

        self.validate_telemetry()?;

        if self.logging.level.is_empty() {
            return Err(invalid("logging level cannot be empty"));
        }

        Ok(())
    }

    fn validate_channels(&self) -> Result<()> {
        if self.channels.is_empty() {
            return Err(invalid("at least one channel is required"));
        }

        let mut names = HashSet::new();
        for channel in &self.channels {
            if channel.name.is_empty() {
                return Err(invalid("channel name cannot be empty"));
            }
            if !names.insert(channel.name.as_str()) {
                return Err(invalid(format!("duplicate channel name '{}'", channel.name)));
            }

            if !(MIN_RESOLUTION_BITS..=MAX_RESOLUTION_BITS).contains(&channel.output_bits) {
                return Err(invalid(format!(
                    "channel '{}': output_bits must be between {} and {}",
                    channel.name, MIN_RESOLUTION_BITS, MAX_RESOLUTION_BITS
                )));
            }
            let max = channel.output_resolution()?.max_value();

            check_endpoints(&channel.name, "", channel.lower, channel.upper, max)?;

            if channel.range == ChannelRange::Gear {
                if channel.forward_gear == Gear::Neutral || channel.reverse_gear == Gear::Neutral {
                    return Err(invalid(format!(
                        "channel '{}': forward_gear and reverse_gear cannot be neutral",
                        channel.name
                    )));
                }
                if channel.forward_gear == channel.reverse_gear {
                    return Err(invalid(format!(
                        "channel '{}': forward_gear and reverse_gear must differ",
                        channel.name
                    )));
                }
            }

            if let Some(pwm) = &channel.pwm {
                check_endpoints(&channel.name, "pwm ", pwm.lower, pwm.upper, max)?;
            }
        }

        Ok(())
    }

    fn validate_switches(&self) -> Result<()> {
        let mut names = HashSet::new();
        let mut used_bits = 0u8;

        for switch in &self.switches {
            if switch.name.is_empty() {
                return Err(invalid("switch name cannot be empty"));
            }
            if !names.insert(switch.name.as_str()) {
                return Err(invalid(format!("duplicate switch name '{}'", switch.name)));
            }

            if switch.bit.count_ones() != 1 {
                return Err(invalid(format!(
                    "switch '{}': bit 0x{:02X} must have exactly one bit set",
                    switch.name, switch.bit
                )));
            }
            if used_bits & switch.bit != 0 {
                return Err(invalid(format!(
                    "switch '{}': bit 0x{:02X} is already used",
                    switch.name, switch.bit
                )));
            }
            used_bits |= switch.bit;

            if let Some(duty) = &switch.duty {
                if duty.lower > duty.upper {
                    return Err(invalid(format!(
                        "switch '{}': duty lower must not exceed upper",
                        switch.name
                    )));
                }
            }
        }

        Ok(())
    }

    fn validate_telemetry(&self) -> Result<()> {
        if self.telemetry.enabled && self.telemetry.log_dir.is_empty() {
            return Err(invalid("telemetry log_dir cannot be empty when enabled"));
        }

        if self.telemetry.log_interval_ms == 0 || self.telemetry.log_interval_ms > 60000 {
            return Err(invalid("log_interval_ms must be between 1 and 60000"));
        }

        if self.telemetry.max_records_per_file == 0 {
            return Err(invalid("max_records_per_file must be greater than 0"));
        }

        if self.telemetry.max_files_to_keep == 0 {
            return Err(invalid("max_files_to_keep must be greater than 0"));
        }

        if self.telemetry.format != "jsonl" {
            return Err(invalid("log format must be 'jsonl' (only supported format)"));
        }

        Ok(())
    }
}

fn check_endpoints(name: &str, stage: &str, lower: Option<u16>, upper: Option<u16>, max: u16) -> Result<()> {
    let lower = lower.unwrap_or(0);
    let upper = upper.unwrap_or(max);

    if upper > max {
        return Err(invalid(format!(
            "channel '{}': {}upper endpoint {} exceeds output maximum {}",
            name, stage, upper, max
        )));
    }
    if lower > upper {
        return Err(invalid(format!(
            "channel '{}': {}lower endpoint {} exceeds upper endpoint {}",
            name, stage, lower, upper
        )));
    }

    Ok(())
}
