//! # Wheel Module
//!
//! Logitech G29 input handling.
//!
//! This module handles:
//! - Wheel detection and connection via evdev
//! - Folding axis, shifter and button events into a [`WheelState`]
//! - Button edge latching for toggle switches
//! - Running the controls once per tick to build an output frame

pub mod channel_mapper;
pub mod g29;
pub mod latch;
pub mod mapper;
pub mod state;

pub use channel_mapper::ChannelMapper;
pub use state::{AxisSource, Button, Gear, WheelState};
