//! # RC HID Library
//!
//! Drive an RC transmitter from a Logitech G29 steering wheel.
//!
//! This library provides the pieces of the bridge: scaling raw wheel readings
//! into calibrated channel values and PWM duty cycles, reading the wheel over
//! evdev, and sending frames to the transmitter over a serial link.

pub mod config;
pub mod control;
pub mod error;
pub mod link;
pub mod serial;
pub mod telemetry;
pub mod wheel;
