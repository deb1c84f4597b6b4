//! # Telemetry Module
//!
//! Records output frames to JSONL files with rotation.
//!
//! This module handles:
//! - Formatting one JSON object per recorded tick (JSON Lines)
//! - Rate limiting to the configured log interval
//! - Rotating files after N records
//! - Retaining only the last M files

pub mod logger;

pub use logger::{FrameRecord, TelemetryLogger};
