//! # Error Types
//!
//! Custom error types for RC HID using `thiserror`.

use thiserror::Error;

/// Main error type for RC HID
#[derive(Debug, Error)]
pub enum RcHidError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serial port errors
    #[error("Serial error: {0}")]
    Serial(String),

    /// Output link framing errors
    #[error("Link protocol error: {0}")]
    Link(String),

    /// Wheel input errors
    #[error("Wheel error: {0}")]
    Wheel(String),

    /// No G29 wheel found on the system
    #[error("No Logitech G29 wheel found")]
    WheelNotFound,

    /// Bit resolution outside 1..=16
    #[error("Invalid resolution: {0} bits (must be 1-16)")]
    InvalidResolution(u8),

    /// Telemetry recorder errors
    #[error("Telemetry error: {0}")]
    Telemetry(String),
}

/// Result type alias for RC HID
pub type Result<T> = std::result::Result<T, RcHidError>;
