//! # Link Protocol Constants and Types
//!
//! Field widths, switch bit assignments and the frame type shared by the
//! encoder and decoder.

use crate::error::{RcHidError, Result};

/// Hex digits per channel field
pub const CHANNEL_FIELD_WIDTH: usize = 4;

/// Hex digits for the trailing switch byte
pub const SWITCH_FIELD_WIDTH: usize = 2;

/// Frame terminator
pub const FRAME_TERMINATOR: u8 = b'\n';

/// Maximum number of channel fields in one frame
pub const MAX_FRAME_CHANNELS: usize = 16;

/// Switch A on
pub const SWA_ON: u8 = 0x80;
/// Switch D on
pub const SWD_ON: u8 = 0x40;
/// Switch B high position
pub const SWB_HIGH: u8 = 0x20;
/// Switch B middle position
pub const SWB_MID: u8 = 0x10;
/// Switch C high position
pub const SWC_HIGH: u8 = 0x08;
/// Switch C middle position
pub const SWC_MID: u8 = 0x04;

/// One tick of output: channel values in configuration order plus the
/// switch bit field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutputFrame {
    /// Channel values, each sent as four hex digits
    pub channels: Vec<u16>,

    /// Switch bits, sent as two hex digits
    pub switches: u8,
}

impl OutputFrame {
    /// Create a new output frame
    ///
    /// # Arguments
    ///
    /// * `channels` - Channel values (1 to 16 entries)
    /// * `switches` - Switch bit field
    ///
    /// # Errors
    ///
    /// Returns `Link` error if `channels` is empty or longer than
    /// [`MAX_FRAME_CHANNELS`]
    pub fn new(channels: Vec<u16>, switches: u8) -> Result<Self> {
        if channels.is_empty() || channels.len() > MAX_FRAME_CHANNELS {
            return Err(RcHidError::Link(format!(
                "Frame must carry 1-{} channels, got {}",
                MAX_FRAME_CHANNELS,
                channels.len()
            )));
        }

        Ok(Self { channels, switches })
    }

    /// Encoded length in bytes, terminator included
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        self.channels.len() * CHANNEL_FIELD_WIDTH + SWITCH_FIELD_WIDTH + 1
    }

    /// Returns `true` if every bit of `mask` is set
    #[must_use]
    pub fn switch_set(&self, mask: u8) -> bool {
        self.switches & mask == mask
    }
}
