//! # Link Frame Decoder
//!
//! Parses a frame line back into an [`OutputFrame`]. Used to log lines echoed
//! by the receiver and to check encoder output in tests.

use super::protocol::*;
use crate::error::{RcHidError, Result};

/// Decode one frame line
///
/// # Arguments
///
/// * `line` - Frame text, with or without a trailing `\n` or `\r\n`
///
/// # Returns
///
/// * `Result<OutputFrame>` - Decoded channels and switch byte
///
/// # Errors
///
/// Returns `Link` error if:
/// - The length is not `4k + 2` for `k` in `1..=16`
/// - Any character is not a hexadecimal digit
///
/// # Examples
///
/// ```
/// use rc_hid::link::decode_frame;
///
/// let frame = decode_frame("0726078507FF20\n")?;
/// assert_eq!(frame.channels, vec![1830, 1925, 2047]);
/// assert_eq!(frame.switches, 0x20);
/// # Ok::<(), rc_hid::error::RcHidError>(())
/// ```
pub fn decode_frame(line: &str) -> Result<OutputFrame> {
    let body = line
        .strip_suffix('\n')
        .map(|rest| rest.strip_suffix('\r').unwrap_or(rest))
        .unwrap_or(line);

    if !body.is_ascii() {
        return Err(RcHidError::Link("Frame contains non-ASCII data".to_string()));
    }

    let len = body.len();
    if len < CHANNEL_FIELD_WIDTH + SWITCH_FIELD_WIDTH
        || (len - SWITCH_FIELD_WIDTH) % CHANNEL_FIELD_WIDTH != 0
    {
        return Err(RcHidError::Link(format!("Invalid frame length: {}", len)));
    }

    let channel_count = (len - SWITCH_FIELD_WIDTH) / CHANNEL_FIELD_WIDTH;
    if channel_count > MAX_FRAME_CHANNELS {
        return Err(RcHidError::Link(format!(
            "Too many channels: {} (max {})",
            channel_count, MAX_FRAME_CHANNELS
        )));
    }

    let (channel_text, switch_text) = body.split_at(len - SWITCH_FIELD_WIDTH);

    let mut channels = Vec::with_capacity(channel_count);
    for i in 0..channel_count {
        let field = &channel_text[i * CHANNEL_FIELD_WIDTH..(i + 1) * CHANNEL_FIELD_WIDTH];
        channels.push(parse_hex_u16(field)?);
    }

    let switches = u8::try_from(parse_hex_u16(switch_text)?)
        .map_err(|_| RcHidError::Link(format!("Invalid switch field: {}", switch_text)))?;

    OutputFrame::new(channels, switches)
}

/// Parse a fixed-width field, rejecting signs and whitespace that
/// `from_str_radix` would otherwise accept.
fn parse_hex_u16(field: &str) -> Result<u16> {
    if !field.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(RcHidError::Link(format!("Invalid hex field: {:?}", field)));
    }

    u16::from_str_radix(field, 16)
        .map_err(|e| RcHidError::Link(format!("Invalid hex field {:?}: {}", field, e)))
}
