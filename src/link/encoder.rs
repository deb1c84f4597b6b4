//! # Link Frame Encoder
//!
//! Formats an [`OutputFrame`] as the ASCII line the transmitter expects.

use super::protocol::*;

/// Encode a frame into its wire bytes
///
/// # Arguments
///
/// * `frame` - Channel values and switch byte
///
/// # Returns
///
/// * `Vec<u8>` - `{:04X}` per channel, `{:02X}` for the switches, then `\n`
///
/// # Examples
///
/// ```
/// use rc_hid::link::{encode_frame, OutputFrame};
///
/// let frame = OutputFrame::new(vec![0x0726, 0x0785, 0x07FF], 0x20)?;
/// assert_eq!(encode_frame(&frame), b"0726078507FF20\n");
/// # Ok::<(), rc_hid::error::RcHidError>(())
/// ```
pub fn encode_frame(frame: &OutputFrame) -> Vec<u8> {
    let mut line = String::with_capacity(frame.encoded_len());

    for value in &frame.channels {
        line.push_str(&format!("{:04X}", value));
    }
    line.push_str(&format!("{:02X}", frame.switches));

    let mut bytes = line.into_bytes();
    bytes.push(FRAME_TERMINATOR);
    bytes
}
