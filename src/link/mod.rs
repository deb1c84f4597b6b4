//! # Link Module
//!
//! Text framing for the transmitter link.
//!
//! Each frame is a run of 4-digit uppercase hexadecimal channel fields,
//! followed by a 2-digit switch byte and a newline:
//!
//! ```text
//! 0726 0785 07FF 20 \n      (spaces added for readability)
//! └──┘ └──┘ └──┘ └┘
//!  ch1  ch2  ch3  switches
//! ```

pub mod decoder;
pub mod encoder;
pub mod protocol;

pub use decoder::decode_frame;
pub use encoder::encode_frame;
pub use protocol::OutputFrame;
