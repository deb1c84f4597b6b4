//! # Serial Communication Module
//!
//! Handles the serial link to the transmitter.
//!
//! This module handles:
//! - Opening the serial port (8N1, no flow control)
//! - Writing encoded frames every tick
//! - Echoing lines sent back by the receiver to the log

pub mod port_trait;

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, ReadHalf, WriteHalf};
use tokio::task::JoinHandle;
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tracing::{debug, info, warn};

use crate::error::{RcHidError, Result};
use crate::link::protocol::FRAME_TERMINATOR;
use crate::link::{decode_frame, encode_frame, OutputFrame};
use port_trait::{SerialPortIO, TokioSerialPort};

/// Default transmitter baud rate
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default transmitter device path (USB-to-serial adapter)
pub const DEFAULT_DEVICE_PATH: &str = "/dev/ttyUSB0";

/// Default per-frame write timeout
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_millis(100);

/// Write side of an opened serial port
pub type SerialWriter = TokioSerialPort<WriteHalf<SerialStream>>;

/// Read side of an opened serial port
pub type SerialReader = ReadHalf<SerialStream>;

/// Frame sender for the transmitter link
///
/// Generic over [`SerialPortIO`] so tests can substitute a mock port.
pub struct LinkSerial<P: SerialPortIO> {
    port: P,
    device_path: String,
    write_timeout: Duration,
    frames_sent: u64,
}

impl<P: SerialPortIO> std::fmt::Debug for LinkSerial<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkSerial")
            .field("device_path", &self.device_path)
            .field("frames_sent", &self.frames_sent)
            .finish_non_exhaustive()
    }
}

impl LinkSerial<SerialWriter> {
    /// Open the transmitter serial port
    ///
    /// # Arguments
    ///
    /// * `path` - Device path (e.g., "/dev/ttyUSB0")
    /// * `baud_rate` - Line speed
    ///
    /// # Returns
    ///
    /// * `Result<(LinkSerial, SerialReader)>` - Frame sender and the read half
    ///   for [`spawn_echo_reader`]
    ///
    /// # Errors
    ///
    /// Returns `Serial` error if the port cannot be opened
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rc_hid::serial::{spawn_echo_reader, LinkSerial};
    ///
    /// #[tokio::main]
    /// async fn main() -> anyhow::Result<()> {
    ///     let (mut link, reader) = LinkSerial::open("/dev/ttyUSB0", 115_200)?;
    ///     spawn_echo_reader(reader);
    ///     Ok(())
    /// }
    /// ```
    pub fn open(path: &str, baud_rate: u32) -> Result<(Self, SerialReader)> {
        let stream = Self::open_port(path, baud_rate)?;
        info!("Opened serial port {} at {} baud", path, baud_rate);

        let (reader, writer) = tokio::io::split(stream);
        Ok((Self::new(TokioSerialPort::new(writer), path), reader))
    }

    fn open_port(path: &str, baud_rate: u32) -> Result<SerialStream> {
        tokio_serial::new(path, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| RcHidError::Serial(format!("Failed to open {}: {}", path, e)))
    }
}

impl<P: SerialPortIO> LinkSerial<P> {
    /// Wrap an already opened port
    pub fn new(port: P, device_path: impl Into<String>) -> Self {
        Self {
            port,
            device_path: device_path.into(),
            write_timeout: DEFAULT_WRITE_TIMEOUT,
            frames_sent: 0,
        }
    }

    /// Set how long a single frame write may take before it fails
    #[must_use]
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Encode and send one frame
    ///
    /// # Errors
    ///
    /// Returns `Serial` error if the write or flush fails or times out
    pub async fn send_frame(&mut self, frame: &OutputFrame) -> Result<()> {
        let bytes = encode_frame(frame);
        self.send_bytes(&bytes).await?;
        self.frames_sent += 1;
        Ok(())
    }

    /// Send raw bytes, then flush
    ///
    /// # Errors
    ///
    /// Returns `Serial` error if the write or flush fails or times out
    pub async fn send_bytes(&mut self, data: &[u8]) -> Result<()> {
        let timeout = self.write_timeout;
        let port = &mut self.port;
        let write = async {
            port.write_all(data)
                .await
                .map_err(|e| RcHidError::Serial(format!("Failed to write frame: {}", e)))?;
            port.flush()
                .await
                .map_err(|e| RcHidError::Serial(format!("Failed to flush serial port: {}", e)))
        };

        tokio::time::timeout(timeout, write)
            .await
            .map_err(|_| RcHidError::Serial(format!("Write timed out after {:?}", timeout)))??;

        debug!("Sent frame ({} bytes)", data.len());
        Ok(())
    }

    /// Get the device path of the opened serial port
    #[must_use]
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Number of frames sent successfully
    #[must_use]
    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }
}

/// Spawn a task that logs every line the receiver sends back
///
/// Lines are read as raw bytes, so noise that is not valid UTF-8 is logged
/// lossily instead of ending the task. Lines that parse as frames are logged
/// with their decoded fields. The task ends with a warning only when the port
/// reaches end of stream or fails.
pub fn spawn_echo_reader<R>(reader: R) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();

        loop {
            buf.clear();
            match reader.read_until(FRAME_TERMINATOR, &mut buf).await {
                Ok(0) => {
                    warn!("Serial link disconnected");
                    break;
                }
                Ok(_) => {
                    let text = String::from_utf8_lossy(&buf);
                    let line = text.trim_end_matches(|c| c == '\r' || c == '\n');
                    if line.is_empty() {
                        continue;
                    }

                    match decode_frame(line) {
                        Ok(frame) => info!(
                            "Got input: channels={:?} switches=0x{:02X}",
                            frame.channels, frame.switches
                        ),
                        Err(_) => info!("Got input: {}", line),
                    }
                }
                Err(e) => {
                    warn!("Serial read failed: {}", e);
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::port_trait::mocks::RecordingPort;
    use super::port_trait::MockSerialPortIO;
    use super::*;
    use crate::link::protocol::SWB_HIGH;
    use std::io;

    fn frame() -> OutputFrame {
        OutputFrame::new(vec![1830, 1925, 2047], SWB_HIGH).unwrap()
    }

    #[test]
    fn test_constants() {
        assert_eq!(DEFAULT_BAUD_RATE, 115_200);
        assert_eq!(DEFAULT_DEVICE_PATH, "/dev/ttyUSB0");
        assert_eq!(DEFAULT_WRITE_TIMEOUT, Duration::from_millis(100));
    }

    #[test]
    fn test_open_with_invalid_path_returns_error() {
        let result = LinkSerial::open("/dev/nonexistent_serial_device_12345", DEFAULT_BAUD_RATE);

        match result {
            Err(RcHidError::Serial(msg)) => {
                assert!(msg.contains("/dev/nonexistent_serial_device_12345"));
                assert!(msg.contains("Failed to open"));
            }
            Err(other) => panic!("Expected Serial error, got: {:?}", other),
            Ok(_) => panic!("Opening a missing device should fail"),
        }
    }

    #[tokio::test]
    async fn test_send_frame_writes_encoded_line() {
        let recorder = RecordingPort::new();
        let mut link = LinkSerial::new(recorder.clone(), "mock");

        link.send_frame(&frame()).await.unwrap();

        assert_eq!(recorder.get_written_data(), vec![b"0726078507FF20\n".to_vec()]);
        assert_eq!(recorder.flushes(), 1);
        assert_eq!(link.frames_sent(), 1);
        assert_eq!(link.device_path(), "mock");
    }

    #[tokio::test]
    async fn test_send_frame_write_error() {
        let recorder = RecordingPort::new();
        recorder.set_write_error(io::ErrorKind::BrokenPipe);
        let mut link = LinkSerial::new(recorder.clone(), "mock");

        let result = link.send_frame(&frame()).await;
        assert!(matches!(result, Err(RcHidError::Serial(_))));
        assert_eq!(link.frames_sent(), 0);
        assert_eq!(recorder.flushes(), 0);
    }

    #[tokio::test]
    async fn test_send_frame_flush_error() {
        let mut mock = MockSerialPortIO::new();
        mock.expect_write_all().times(1).returning(|_| Ok(()));
        mock.expect_flush()
            .times(1)
            .returning(|| Err(io::Error::new(io::ErrorKind::TimedOut, "stalled")));

        let mut link = LinkSerial::new(mock, "mock");
        match link.send_frame(&frame()).await {
            Err(RcHidError::Serial(msg)) => assert!(msg.contains("flush")),
            other => panic!("Expected Serial error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_frame_passes_exact_bytes() {
        let mut mock = MockSerialPortIO::new();
        mock.expect_write_all()
            .withf(|data: &[u8]| data == &b"0726078507FF20\n"[..])
            .times(1)
            .returning(|_| Ok(()));
        mock.expect_flush().times(1).returning(|| Ok(()));

        let mut link = LinkSerial::new(mock, "mock");
        link.send_frame(&frame()).await.unwrap();
    }

    #[tokio::test]
    async fn test_send_frame_timeout() {
        struct StalledPort;

        #[async_trait::async_trait]
        impl SerialPortIO for StalledPort {
            async fn write_all(&mut self, _data: &[u8]) -> io::Result<()> {
                std::future::pending().await
            }

            async fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut link = LinkSerial::new(StalledPort, "stalled").with_write_timeout(Duration::from_millis(5));
        match link.send_frame(&frame()).await {
            Err(RcHidError::Serial(msg)) => assert!(msg.contains("timed out")),
            other => panic!("Expected timeout, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_echo_reader_ends_on_eof() {
        let reader = tokio_test::io::Builder::new()
            .read(b"0726078507FF20\n")
            .read(b"hello from receiver\r\n")
            .build();

        let handle = spawn_echo_reader(reader);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_echo_reader_survives_invalid_utf8() {
        // The mock panics on drop if any scripted read is left unconsumed
        let reader = tokio_test::io::Builder::new()
            .read(b"\xff\xfe noise\n")
            .read(b"0726078507FF20\n")
            .build();

        let handle = spawn_echo_reader(reader);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_echo_reader_skips_blank_and_partial_lines() {
        let reader = tokio_test::io::Builder::new()
            .read(b"\r\n")
            .read(b"07260785")
            .read(b"07FF20\r\n")
            .read(b"\x00\x80trailing")
            .build();

        let handle = spawn_echo_reader(reader);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_echo_reader_ends_on_error() {
        let reader = tokio_test::io::Builder::new()
            .read(b"partial")
            .read_error(io::Error::new(io::ErrorKind::BrokenPipe, "unplugged"))
            .build();

        let handle = spawn_echo_reader(reader);
        handle.await.unwrap();
    }

    // Integration test - only runs if the transmitter is connected
    #[tokio::test]
    #[ignore]
    async fn test_send_with_real_hardware() {
        let (mut link, _reader) =
            LinkSerial::open(DEFAULT_DEVICE_PATH, DEFAULT_BAUD_RATE).expect("No transmitter found");
        link.send_frame(&frame()).await.unwrap();
    }
}
