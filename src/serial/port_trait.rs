//! Trait abstraction for serial port operations to enable testing

use async_trait::async_trait;
use std::io;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Trait for serial port I/O operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SerialPortIO: Send {
    /// Write all data to the port
    async fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Flush the output buffer
    async fn flush(&mut self) -> io::Result<()>;
}

/// Adapts any tokio writer (the write half of a `SerialStream` in
/// production) to [`SerialPortIO`]
pub struct TokioSerialPort<W> {
    port: W,
}

impl<W> TokioSerialPort<W> {
    pub fn new(port: W) -> Self {
        Self { port }
    }

    pub fn into_inner(self) -> W {
        self.port
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> SerialPortIO for TokioSerialPort<W> {
    async fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.port.write_all(data).await
    }

    async fn flush(&mut self) -> io::Result<()> {
        self.port.flush().await
    }
}
