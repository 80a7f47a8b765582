//! Transport abstraction — any byte-oriented output channel.
//!
//! Concrete implementations:
//! - `StdoutTransport`: the UART console on ESP-IDF, the terminal on host
//! - `Vec<u8>`: in-memory capture, for tests and tooling
//!
//! The status sink is generic over `Transport`, so swapping the serial
//! console for another channel requires zero changes to the controller.

use std::io::Write;

use crate::error::TransportError;

/// Byte-oriented output channel.
pub trait Transport {
    /// Error type for this transport.
    type Error: core::fmt::Debug;

    /// Write `data` to the transport.
    /// Returns the number of bytes actually written.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Process stdout.  On ESP-IDF this is the primary UART, the same console
/// the bootloader prints to.
pub struct StdoutTransport {
    out: std::io::Stdout,
}

impl StdoutTransport {
    pub fn new() -> Self {
        Self {
            out: std::io::stdout(),
        }
    }
}

impl Default for StdoutTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for StdoutTransport {
    type Error = TransportError;

    fn write(&mut self, data: &[u8]) -> Result<usize, TransportError> {
        self.out
            .lock()
            .write(data)
            .map_err(|_| TransportError::WriteFailed)
    }

    fn flush(&mut self) -> Result<(), TransportError> {
        self.out
            .lock()
            .flush()
            .map_err(|_| TransportError::WriteFailed)
    }
}

impl Transport for Vec<u8> {
    type Error = core::convert::Infallible;

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        self.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
