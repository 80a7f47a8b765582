//! Serial status sink adapter.
//!
//! Implements [`StatusSink`] by encoding each [`StatusMessage`] into one
//! line and writing it, plus the `\r\n` terminator, to a [`Transport`]
//! (the UART console in production).  Delivery is best-effort: a message
//! that fails to encode or write is logged, counted and dropped.

use log::{debug, warn};

use crate::app::message::StatusMessage;
use crate::app::ports::StatusSink;
use crate::codec::{Encoder, LINE_TERMINATOR, Line};
use crate::error::{Error, TransportError};
use crate::transport::Transport;

/// Adapter that streams every [`StatusMessage`] as a JSON line.
pub struct SerialStatusSink<E, T> {
    encoder: E,
    transport: T,
    line: Line,
    written: u64,
    dropped: u64,
}

impl<E: Encoder, T: Transport> SerialStatusSink<E, T> {
    pub fn new(encoder: E, transport: T) -> Self {
        Self {
            encoder,
            transport,
            line: Line::new(),
            written: 0,
            dropped: 0,
        }
    }

    /// Messages fully handed to the transport.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Messages lost to an encode or write failure.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn send(&mut self, msg: &StatusMessage) -> Result<(), Error> {
        self.encoder.encode(msg, &mut self.line)?;
        write_all(&mut self.transport, self.line.as_bytes())?;
        write_all(&mut self.transport, LINE_TERMINATOR)?;
        self.transport
            .flush()
            .map_err(|_| TransportError::WriteFailed)?;
        Ok(())
    }
}

/// One write call must take the whole buffer; a partial write is reported
/// rather than resumed, so a torn line is never completed out of order.
fn write_all<T: Transport>(transport: &mut T, data: &[u8]) -> Result<(), TransportError> {
    let written = transport
        .write(data)
        .map_err(|_| TransportError::WriteFailed)?;
    if written != data.len() {
        return Err(TransportError::ShortWrite {
            written,
            expected: data.len(),
        });
    }
    Ok(())
}

impl<E: Encoder, T: Transport> StatusSink for SerialStatusSink<E, T> {
    fn emit(&mut self, msg: &StatusMessage) {
        match self.send(msg) {
            Ok(()) => {
                self.written += 1;
                debug!("sent {} line ({} bytes)", msg.status().as_str(), self.line.len());
            }
            Err(e) => {
                self.dropped += 1;
                warn!(
                    "dropped {} message ({} so far): {}",
                    msg.status().as_str(),
                    self.dropped,
                    e
                );
            }
        }
    }
}
