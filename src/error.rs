//! Unified error types for the tracker firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! binaries' error handling uniform.  All variants are `Copy` so they can be
//! passed through the controller and the status sink without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The IMU reported a failure.
    Sensor(SensorError),
    /// A status message could not be encoded.
    Encode(EncodeError),
    /// A received line could not be decoded.
    Decode(DecodeError),
    /// The output channel rejected a write.
    Transport(TransportError),
    /// Configuration is invalid.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Encode(e) => write!(f, "encode: {e}"),
            Self::Decode(e) => write!(f, "decode: {e}"),
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

/// Failures surfaced by the IMU.
///
/// `InitFailed` is the only one the controller acts on: it is reported through
/// the status stream and retried forever.  `Bus` is what a driver hands back
/// through [`SensorDevice::take_fault`](crate::app::ports::SensorDevice::take_fault).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// `begin()` returned a nonzero driver code.
    InitFailed(u8),
    /// A bus transaction failed after initialisation.
    Bus(DeviceFault),
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InitFailed(code) => write!(f, "sensor init failed (code {code})"),
            Self::Bus(fault) => write!(f, "bus fault: {fault}"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

/// Transient fault a driver may report after `update()` or `calibrate()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceFault {
    /// The device did not acknowledge a transaction.
    Nack,
    /// The transaction did not complete in time.
    Timeout,
    /// Driver-specific error code.
    Other(u8),
}

impl fmt::Display for DeviceFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nack => write!(f, "no acknowledge"),
            Self::Timeout => write!(f, "timeout"),
            Self::Other(code) => write!(f, "driver code {code}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Codec errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// The encoded message does not fit the line buffer.
    Overflow { needed: usize, capacity: usize },
    /// The serializer itself failed.
    Serialize,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overflow { needed, capacity } => {
                write!(f, "line overflow ({needed} > {capacity} bytes)")
            }
            Self::Serialize => write!(f, "serializer failed"),
        }
    }
}

impl From<EncodeError> for Error {
    fn from(e: EncodeError) -> Self {
        Self::Encode(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Not valid JSON, or the top-level shape is wrong.
    Malformed,
    /// Unknown `status` string.
    UnknownStatus,
    /// Initialising/Error message without `mpu_begin_status`.
    MissingBeginStatus,
    /// Ready message carrying some but not all telemetry fields.
    IncompleteTelemetry,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed message"),
            Self::UnknownStatus => write!(f, "unknown status"),
            Self::MissingBeginStatus => write!(f, "missing mpu_begin_status"),
            Self::IncompleteTelemetry => write!(f, "incomplete telemetry"),
        }
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The underlying write failed.
    WriteFailed,
    /// Fewer bytes were accepted than offered.
    ShortWrite { written: usize, expected: usize },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteFailed => write!(f, "write failed"),
            Self::ShortWrite { written, expected } => {
                write!(f, "short write ({written}/{expected} bytes)")
            }
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A field failed range validation; the message names the field.
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid(msg) => write!(f, "invalid: {msg}"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
