//! Status line codec — one compact JSON object per line.
//!
//! Wire format:
//! ```text
//! {"data":{"mpu_begin_status":0},"status":"initialising"}
//! {"data":{},"status":"calibrating"}
//! {"data":{"temp":25.0,"accX":0.01, … ,"angleZ":0.0},"status":"ready"}
//! ```
//!
//! `data` precedes `status`.  Every encoded line fits [`MAX_LINE_LEN`];
//! the line terminator is added by the sink, not here.  Non-finite floats
//! go out as `null` and come back as NaN.

use serde::{Deserialize, Deserializer, Serialize};

use crate::app::message::{InitResult, Status, StatusMessage, Telemetry, TelemetryField};
use crate::error::{DecodeError, EncodeError};

/// Upper bound on one encoded line, terminator excluded.
///
/// The widest message is Ready with twelve worst-case `f32`s, about 320
/// bytes.
pub const MAX_LINE_LEN: usize = 384;

/// Line terminator written after every encoded message.
pub const LINE_TERMINATOR: &[u8] = b"\r\n";

/// Bounded buffer holding one encoded line.
pub type Line = heapless::String<MAX_LINE_LEN>;

/// Turns a [`StatusMessage`] into one line of text.
pub trait Encoder {
    /// Encode `msg` into `out`, replacing its contents.
    fn encode(&mut self, msg: &StatusMessage, out: &mut Line) -> Result<(), EncodeError>;
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct WireOut<'a> {
    data: DataOut<'a>,
    status: Status,
}

#[derive(Serialize)]
#[serde(untagged)]
enum DataOut<'a> {
    Begin { mpu_begin_status: InitResult },
    Telemetry(&'a Telemetry),
    Empty(EmptyObject),
}

/// Serializes as `{}`.
#[derive(Serialize)]
struct EmptyObject {}

impl<'a> WireOut<'a> {
    fn from_message(msg: &'a StatusMessage) -> Self {
        let data = match msg {
            StatusMessage::Initialising { begin_status } | StatusMessage::Error { begin_status } => {
                DataOut::Begin {
                    mpu_begin_status: *begin_status,
                }
            }
            StatusMessage::Ready(Some(t)) => DataOut::Telemetry(t),
            StatusMessage::Calibrating | StatusMessage::Ready(None) => DataOut::Empty(EmptyObject {}),
        };
        Self {
            data,
            status: msg.status(),
        }
    }
}

/// Compact JSON encoder backed by `serde_json`.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl JsonCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Encoder for JsonCodec {
    fn encode(&mut self, msg: &StatusMessage, out: &mut Line) -> Result<(), EncodeError> {
        encode_bounded(msg, out)
    }
}

/// Serialize `msg` straight into `out` without touching the heap.
///
/// Bytes past capacity are counted but not stored, so an overflow reports
/// the length the message would have needed.
fn encode_bounded<const N: usize>(
    msg: &StatusMessage,
    out: &mut heapless::String<N>,
) -> Result<(), EncodeError> {
    out.clear();
    let mut writer = BoundedWriter::<N>::new();
    serde_json::to_writer(&mut writer, &WireOut::from_message(msg))
        .map_err(|_| EncodeError::Serialize)?;
    if writer.needed > N {
        return Err(EncodeError::Overflow {
            needed: writer.needed,
            capacity: N,
        });
    }
    *out = heapless::String::from_utf8(writer.buf).map_err(|_| EncodeError::Serialize)?;
    Ok(())
}

/// `io::Write` sink over a fixed buffer that never fails.
struct BoundedWriter<const N: usize> {
    buf: heapless::Vec<u8, N>,
    needed: usize,
}

impl<const N: usize> BoundedWriter<N> {
    fn new() -> Self {
        Self {
            buf: heapless::Vec::new(),
            needed: 0,
        }
    }
}

impl<const N: usize> std::io::Write for BoundedWriter<N> {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        self.needed += data.len();
        if self.needed <= N {
            // Cannot fail: the running total still fits.
            let _ = self.buf.extend_from_slice(data);
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct WireIn<'a> {
    #[serde(default)]
    data: DataIn,
    status: &'a str,
}

/// Every field optional so one shape covers all four statuses; which ones
/// must be present is checked after parsing.
#[derive(Deserialize, Default)]
#[serde(default)]
struct DataIn {
    mpu_begin_status: Option<InitResult>,
    #[serde(deserialize_with = "null_as_nan")]
    temp: Option<f32>,
    #[serde(rename = "accX", deserialize_with = "null_as_nan")]
    acc_x: Option<f32>,
    #[serde(rename = "accY", deserialize_with = "null_as_nan")]
    acc_y: Option<f32>,
    #[serde(rename = "accZ", deserialize_with = "null_as_nan")]
    acc_z: Option<f32>,
    #[serde(rename = "gyroX", deserialize_with = "null_as_nan")]
    gyro_x: Option<f32>,
    #[serde(rename = "gyroY", deserialize_with = "null_as_nan")]
    gyro_y: Option<f32>,
    #[serde(rename = "gyroZ", deserialize_with = "null_as_nan")]
    gyro_z: Option<f32>,
    #[serde(rename = "accAngleX", deserialize_with = "null_as_nan")]
    acc_angle_x: Option<f32>,
    #[serde(rename = "accAngleY", deserialize_with = "null_as_nan")]
    acc_angle_y: Option<f32>,
    #[serde(rename = "angleX", deserialize_with = "null_as_nan")]
    angle_x: Option<f32>,
    #[serde(rename = "angleY", deserialize_with = "null_as_nan")]
    angle_y: Option<f32>,
    #[serde(rename = "angleZ", deserialize_with = "null_as_nan")]
    angle_z: Option<f32>,
}

/// Present-but-null becomes NaN; absent stays `None` via `#[serde(default)]`.
fn null_as_nan<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f32>, D::Error> {
    Option::<f32>::deserialize(d).map(|v| Some(v.unwrap_or(f32::NAN)))
}

impl DataIn {
    /// Values in [`TelemetryField::ALL`] order.
    fn telemetry_slots(&self) -> [Option<f32>; 12] {
        [
            self.temp,
            self.acc_x,
            self.acc_y,
            self.acc_z,
            self.gyro_x,
            self.gyro_y,
            self.gyro_z,
            self.acc_angle_x,
            self.acc_angle_y,
            self.angle_x,
            self.angle_y,
            self.angle_z,
        ]
    }

    fn telemetry(&self) -> Result<Option<Telemetry>, DecodeError> {
        let slots = self.telemetry_slots();
        if slots.iter().all(Option::is_none) {
            return Ok(None);
        }
        let mut t = Telemetry::default();
        for (field, slot) in TelemetryField::ALL.into_iter().zip(slots) {
            t.set(field, slot.ok_or(DecodeError::IncompleteTelemetry)?);
        }
        Ok(Some(t))
    }
}

/// Parse one line back into a [`StatusMessage`].
///
/// Trailing `\r` and `\n` are ignored.  Unknown keys inside `data` are
/// ignored; a Ready line must carry either no telemetry keys or all twelve.
pub fn decode_line(line: &str) -> Result<StatusMessage, DecodeError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let wire: WireIn<'_> = serde_json::from_str(line).map_err(|_| DecodeError::Malformed)?;

    let begin = || wire.data.mpu_begin_status.ok_or(DecodeError::MissingBeginStatus);
    match wire.status {
        "initialising" => Ok(StatusMessage::Initialising {
            begin_status: begin()?,
        }),
        "error" => Ok(StatusMessage::Error {
            begin_status: begin()?,
        }),
        "calibrating" => Ok(StatusMessage::Calibrating),
        "ready" => Ok(StatusMessage::Ready(wire.data.telemetry()?)),
        _ => Err(DecodeError::UnknownStatus),
    }
}
