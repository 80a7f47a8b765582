//! Outbound status messages — the only artifact the tracker produces.
//!
//! The [`TrackerService`](super::service::TrackerService) emits these through
//! the [`StatusSink`](super::ports::StatusSink) port.  The sink decides how
//! they reach the wire (JSON line over serial in production, a `Vec` in tests).

use serde::Serialize;

use super::ports::SensorDevice;

/// Result code of `SensorDevice::begin()`.  `0` = success, anything else is a
/// driver-specific error code reported verbatim.
pub type InitResult = u8;

/// `begin()` succeeded.
pub const INIT_OK: InitResult = 0;

/// Lifecycle status — the discriminant of the controller's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Status {
    Initialising = 0,
    Error = 1,
    Calibrating = 2,
    Ready = 3,
}

impl Status {
    /// Total number of states — sizes the FSM table.
    pub const COUNT: usize = 4;

    /// Convert an index back to `Status`.  Out-of-range indices fall back to
    /// `Error` in release builds.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Initialising,
            1 => Self::Error,
            2 => Self::Calibrating,
            3 => Self::Ready,
            _ => {
                debug_assert!(false, "invalid status index: {idx}");
                Self::Error
            }
        }
    }

    /// Wire name, as it appears in the `status` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initialising => "initialising",
            Self::Error => "error",
            Self::Calibrating => "calibrating",
            Self::Ready => "ready",
        }
    }
}

/// One readable IMU quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TelemetryField {
    Temperature,
    AccelX,
    AccelY,
    AccelZ,
    GyroX,
    GyroY,
    GyroZ,
    AccelAngleX,
    AccelAngleY,
    AngleX,
    AngleY,
    AngleZ,
}

impl TelemetryField {
    /// Every field, in wire order.
    pub const ALL: [Self; 12] = [
        Self::Temperature,
        Self::AccelX,
        Self::AccelY,
        Self::AccelZ,
        Self::GyroX,
        Self::GyroY,
        Self::GyroZ,
        Self::AccelAngleX,
        Self::AccelAngleY,
        Self::AngleX,
        Self::AngleY,
        Self::AngleZ,
    ];

    /// JSON key for this field.
    pub fn key(self) -> &'static str {
        match self {
            Self::Temperature => "temp",
            Self::AccelX => "accX",
            Self::AccelY => "accY",
            Self::AccelZ => "accZ",
            Self::GyroX => "gyroX",
            Self::GyroY => "gyroY",
            Self::GyroZ => "gyroZ",
            Self::AccelAngleX => "accAngleX",
            Self::AccelAngleY => "accAngleY",
            Self::AngleX => "angleX",
            Self::AngleY => "angleY",
            Self::AngleZ => "angleZ",
        }
    }
}

/// A point-in-time IMU reading.
///
/// Units follow the driver: °C, g, °/s and degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Telemetry {
    #[serde(rename = "temp")]
    pub temperature: f32,
    #[serde(rename = "accX")]
    pub accel_x: f32,
    #[serde(rename = "accY")]
    pub accel_y: f32,
    #[serde(rename = "accZ")]
    pub accel_z: f32,
    #[serde(rename = "gyroX")]
    pub gyro_x: f32,
    #[serde(rename = "gyroY")]
    pub gyro_y: f32,
    #[serde(rename = "gyroZ")]
    pub gyro_z: f32,
    /// Pitch/roll derived from the accelerometer alone.
    #[serde(rename = "accAngleX")]
    pub accel_angle_x: f32,
    #[serde(rename = "accAngleY")]
    pub accel_angle_y: f32,
    /// Fused orientation maintained by the driver's `update()`.
    #[serde(rename = "angleX")]
    pub angle_x: f32,
    #[serde(rename = "angleY")]
    pub angle_y: f32,
    #[serde(rename = "angleZ")]
    pub angle_z: f32,
}

impl Telemetry {
    /// Read every field from the device.  Call right after `update()` so all
    /// values come from the same refresh.
    pub fn capture(device: &impl SensorDevice) -> Self {
        let mut t = Self::default();
        for field in TelemetryField::ALL {
            t.set(field, device.read(field));
        }
        t
    }

    pub fn get(&self, field: TelemetryField) -> f32 {
        match field {
            TelemetryField::Temperature => self.temperature,
            TelemetryField::AccelX => self.accel_x,
            TelemetryField::AccelY => self.accel_y,
            TelemetryField::AccelZ => self.accel_z,
            TelemetryField::GyroX => self.gyro_x,
            TelemetryField::GyroY => self.gyro_y,
            TelemetryField::GyroZ => self.gyro_z,
            TelemetryField::AccelAngleX => self.accel_angle_x,
            TelemetryField::AccelAngleY => self.accel_angle_y,
            TelemetryField::AngleX => self.angle_x,
            TelemetryField::AngleY => self.angle_y,
            TelemetryField::AngleZ => self.angle_z,
        }
    }

    pub fn set(&mut self, field: TelemetryField, value: f32) {
        let slot = match field {
            TelemetryField::Temperature => &mut self.temperature,
            TelemetryField::AccelX => &mut self.accel_x,
            TelemetryField::AccelY => &mut self.accel_y,
            TelemetryField::AccelZ => &mut self.accel_z,
            TelemetryField::GyroX => &mut self.gyro_x,
            TelemetryField::GyroY => &mut self.gyro_y,
            TelemetryField::GyroZ => &mut self.gyro_z,
            TelemetryField::AccelAngleX => &mut self.accel_angle_x,
            TelemetryField::AccelAngleY => &mut self.accel_angle_y,
            TelemetryField::AngleX => &mut self.angle_x,
            TelemetryField::AngleY => &mut self.angle_y,
            TelemetryField::AngleZ => &mut self.angle_z,
        };
        *slot = value;
    }
}

/// Structured message written to the status stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatusMessage {
    /// First message after boot, carrying the first `begin()` result.
    Initialising { begin_status: InitResult },
    /// `begin()` failed with this code; a retry follows after the backoff.
    Error { begin_status: InitResult },
    /// Calibration is about to start; keep the sensor still.
    Calibrating,
    /// `None` once on entering Ready, then one `Some` per sampling tick.
    Ready(Option<Telemetry>),
}

impl StatusMessage {
    pub fn status(&self) -> Status {
        match self {
            Self::Initialising { .. } => Status::Initialising,
            Self::Error { .. } => Status::Error,
            Self::Calibrating => Status::Calibrating,
            Self::Ready(_) => Status::Ready,
        }
    }

    pub fn telemetry(&self) -> Option<&Telemetry> {
        match self {
            Self::Ready(Some(t)) => Some(t),
            _ => None,
        }
    }
}
