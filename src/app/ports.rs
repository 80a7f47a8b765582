//! Port traits — the boundary between the controller and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ TrackerService (domain)
//! ```
//!
//! Driven adapters (IMU, LED, clock, status stream) implement these traits.
//! The [`TrackerService`](super::service::TrackerService) consumes them via
//! generics, so the controller never touches hardware directly.

use super::message::{InitResult, StatusMessage, TelemetryField};
use crate::error::DeviceFault;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: IMU → domain)
// ───────────────────────────────────────────────────────────────

/// The inertial sensor as the controller sees it.
///
/// Register access, offset computation and angle integration all live
/// behind this trait.
pub trait SensorDevice {
    /// Probe and configure the device.  Returns `0` on success, otherwise a
    /// driver-specific error code.
    fn begin(&mut self) -> InitResult;

    /// Compute and store offsets.  Blocks until done; the sensor must be
    /// still for the whole call.
    fn calibrate(&mut self, gyro: bool, accel: bool);

    /// Refresh the raw readings and the fused angles.
    fn update(&mut self);

    /// Value of `field` as of the last `update()`.
    fn read(&self, field: TelemetryField) -> f32;

    /// Fault observed during the last `calibrate()` or `update()`, if the
    /// driver can detect one.  Taking it clears it.
    fn take_fault(&mut self) -> Option<DeviceFault> {
        None
    }
}

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → LED)
// ───────────────────────────────────────────────────────────────

/// Liveness indicator toggled once per emitted sample.
pub trait IndicatorPort {
    fn toggle(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Time port (driven adapter: domain ↔ system timer)
// ───────────────────────────────────────────────────────────────

/// Monotonic clock plus blocking delay.
///
/// Both live on one port so a test double can advance its clock when
/// the controller sleeps.
pub trait TimePort {
    /// Milliseconds since an arbitrary fixed origin.  Never decreases.
    fn now_ms(&self) -> u64;

    /// Block the calling thread for `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Status sink port (driven adapter: domain → serial stream)
// ───────────────────────────────────────────────────────────────

/// Destination of every [`StatusMessage`].  Best-effort: the controller
/// does not learn whether a message reached the wire.
pub trait StatusSink {
    fn emit(&mut self, msg: &StatusMessage);
}
