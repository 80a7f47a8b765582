//! Hardware adapter — bridges the board's peripherals to domain port traits.
//!
//! Owns the IMU and the liveness LED, exposing them through
//! [`SensorDevice`] and [`IndicatorPort`] on one value so the controller can
//! take a single `&mut` to the board.  This is the only module in the
//! system that touches actual hardware.

use embedded_hal::digital::OutputPin;

use crate::app::message::{InitResult, TelemetryField};
use crate::app::ports::{IndicatorPort, SensorDevice};
use crate::drivers::status_led::StatusLed;
use crate::error::DeviceFault;

/// Concrete adapter that combines the board behind port traits.
pub struct HardwareAdapter<D, P> {
    imu: D,
    led: StatusLed<P>,
}

impl<D: SensorDevice, P: OutputPin> HardwareAdapter<D, P> {
    pub fn new(imu: D, led: StatusLed<P>) -> Self {
        Self { imu, led }
    }

    pub fn imu(&self) -> &D {
        &self.imu
    }

    pub fn led(&self) -> &StatusLed<P> {
        &self.led
    }
}

// ── SensorDevice implementation ───────────────────────────────

impl<D: SensorDevice, P> SensorDevice for HardwareAdapter<D, P> {
    fn begin(&mut self) -> InitResult {
        self.imu.begin()
    }

    fn calibrate(&mut self, gyro: bool, accel: bool) {
        self.imu.calibrate(gyro, accel);
    }

    fn update(&mut self) {
        self.imu.update();
    }

    fn read(&self, field: TelemetryField) -> f32 {
        self.imu.read(field)
    }

    fn take_fault(&mut self) -> Option<DeviceFault> {
        self.imu.take_fault()
    }
}

// ── IndicatorPort implementation ──────────────────────────────

impl<D, P: OutputPin> IndicatorPort for HardwareAdapter<D, P> {
    fn toggle(&mut self) {
        self.led.toggle();
    }
}
