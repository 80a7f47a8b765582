//! Simulated IMU.
//!
//! Stands in for the real sensor on host builds and on boards without one
//! wired up.  `begin()` replays a scripted list of result codes, then
//! succeeds forever.  `update()` advances a deterministic slow wobble so the
//! stream looks alive and tests can predict every value.
//!
//! Raw gyro and accelerometer readings carry a fixed bias; `calibrate()`
//! captures it, so post-calibration readings are centred the same way a
//! real driver's offsets would centre them.

use std::collections::VecDeque;

use log::{debug, info};

use crate::app::message::{InitResult, INIT_OK, TelemetryField};
use crate::app::ports::SensorDevice;
use crate::error::DeviceFault;

/// Phase advance per `update()`, in radians.
const PHASE_STEP: f32 = 0.01;

/// Bias added to the raw gyro axes (°/s).
const GYRO_BIAS: [f32; 3] = [0.8, -0.4, 0.25];

/// Bias added to the raw accelerometer axes (g).
const ACCEL_BIAS: [f32; 3] = [0.02, -0.01, 0.03];

/// Die temperature at rest (°C).
const BASE_TEMP_C: f32 = 25.0;

pub struct SimulatedImu {
    begin_script: VecDeque<InitResult>,
    ready: bool,
    updates: u32,
    calibrations: u32,
    gyro_offset: [f32; 3],
    accel_offset: [f32; 3],
    pending_fault: Option<DeviceFault>,
    snapshot: [f32; 12],
}

impl SimulatedImu {
    /// A device that answers `begin()` with success immediately.
    pub fn new() -> Self {
        Self::with_begin_script(&[])
    }

    /// A device whose first `begin()` calls return `script` in order.
    /// Every call after the script runs out succeeds.
    pub fn with_begin_script(script: &[InitResult]) -> Self {
        Self {
            begin_script: script.iter().copied().collect(),
            ready: false,
            updates: 0,
            calibrations: 0,
            gyro_offset: [0.0; 3],
            accel_offset: [0.0; 3],
            pending_fault: None,
            snapshot: [0.0; 12],
        }
    }

    /// Report `fault` from the next `take_fault()`.
    pub fn inject_fault(&mut self, fault: DeviceFault) {
        self.pending_fault = Some(fault);
    }

    pub fn updates(&self) -> u32 {
        self.updates
    }

    pub fn calibrations(&self) -> u32 {
        self.calibrations
    }

    /// Synthetic motion at `updates`: a slow roll/pitch wobble with a
    /// slower yaw sweep.  Angles in degrees.
    fn pose(updates: u32) -> [f32; 3] {
        let phase = updates as f32 * PHASE_STEP;
        [
            10.0 * phase.sin(),
            5.0 * (0.5 * phase).sin(),
            30.0 * (0.2 * phase).sin(),
        ]
    }

    fn refresh(&mut self) {
        let [roll, pitch, yaw] = Self::pose(self.updates);
        let prev = Self::pose(self.updates.saturating_sub(1));

        // Angular rate as the per-step difference, scaled to °/s at 1 kHz.
        let rate = [
            (roll - prev[0]) * 1_000.0,
            (pitch - prev[1]) * 1_000.0,
            (yaw - prev[2]) * 1_000.0,
        ];

        let (sr, cr) = roll.to_radians().sin_cos();
        let (sp, cp) = pitch.to_radians().sin_cos();
        let acc = [-sp, sr * cp, cr * cp];

        let mut s = [0.0; 12];
        s[0] = BASE_TEMP_C + 0.5 * (self.updates as f32 * PHASE_STEP * 0.01).sin();
        for axis in 0..3 {
            s[1 + axis] = acc[axis] + ACCEL_BIAS[axis] - self.accel_offset[axis];
            s[4 + axis] = rate[axis] + GYRO_BIAS[axis] - self.gyro_offset[axis];
        }
        s[7] = roll;
        s[8] = pitch;
        s[9] = roll;
        s[10] = pitch;
        s[11] = yaw;
        self.snapshot = s;
    }
}

impl Default for SimulatedImu {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorDevice for SimulatedImu {
    fn begin(&mut self) -> InitResult {
        let code = self.begin_script.pop_front().unwrap_or(INIT_OK);
        self.ready = code == INIT_OK;
        debug!("sim IMU: begin() -> {}", code);
        code
    }

    fn calibrate(&mut self, gyro: bool, accel: bool) {
        self.calibrations += 1;
        if gyro {
            self.gyro_offset = GYRO_BIAS;
        }
        if accel {
            self.accel_offset = ACCEL_BIAS;
        }
        info!("sim IMU: offsets captured (gyro={}, accel={})", gyro, accel);
    }

    fn update(&mut self) {
        if !self.ready {
            return;
        }
        self.updates = self.updates.wrapping_add(1);
        self.refresh();
    }

    fn read(&self, field: TelemetryField) -> f32 {
        let idx = TelemetryField::ALL
            .iter()
            .position(|f| *f == field)
            .unwrap_or_default();
        self.snapshot[idx]
    }

    fn take_fault(&mut self) -> Option<DeviceFault> {
        self.pending_fault.take()
    }
}
