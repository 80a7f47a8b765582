//! Mock hardware adapters for integration tests.
//!
//! Records every device call and every emitted message, stamped with the
//! mock clock, so tests can assert on the full history without touching a
//! real bus, GPIO or UART.

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use imu_tracker::app::message::{InitResult, StatusMessage, TelemetryField};
use imu_tracker::app::ports::{IndicatorPort, SensorDevice, StatusSink, TimePort};
use imu_tracker::error::DeviceFault;

// ── Device call record ────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeviceCall {
    Begin(InitResult),
    Calibrate { gyro: bool, accel: bool },
    Update,
    Toggle,
}

// ── MockImu ───────────────────────────────────────────────────

/// IMU + LED in one, like the real board adapter.
pub struct MockImu {
    script: VecDeque<InitResult>,
    /// Result once the script runs out.
    pub fallback: InitResult,
    pub calls: Vec<DeviceCall>,
    pub faults: VecDeque<DeviceFault>,
    clock: SharedClock,
}

#[allow(dead_code)]
impl MockImu {
    pub fn new(script: &[InitResult], clock: &SharedClock) -> Self {
        Self {
            script: script.iter().copied().collect(),
            fallback: 0,
            calls: Vec::new(),
            faults: VecDeque::new(),
            clock: clock.clone(),
        }
    }

    /// A device whose `begin()` never succeeds.
    pub fn dead(code: InitResult, clock: &SharedClock) -> Self {
        let mut imu = Self::new(&[], clock);
        imu.fallback = code;
        imu
    }

    pub fn count(&self, pred: impl Fn(&DeviceCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn calibrations(&self) -> usize {
        self.count(|c| matches!(c, DeviceCall::Calibrate { .. }))
    }

    pub fn updates(&self) -> usize {
        self.count(|c| matches!(c, DeviceCall::Update))
    }

    pub fn toggles(&self) -> usize {
        self.count(|c| matches!(c, DeviceCall::Toggle))
    }
}

impl SensorDevice for MockImu {
    fn begin(&mut self) -> InitResult {
        let code = self.script.pop_front().unwrap_or(self.fallback);
        self.calls.push(DeviceCall::Begin(code));
        code
    }

    fn calibrate(&mut self, gyro: bool, accel: bool) {
        self.calls.push(DeviceCall::Calibrate { gyro, accel });
    }

    fn update(&mut self) {
        self.calls.push(DeviceCall::Update);
    }

    /// Every field reads the current clock, so a snapshot taken in one
    /// step is internally consistent and distinguishable across steps.
    fn read(&self, field: TelemetryField) -> f32 {
        match field {
            TelemetryField::Temperature => 25.0,
            _ => self.clock.now() as f32,
        }
    }

    fn take_fault(&mut self) -> Option<DeviceFault> {
        self.faults.pop_front()
    }
}

impl IndicatorPort for MockImu {
    fn toggle(&mut self) {
        self.calls.push(DeviceCall::Toggle);
    }
}

// ── SharedClock / MockClock ───────────────────────────────────

/// Millisecond counter shared between the clock, the device and the sink.
#[derive(Clone, Default)]
pub struct SharedClock(Rc<Cell<u64>>);

impl SharedClock {
    pub fn now(&self) -> u64 {
        self.0.get()
    }

    pub fn advance(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }
}

/// `TimePort` whose delays advance the shared clock instantly.
pub struct MockClock {
    clock: SharedClock,
    pub delays: Vec<u32>,
}

impl MockClock {
    pub fn new(clock: &SharedClock) -> Self {
        Self {
            clock: clock.clone(),
            delays: Vec::new(),
        }
    }
}

impl TimePort for MockClock {
    fn now_ms(&self) -> u64 {
        self.clock.now()
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays.push(ms);
        self.clock.advance(u64::from(ms));
    }
}

// ── RecordingSink ─────────────────────────────────────────────

/// Records `(time_ms, message)` for every emission.
pub struct RecordingSink {
    clock: SharedClock,
    pub messages: Vec<(u64, StatusMessage)>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new(clock: &SharedClock) -> Self {
        Self {
            clock: clock.clone(),
            messages: Vec::new(),
        }
    }

    /// Messages before the first telemetry sample.
    pub fn lifecycle(&self) -> Vec<StatusMessage> {
        self.messages
            .iter()
            .map(|(_, m)| *m)
            .take_while(|m| m.telemetry().is_none())
            .collect()
    }

    /// Timestamps of telemetry emissions.
    pub fn telemetry_times(&self) -> Vec<u64> {
        self.messages
            .iter()
            .filter(|(_, m)| m.telemetry().is_some())
            .map(|(t, _)| *t)
            .collect()
    }
}

impl StatusSink for RecordingSink {
    fn emit(&mut self, msg: &StatusMessage) {
        self.messages.push((self.clock.now(), *msg));
    }
}
