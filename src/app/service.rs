//! Tracker service — the controller.
//!
//! [`TrackerService`] owns the FSM, the sampling scheduler and the shared
//! context.  All I/O flows through port traits passed in at call sites, so
//! the whole lifecycle runs against mock adapters in tests.
//!
//! ```text
//!  SensorDevice ──▶ ┌──────────────────────────┐ ──▶ StatusSink
//!                   │      TrackerService      │
//! IndicatorPort ◀── │   FSM · SampleScheduler  │ ◀── TimePort
//!                   └──────────────────────────┘
//! ```
//!
//! One [`step`](TrackerService::step) is one iteration of the firmware loop:
//! perform the device work the current state calls for, tick the FSM, then
//! flush whatever the handlers announced.

use log::{debug, info, warn};

use crate::config::TrackerConfig;
use crate::error::SensorError;
use crate::fsm::context::FsmContext;
use crate::fsm::states::build_state_table;
use crate::fsm::Fsm;
use crate::scheduler::SampleScheduler;

use super::message::{INIT_OK, Status, StatusMessage, Telemetry};
use super::ports::{IndicatorPort, SensorDevice, StatusSink, TimePort};

/// Counters exposed for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackerStats {
    /// Calls to `begin()`, successful or not.
    pub begin_attempts: u32,
    /// Ready+telemetry messages emitted.
    pub samples_emitted: u64,
    /// Calls to `step()`.
    pub loop_iterations: u64,
    /// Faults reported through `SensorDevice::take_fault`.
    pub device_faults: u32,
}

// ───────────────────────────────────────────────────────────────
// TrackerService
// ───────────────────────────────────────────────────────────────

pub struct TrackerService {
    fsm: Fsm,
    ctx: FsmContext,
    scheduler: SampleScheduler,
    config: TrackerConfig,
    stats: TrackerStats,
    started: bool,
}

impl TrackerService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM — call [`start`](Self::start) next.
    pub fn new(config: TrackerConfig) -> Self {
        let scheduler = SampleScheduler::new(config.sample_interval_ms);
        Self {
            fsm: Fsm::new(build_state_table(), Status::Initialising),
            ctx: FsmContext::new(),
            scheduler,
            config,
            stats: TrackerStats::default(),
            started: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Run the initial state's entry action.
    pub fn start(&mut self, sink: &mut impl StatusSink) {
        if self.started {
            return;
        }
        self.started = true;
        self.fsm.start(&mut self.ctx);
        self.flush(sink);
        info!(
            "TrackerService started (backoff={}ms, settle={}ms, interval={}ms)",
            self.config.init_retry_backoff_ms,
            self.config.calibration_settle_ms,
            self.scheduler.interval_ms()
        );
    }

    /// Run forever.  There is no shutdown path; the loop ends at power loss.
    pub fn run(
        &mut self,
        hw: &mut (impl SensorDevice + IndicatorPort),
        time: &mut impl TimePort,
        sink: &mut impl StatusSink,
    ) -> ! {
        self.start(sink);
        loop {
            self.step(hw, time, sink);
        }
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// One loop iteration: device work for the current state → FSM tick →
    /// flush announcements.
    ///
    /// `hw` satisfies both [`SensorDevice`] and [`IndicatorPort`] so the
    /// LED and the IMU can share one board adapter without a double borrow.
    pub fn step(
        &mut self,
        hw: &mut (impl SensorDevice + IndicatorPort),
        time: &mut impl TimePort,
        sink: &mut impl StatusSink,
    ) {
        self.start(sink);
        self.stats.loop_iterations += 1;

        match self.fsm.current_state() {
            Status::Initialising => self.attempt_begin(hw),
            Status::Error => {
                time.delay_ms(self.config.init_retry_backoff_ms);
                self.attempt_begin(hw);
            }
            Status::Calibrating => self.calibrate_once(hw, time),
            Status::Ready => self.sample(hw, &*time, sink),
        }

        self.fsm.tick(&mut self.ctx);
        self.flush(sink);
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current lifecycle status.
    pub fn status(&self) -> Status {
        self.fsm.current_state()
    }

    pub fn stats(&self) -> TrackerStats {
        self.stats
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    // ── Internal ──────────────────────────────────────────────

    fn attempt_begin(&mut self, hw: &mut impl SensorDevice) {
        let code = hw.begin();
        self.stats.begin_attempts = self.stats.begin_attempts.saturating_add(1);
        if code != INIT_OK {
            debug!(
                "begin() attempt {}: {}",
                self.stats.begin_attempts,
                SensorError::InitFailed(code)
            );
        }
        self.ctx.begin_result = Some(code);
    }

    fn calibrate_once(&mut self, hw: &mut impl SensorDevice, time: &mut impl TimePort) {
        if self.ctx.calibrated {
            return;
        }
        time.delay_ms(self.config.calibration_settle_ms);
        hw.calibrate(self.config.calibrate_gyro, self.config.calibrate_accel);
        self.ctx.calibrated = true;
        self.check_fault(hw);
        info!("Calibration complete");
    }

    fn sample(
        &mut self,
        hw: &mut (impl SensorDevice + IndicatorPort),
        time: &impl TimePort,
        sink: &mut impl StatusSink,
    ) {
        // The device refresh runs every iteration; only emission is gated.
        hw.update();
        self.check_fault(hw);

        if !self.scheduler.poll(time.now_ms()) {
            return;
        }

        hw.toggle();
        let telemetry = Telemetry::capture(&*hw);
        sink.emit(&StatusMessage::Ready(Some(telemetry)));
        self.stats.samples_emitted += 1;
    }

    fn check_fault(&mut self, hw: &mut impl SensorDevice) {
        if let Some(fault) = hw.take_fault() {
            self.stats.device_faults = self.stats.device_faults.saturating_add(1);
            warn!(
                "IMU {} in {:?}, continuing",
                SensorError::Bus(fault),
                self.fsm.current_state()
            );
        }
    }

    fn flush(&mut self, sink: &mut impl StatusSink) {
        for msg in self.ctx.drain_outbox() {
            sink.emit(&msg);
        }
    }
}
