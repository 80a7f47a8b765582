//! Integration tests for the TrackerService → FSM → status stream pipeline.
//!
//! These run on the host (x86_64) and drive the controller loop against
//! scripted devices and a mock clock, asserting on the exact message
//! sequence and its timing.

use crate::mock_hw::{DeviceCall, MockClock, MockImu, RecordingSink, SharedClock};

use imu_tracker::app::message::{Status, StatusMessage, TelemetryField};
use imu_tracker::app::service::TrackerService;
use imu_tracker::config::TrackerConfig;
use imu_tracker::error::DeviceFault;

struct Rig {
    svc: TrackerService,
    imu: MockImu,
    time: MockClock,
    sink: RecordingSink,
    clock: SharedClock,
    /// Time one loop iteration takes, on top of any delays.
    loop_cost_ms: u64,
}

impl Rig {
    fn new(script: &[u8], config: TrackerConfig) -> Self {
        let clock = SharedClock::default();
        let mut rig = Self {
            svc: TrackerService::new(config),
            imu: MockImu::new(script, &clock),
            time: MockClock::new(&clock),
            sink: RecordingSink::new(&clock),
            clock,
            loop_cost_ms: 1,
        };
        rig.svc.start(&mut rig.sink);
        rig
    }

    fn dead(code: u8) -> Self {
        let mut rig = Self::new(&[], TrackerConfig::default());
        rig.imu = MockImu::dead(code, &rig.clock);
        rig
    }

    fn step(&mut self) {
        self.svc.step(&mut self.imu, &mut self.time, &mut self.sink);
        self.clock.advance(self.loop_cost_ms);
    }

    fn run(&mut self, steps: usize) {
        for _ in 0..steps {
            self.step();
        }
    }

    fn run_until_ready(&mut self) {
        for _ in 0..1_000 {
            if self.svc.status() == Status::Ready {
                return;
            }
            self.step();
        }
        panic!("never reached Ready");
    }
}

// ── Lifecycle sequence ────────────────────────────────────────

#[test]
fn begin_fails_twice_then_succeeds() {
    let mut rig = Rig::new(&[1, 1, 0], TrackerConfig::default());
    rig.run_until_ready();
    rig.run(5);

    assert_eq!(
        rig.sink.lifecycle(),
        vec![
            StatusMessage::Initialising { begin_status: 1 },
            StatusMessage::Error { begin_status: 1 },
            StatusMessage::Error { begin_status: 1 },
            StatusMessage::Calibrating,
            StatusMessage::Ready(None),
        ]
    );
    assert_eq!(rig.sink.telemetry_times().len(), 5);
    assert_eq!(rig.svc.stats().begin_attempts, 3);
}

#[test]
fn each_error_carries_that_attempts_code() {
    let mut rig = Rig::new(&[4, 7, 2, 0], TrackerConfig::default());
    rig.run_until_ready();

    assert_eq!(
        rig.sink.lifecycle(),
        vec![
            StatusMessage::Initialising { begin_status: 4 },
            StatusMessage::Error { begin_status: 4 },
            StatusMessage::Error { begin_status: 7 },
            StatusMessage::Error { begin_status: 2 },
            StatusMessage::Calibrating,
            StatusMessage::Ready(None),
        ]
    );
}

#[test]
fn immediate_success_skips_error() {
    let mut rig = Rig::new(&[0], TrackerConfig::default());
    rig.run_until_ready();
    assert_eq!(
        rig.sink.lifecycle(),
        vec![
            StatusMessage::Initialising { begin_status: 0 },
            StatusMessage::Calibrating,
            StatusMessage::Ready(None),
        ]
    );
    assert!(rig.time.delays.iter().all(|d| *d != 100), "no backoff taken");
}

#[test]
fn dead_sensor_retries_forever_at_backoff_spacing() {
    let mut rig = Rig::dead(2);
    rig.run(200);

    assert_eq!(rig.svc.status(), Status::Error);
    assert!(rig.sink.messages.iter().all(|(_, m)| matches!(
        m.status(),
        Status::Initialising | Status::Error
    )));
    assert_eq!(rig.imu.calibrations(), 0);

    let error_times: Vec<u64> = rig
        .sink
        .messages
        .iter()
        .filter(|(_, m)| m.status() == Status::Error)
        .map(|(t, _)| *t)
        .collect();
    assert_eq!(error_times.len(), 200);
    for pair in error_times.windows(2) {
        assert!(pair[1] - pair[0] >= 100, "errors {:?} too close", pair);
    }
}

// ── Calibration ───────────────────────────────────────────────

#[test]
fn calibrate_runs_once_after_settle_delay() {
    let mut rig = Rig::new(&[0], TrackerConfig::default());
    rig.run(50);

    let calibrations: Vec<_> = rig
        .imu
        .calls
        .iter()
        .filter(|c| matches!(c, DeviceCall::Calibrate { .. }))
        .collect();
    assert_eq!(
        calibrations,
        vec![&DeviceCall::Calibrate {
            gyro: true,
            accel: true
        }]
    );
    assert_eq!(rig.time.delays, vec![1000]);

    // Calibrating is announced before the settle delay starts.
    let (cal_at, _) = rig
        .sink
        .messages
        .iter()
        .find(|(_, m)| *m == StatusMessage::Calibrating)
        .copied()
        .unwrap();
    let (ready_at, _) = rig
        .sink
        .messages
        .iter()
        .find(|(_, m)| *m == StatusMessage::Ready(None))
        .copied()
        .unwrap();
    assert!(ready_at - cal_at >= 1000);
}

#[test]
fn calibration_flags_follow_config() {
    let config = TrackerConfig {
        calibrate_accel: false,
        ..TrackerConfig::default()
    };
    let mut rig = Rig::new(&[0], config);
    rig.run_until_ready();
    assert!(rig.imu.calls.contains(&DeviceCall::Calibrate {
        gyro: true,
        accel: false
    }));
}

#[test]
fn no_device_refresh_before_ready() {
    let mut rig = Rig::new(&[3, 0], TrackerConfig::default());
    rig.run_until_ready();
    assert_eq!(rig.imu.updates(), 0);
    assert!(rig.sink.telemetry_times().is_empty());
}

// ── Sampling ──────────────────────────────────────────────────

#[test]
fn telemetry_respects_interval_and_rate() {
    let config = TrackerConfig {
        sample_interval_ms: 5,
        ..TrackerConfig::default()
    };
    let mut rig = Rig::new(&[0], config);
    rig.run_until_ready();
    let start = rig.clock.now();
    rig.run(1_000);
    let span = rig.clock.now() - start;

    let times = rig.sink.telemetry_times();
    for pair in times.windows(2) {
        assert!(pair[1] - pair[0] >= 5);
    }
    let expected = span / 5;
    let got = times.len() as u64;
    assert!(
        got + 1 >= expected && got <= expected + 1,
        "{got} samples over {span} ms"
    );
}

#[test]
fn update_every_iteration_toggle_every_sample() {
    let config = TrackerConfig {
        sample_interval_ms: 10,
        ..TrackerConfig::default()
    };
    let mut rig = Rig::new(&[0], config);
    rig.run_until_ready();
    rig.run(100);

    assert_eq!(rig.imu.updates(), 100);
    let samples = rig.sink.telemetry_times().len();
    assert_eq!(rig.imu.toggles(), samples);
    assert_eq!(rig.svc.stats().samples_emitted, samples as u64);
    assert!((9..=11).contains(&samples), "{samples}");
}

#[test]
fn telemetry_is_one_consistent_snapshot() {
    let mut rig = Rig::new(&[0], TrackerConfig::default());
    rig.run_until_ready();
    rig.run(20);

    for (at, msg) in &rig.sink.messages {
        let Some(t) = msg.telemetry() else { continue };
        assert_eq!(t.get(TelemetryField::Temperature), 25.0);
        for field in &TelemetryField::ALL[1..] {
            assert_eq!(t.get(*field), *at as f32, "{:?}", field);
        }
    }
}

#[test]
fn stalled_clock_emits_at_most_once() {
    let mut rig = Rig::new(&[0], TrackerConfig::default());
    rig.run_until_ready();
    rig.loop_cost_ms = 0;
    rig.run(50);
    assert_eq!(rig.sink.telemetry_times().len(), 1);
    assert_eq!(rig.imu.updates(), 50);
}

// ── Faults ────────────────────────────────────────────────────

#[test]
fn device_faults_are_counted_not_reported() {
    let mut rig = Rig::new(&[0], TrackerConfig::default());
    rig.run_until_ready();
    rig.imu.faults.push_back(DeviceFault::Timeout);
    rig.imu.faults.push_back(DeviceFault::Nack);
    rig.run(10);

    assert_eq!(rig.svc.status(), Status::Ready);
    assert_eq!(rig.svc.stats().device_faults, 2);
    assert!(rig
        .sink
        .messages
        .iter()
        .all(|(_, m)| m.status() != Status::Error));
}

#[test]
fn loop_iterations_are_counted() {
    let mut rig = Rig::new(&[1, 0], TrackerConfig::default());
    rig.run(25);
    assert_eq!(rig.svc.stats().loop_iterations, 25);
}
