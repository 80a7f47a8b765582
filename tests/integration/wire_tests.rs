//! End-to-end tests: controller → JSON lines on a byte transport → relay.
//!
//! Uses the real codec, sink, simulated IMU and board adapter; only the
//! clock is mocked so the run is instant and deterministic.

use crate::mock_hw::{MockClock, SharedClock};

use imu_tracker::adapters::hardware::HardwareAdapter;
use imu_tracker::adapters::serial_sink::SerialStatusSink;
use imu_tracker::adapters::sim_imu::SimulatedImu;
use imu_tracker::app::message::{Status, StatusMessage};
use imu_tracker::app::service::TrackerService;
use imu_tracker::codec::{decode_line, JsonCodec, MAX_LINE_LEN};
use imu_tracker::config::TrackerConfig;
use imu_tracker::drivers::status_led::{SimPin, StatusLed};
use imu_tracker::relay::{LineDecoder, Relay, POSE_PACKET_LEN};

fn run_board(script: &[u8], steps: usize) -> (Vec<u8>, HardwareAdapter<SimulatedImu, SimPin>) {
    let clock = SharedClock::default();
    let mut time = MockClock::new(&clock);
    let mut board = HardwareAdapter::new(
        SimulatedImu::with_begin_script(script),
        StatusLed::new(SimPin::new()),
    );
    let mut sink = SerialStatusSink::new(JsonCodec::new(), Vec::new());
    let mut svc = TrackerService::new(TrackerConfig::default());

    svc.start(&mut sink);
    for _ in 0..steps {
        svc.step(&mut board, &mut time, &mut sink);
        clock.advance(1);
    }
    assert_eq!(sink.dropped(), 0);
    (sink.transport().clone(), board)
}

#[test]
fn stream_is_crlf_json_lines_in_lifecycle_order() {
    let (bytes, _) = run_board(&[5, 0], 10);
    let text = String::from_utf8(bytes).unwrap();
    assert!(text.ends_with("\r\n"));

    let lines: Vec<&str> = text.split_terminator("\r\n").collect();
    assert_eq!(
        lines[..4],
        [
            r#"{"data":{"mpu_begin_status":5},"status":"initialising"}"#,
            r#"{"data":{"mpu_begin_status":5},"status":"error"}"#,
            r#"{"data":{},"status":"calibrating"}"#,
            r#"{"data":{},"status":"ready"}"#,
        ]
    );

    for line in &lines {
        assert!(line.len() <= MAX_LINE_LEN);
        assert!(!line.contains('\n'));
    }

    let decoded: Vec<StatusMessage> = lines.iter().map(|l| decode_line(l).unwrap()).collect();
    assert!(decoded[4..].iter().all(|m| m.telemetry().is_some()));
    assert_eq!(decoded.len(), 4 + 7);
}

#[test]
fn led_blinks_with_telemetry() {
    let (bytes, board) = run_board(&[], 12);
    let samples = String::from_utf8(bytes)
        .unwrap()
        .lines()
        .filter(|l| l.contains("\"temp\""))
        .count();
    assert_eq!(samples, 10);
    assert_eq!(board.led().toggles() as usize, samples);
    assert!(!board.led().is_lit(), "even number of toggles");
}

#[test]
fn relay_turns_stream_into_pose_packets() {
    let (bytes, _) = run_board(&[1, 1, 0], 25);

    let mut decoder = LineDecoder::new();
    let mut relay = Relay::new();
    let mut packets = Vec::new();
    // Feed in awkward chunk sizes to exercise partial lines.
    for chunk in bytes.chunks(37) {
        decoder.feed(chunk, |line| {
            if let Some(p) = relay.handle_line(line) {
                packets.push(p.to_bytes());
            }
        });
    }

    let stats = relay.stats();
    // Initialising, 2× Error, Calibrating, bare Ready.
    assert_eq!(stats.skipped, 5);
    assert_eq!(stats.malformed, 0);
    assert_eq!(stats.forwarded as usize, packets.len());
    assert_eq!(packets.len(), 25 - 4);
    assert!(packets.iter().all(|p| p.len() == POSE_PACKET_LEN));
    assert!(packets.iter().all(|p| p[..24].iter().all(|b| *b == 0)));
}

#[test]
fn decoded_stream_status_never_goes_backwards() {
    let (bytes, _) = run_board(&[9, 9, 9, 0], 30);
    let text = String::from_utf8(bytes).unwrap();
    let rank = |s: Status| match s {
        Status::Initialising => 0,
        Status::Error => 1,
        Status::Calibrating => 2,
        Status::Ready => 3,
    };
    let statuses: Vec<Status> = text
        .lines()
        .map(|l| decode_line(l).unwrap().status())
        .collect();
    for pair in statuses.windows(2) {
        assert!(rank(pair[1]) >= rank(pair[0]), "{:?}", pair);
    }
}
