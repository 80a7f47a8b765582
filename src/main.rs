//! IMU Tracker Firmware — Main Entry Point
//!
//! Hexagonal architecture around a single-threaded polling loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter        SerialStatusSink        SystemTime     │
//! │  (SensorDevice +        (StatusSink:            (TimePort)     │
//! │   IndicatorPort)         JsonCodec → UART)                     │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            TrackerService (pure logic)                 │    │
//! │  │  FSM · SampleScheduler                                 │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The status stream goes to stdout, which is the UART console on
//! ESP-IDF.  Log output is diagnostic only.
#![deny(unused_must_use)]

use anyhow::Result;
use log::info;

use imu_tracker::adapters::hardware::HardwareAdapter;
use imu_tracker::adapters::serial_sink::SerialStatusSink;
use imu_tracker::adapters::sim_imu::SimulatedImu;
use imu_tracker::adapters::time::SystemTime;
use imu_tracker::app::service::TrackerService;
use imu_tracker::codec::JsonCodec;
use imu_tracker::config::TrackerConfig;
use imu_tracker::drivers::status_led::StatusLed;
use imu_tracker::error::Error;
use imu_tracker::transport::StdoutTransport;

// ── Main ──────────────────────────────────────────────────────

#[cfg(all(target_os = "espidf", feature = "espidf"))]
fn main() -> Result<()> {
    use esp_idf_svc::hal::delay::FreeRtos;
    use esp_idf_svc::hal::gpio::{AnyOutputPin, PinDriver};
    use imu_tracker::pins;

    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    banner();

    // ── 2. Config ─────────────────────────────────────────────
    let config = TrackerConfig::default();
    config.validate().map_err(Error::from)?;

    // ── 3. Board ──────────────────────────────────────────────
    // SAFETY: the LED pin is claimed exactly once, here, and nothing else
    // in the firmware drives it.
    let led_pin = unsafe { AnyOutputPin::new(pins::LIVENESS_LED_GPIO) };
    let led = StatusLed::new(PinDriver::output(led_pin)?);
    let mut board = HardwareAdapter::new(SimulatedImu::new(), led);
    let mut time = SystemTime::new(FreeRtos);
    let mut sink = SerialStatusSink::new(JsonCodec::new(), StdoutTransport::new());

    // ── 4. Run ────────────────────────────────────────────────
    let mut service = TrackerService::new(config);
    service.run(&mut board, &mut time, &mut sink)
}

#[cfg(not(target_os = "espidf"))]
fn main() -> Result<()> {
    use imu_tracker::adapters::time::StdDelay;
    use imu_tracker::drivers::status_led::SimPin;

    // ── 1. Host bootstrap ─────────────────────────────────────
    env_logger::init();
    banner();

    // ── 2. Config ─────────────────────────────────────────────
    let config = TrackerConfig::default();
    config.validate().map_err(Error::from)?;

    // ── 3. Simulated board ────────────────────────────────────
    // A couple of failed probes first, so the error path shows up in the
    // stream the same way a loose bus connection would.
    let imu = SimulatedImu::with_begin_script(&[2, 2]);
    let mut board = HardwareAdapter::new(imu, StatusLed::new(SimPin::new()));
    let mut time = SystemTime::new(StdDelay);
    let mut sink = SerialStatusSink::new(JsonCodec::new(), StdoutTransport::new());

    // ── 4. Run ────────────────────────────────────────────────
    let mut service = TrackerService::new(config);
    service.run(&mut board, &mut time, &mut sink)
}

#[cfg(all(target_os = "espidf", not(feature = "espidf")))]
compile_error!("the imu-tracker firmware binary needs `--features espidf` on ESP-IDF targets");

fn banner() {
    info!("IMU tracker v{}", env!("CARGO_PKG_VERSION"));
}
