//! GPIO pin assignments for the tracker board (ESP32 DevKit).
//!
//! Single source of truth — drivers reference this module rather than
//! hard-coding pin numbers.

/// On-board LED, toggled once per emitted telemetry sample.
pub const LIVENESS_LED_GPIO: i32 = 2;
