//! IMU tracker firmware library.
//!
//! Exposes the pure-logic modules for integration testing and for the host
//! relay. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod codec;
pub mod config;
pub mod error;
pub mod fsm;
pub mod relay;
pub mod scheduler;
pub mod transport;

pub mod pins;

// Board-facing modules; each has a host simulation counterpart.
pub mod adapters;
pub mod drivers;
