//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the rules of the tracker lifecycle: message types,
//! the controller that drives the FSM, and the port traits it talks through.
//! All interaction with hardware happens through **port traits** defined
//! in [`ports`], keeping this layer fully testable without real peripherals.

pub mod message;
pub mod ports;
pub mod service;
