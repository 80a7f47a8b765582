//! Shared mutable context threaded through every FSM handler.
//!
//! The service writes device results in here (`begin_result`, `calibrated`)
//! before each tick; handlers read them, decide transitions and queue the
//! status messages the service must emit afterwards.

use heapless::Deque;
use log::warn;

use crate::app::message::{InitResult, StatusMessage};

/// Most messages one tick can queue: Initialising followed by Error, with
/// room to spare.
pub const OUTBOX_CAPACITY: usize = 4;

/// The shared context passed to every state handler function.
pub struct FsmContext {
    // -- Timing --
    /// Ticks elapsed since the current state was entered.
    pub ticks_in_state: u64,
    /// Monotonic total tick count.
    pub total_ticks: u64,

    // -- Device results --
    /// Result of the most recent `begin()` call; `None` before the first.
    pub begin_result: Option<InitResult>,
    /// Set once `calibrate()` has returned.
    pub calibrated: bool,

    // -- Output --
    outbox: Deque<StatusMessage, OUTBOX_CAPACITY>,
}

impl FsmContext {
    pub fn new() -> Self {
        Self {
            ticks_in_state: 0,
            total_ticks: 0,
            begin_result: None,
            calibrated: false,
            outbox: Deque::new(),
        }
    }

    /// Queue a message for the service to emit after this tick.
    pub fn announce(&mut self, msg: StatusMessage) {
        if let Err(dropped) = self.outbox.push_back(msg) {
            debug_assert!(false, "outbox overflow");
            warn!("FSM outbox full, dropping {:?}", dropped.status());
        }
    }

    /// Take queued messages in the order they were announced.
    pub fn drain_outbox(&mut self) -> impl Iterator<Item = StatusMessage> + '_ {
        core::iter::from_fn(move || self.outbox.pop_front())
    }
}

impl Default for FsmContext {
    fn default() -> Self {
        Self::new()
    }
}
