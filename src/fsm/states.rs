//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers — no closures, no dynamic
//! dispatch, no heap.
//!
//! ```text
//!  INITIALISING ──[begin == 0]──────────────▶ CALIBRATING ──[calibrated]──▶ READY
//!       │                                        ▲
//!   [begin != 0]                                 │
//!       ▼                                        │
//!     ERROR ──[begin == 0]───────────────────────┘
//!      ▲  │
//!      └──┘ [begin != 0, after backoff]
//! ```

use super::context::FsmContext;
use super::StateDescriptor;
use crate::app::message::{INIT_OK, Status, StatusMessage};
use log::{info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; Status::COUNT] {
    [
        StateDescriptor {
            id: Status::Initialising,
            name: "Initialising",
            on_enter: Some(initialising_enter),
            on_exit: None,
            on_update: initialising_update,
        },
        StateDescriptor {
            id: Status::Error,
            name: "Error",
            on_enter: Some(error_enter),
            on_exit: Some(error_exit),
            on_update: error_update,
        },
        StateDescriptor {
            id: Status::Calibrating,
            name: "Calibrating",
            on_enter: Some(calibrating_enter),
            on_exit: None,
            on_update: calibrating_update,
        },
        StateDescriptor {
            id: Status::Ready,
            name: "Ready",
            on_enter: Some(ready_enter),
            on_exit: None,
            on_update: ready_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  INITIALISING — first begin() attempt
// ═══════════════════════════════════════════════════════════════════════════

fn initialising_enter(_ctx: &mut FsmContext) {
    info!("INITIALISING: probing IMU");
}

fn initialising_update(ctx: &mut FsmContext) -> Option<Status> {
    let code = ctx.begin_result?;
    ctx.announce(StatusMessage::Initialising { begin_status: code });

    if code == INIT_OK {
        Some(Status::Calibrating)
    } else {
        Some(Status::Error)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  ERROR — begin() failed, retried after every backoff
// ═══════════════════════════════════════════════════════════════════════════

fn error_enter(ctx: &mut FsmContext) {
    let code = ctx.begin_result.unwrap_or_default();
    warn!("ERROR: IMU begin failed with code {}, retrying", code);
    ctx.announce(StatusMessage::Error { begin_status: code });
}

fn error_exit(ctx: &mut FsmContext) {
    info!(
        "ERROR: IMU answered after {} retries (loop tick {})",
        ctx.ticks_in_state, ctx.total_ticks
    );
}

fn error_update(ctx: &mut FsmContext) -> Option<Status> {
    match ctx.begin_result? {
        INIT_OK => Some(Status::Calibrating),
        code => {
            ctx.announce(StatusMessage::Error { begin_status: code });
            None
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  CALIBRATING — settle, then compute offsets once
// ═══════════════════════════════════════════════════════════════════════════

fn calibrating_enter(ctx: &mut FsmContext) {
    info!("CALIBRATING: keep the sensor still");
    ctx.announce(StatusMessage::Calibrating);
}

fn calibrating_update(ctx: &mut FsmContext) -> Option<Status> {
    ctx.calibrated.then_some(Status::Ready)
}

// ═══════════════════════════════════════════════════════════════════════════
//  READY — steady state, sampling is driven by the service
// ═══════════════════════════════════════════════════════════════════════════

fn ready_enter(ctx: &mut FsmContext) {
    info!("READY: streaming telemetry");
    ctx.announce(StatusMessage::Ready(None));
}

fn ready_update(_ctx: &mut FsmContext) -> Option<Status> {
    None
}
