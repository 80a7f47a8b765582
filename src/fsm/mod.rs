//! Function-pointer finite state machine engine.
//!
//! Classic embedded FSM pattern ported to Rust:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  StateTable                                                │
//! │  ┌──────────────┬───────────┬──────────┬─────────────────┐ │
//! │  │ Status       │ on_enter  │ on_exit  │ on_update       │ │
//! │  ├──────────────┼───────────┼──────────┼─────────────────┤ │
//! │  │ Initialising │ fn(ctx)   │ -        │ fn(ctx)->Option │ │
//! │  │ Error        │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option │ │
//! │  │ Calibrating  │ fn(ctx)   │ -        │ fn(ctx)->Option │ │
//! │  │ Ready        │ fn(ctx)   │ -        │ fn(ctx)->Option │ │
//! │  └──────────────┴───────────┴──────────┴─────────────────┘ │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** state.
//! If it returns `Some(next)`, the engine runs `on_exit` for the current
//! state, then `on_enter` for the next, and updates the current pointer.
//! Handlers never touch the device: they read the results the service
//! stored in [`FsmContext`] and queue status messages in its outbox.

pub mod context;
pub mod states;

use context::FsmContext;
use log::info;

use crate::app::message::Status;

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each state transition.
pub type StateActionFn = fn(&mut FsmContext);

/// Signature for the per-tick update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut FsmContext) -> Option<Status>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
/// Stored in a fixed-size array — no heap, no `dyn`.
pub struct StateDescriptor {
    pub id: Status,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
pub struct Fsm {
    /// Fixed-size table indexed by `Status as usize`.
    table: [StateDescriptor; Status::COUNT],
    /// Index of the currently active state.
    current: usize,
    /// Monotonically increasing tick counter.
    tick_count: u64,
    /// Tick at which the current state was entered.
    state_entry_tick: u64,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; Status::COUNT], initial: Status) -> Self {
        debug_assert!(
            table.iter().enumerate().all(|(i, d)| d.id as usize == i),
            "state table out of order"
        );
        Self {
            table,
            current: initial as usize,
            tick_count: 0,
            state_entry_tick: 0,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut FsmContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the FSM by one tick.
    ///
    /// 1. Call `on_update` for the current state.
    /// 2. If it returns `Some(next)`, execute the transition:
    ///    `on_exit(current)` → update pointer → `on_enter(next)`.
    pub fn tick(&mut self, ctx: &mut FsmContext) {
        self.tick_count += 1;
        ctx.ticks_in_state = self.tick_count - self.state_entry_tick;
        ctx.total_ticks = self.tick_count;

        let next = (self.table[self.current].on_update)(ctx);

        if let Some(next_id) = next {
            self.transition(next_id, ctx);
        }
    }

    /// The current state's identity.
    pub fn current_state(&self) -> Status {
        Status::from_index(self.current)
    }

    /// How many ticks the FSM has been in the current state.
    pub fn ticks_in_current_state(&self) -> u64 {
        self.tick_count - self.state_entry_tick
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: Status, ctx: &mut FsmContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition at tick {}: {} -> {}",
            self.tick_count, self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        self.state_entry_tick = self.tick_count;
        ctx.ticks_in_state = 0;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
