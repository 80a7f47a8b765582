//! Sampling scheduler.
//!
//! A polling gate, not a timer: the Ready loop calls [`SampleScheduler::poll`]
//! on every iteration with the current monotonic time, and gets `true` at
//! most once per interval.
//!
//! ```text
//!  loop ──▶ update() ──▶ poll(now) ──true──▶ toggle LED, read, emit
//!                            │
//!                          false
//!                            ▼
//!                      next iteration
//! ```
//!
//! This keeps the device refresh rate (every iteration) independent of the
//! message rate (bounded by the interval).

/// Interval gate for telemetry emission.
pub struct SampleScheduler {
    interval_ms: u64,
    /// Time of the last fire; starts at the clock origin.
    last_sample_ms: u64,
    fired: u64,
    skipped: u64,
}

impl SampleScheduler {
    pub fn new(interval_ms: u32) -> Self {
        debug_assert!(interval_ms > 0, "sample interval must be non-zero");
        Self {
            interval_ms: u64::from(interval_ms),
            last_sample_ms: 0,
            fired: 0,
            skipped: 0,
        }
    }

    /// Returns `true` if at least one interval has elapsed since the last
    /// fire, and records `now_ms` as the new reference point.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        if now_ms.saturating_sub(self.last_sample_ms) >= self.interval_ms {
            self.last_sample_ms = now_ms;
            self.fired += 1;
            true
        } else {
            self.skipped += 1;
            false
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Number of polls that fired.
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Number of polls that were gated out.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}
