//! System time adapter.
//!
//! Implements [`TimePort`]: a monotonic millisecond clock plus a blocking
//! delay.
//!
//! - **`target_os = "espidf"` with the `espidf` feature** — the clock
//!   wraps `esp_timer_get_time()` from the ESP-IDF high-resolution timer
//!   (microsecond precision, monotonic); pair it with
//!   `esp_idf_svc::hal::delay::FreeRtos`.
//! - **otherwise** — the clock uses `std::time::Instant`;
//!   pair it with [`StdDelay`].

use embedded_hal::delay::DelayNs;

use crate::app::ports::TimePort;

/// Clock plus a delay provider.
pub struct SystemTime<D> {
    delay: D,
    #[cfg(not(all(target_os = "espidf", feature = "espidf")))]
    start: std::time::Instant,
}

impl<D: DelayNs> SystemTime<D> {
    pub fn new(delay: D) -> Self {
        Self {
            delay,
            #[cfg(not(all(target_os = "espidf", feature = "espidf")))]
            start: std::time::Instant::now(),
        }
    }

    /// Microseconds since boot (monotonic).
    #[cfg(all(target_os = "espidf", feature = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    /// Microseconds since construction (monotonic).
    #[cfg(not(all(target_os = "espidf", feature = "espidf")))]
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

impl<D: DelayNs> TimePort for SystemTime<D> {
    fn now_ms(&self) -> u64 {
        self.uptime_us() / 1_000
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}

/// Thread-sleep delay for host builds.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}
