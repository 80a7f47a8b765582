//! Liveness LED driver.
//!
//! One GPIO drives a single LED that flips on every emitted sample, so a
//! steady blink means the sampling loop is alive.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: wraps an `esp-idf-hal` `PinDriver` through the
//! `embedded_hal::digital::OutputPin` trait.
//! On host/test: wraps [`SimPin`], which tracks the level in memory.

use embedded_hal::digital::{ErrorType, OutputPin};
use log::warn;

pub struct StatusLed<P> {
    pin: P,
    lit: bool,
    toggles: u32,
}

impl<P: OutputPin> StatusLed<P> {
    /// Take ownership of `pin` and drive it low.
    pub fn new(mut pin: P) -> Self {
        if pin.set_low().is_err() {
            warn!("status LED: initial set_low failed");
        }
        Self {
            pin,
            lit: false,
            toggles: 0,
        }
    }

    /// Invert the LED.  A failed pin write leaves the tracked level as it
    /// was, so the next toggle retries the same edge.
    pub fn toggle(&mut self) {
        let res = if self.lit {
            self.pin.set_low()
        } else {
            self.pin.set_high()
        };
        match res {
            Ok(()) => {
                self.lit = !self.lit;
                self.toggles = self.toggles.wrapping_add(1);
            }
            Err(e) => warn!("status LED: pin write failed: {:?}", e),
        }
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    /// Successful toggles since construction (wraps).
    pub fn toggles(&self) -> u32 {
        self.toggles
    }
}

/// In-memory output pin for host simulation.
#[derive(Debug, Default)]
pub struct SimPin {
    high: bool,
}

impl SimPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_high(&self) -> bool {
        self.high
    }
}

impl ErrorType for SimPin {
    type Error = core::convert::Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.high = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.high = true;
        Ok(())
    }
}
