//! Tracker configuration parameters
//!
//! All lifecycle and sampling timings in one place.  There is no persistent
//! store; the compiled-in defaults are what the firmware runs with.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Core tracker configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    // --- Initialisation ---
    /// Delay between failed `begin()` attempts (milliseconds)
    pub init_retry_backoff_ms: u32,

    // --- Calibration ---
    /// Settle time before calibrating, sensor must be still (milliseconds)
    pub calibration_settle_ms: u32,
    /// Compute gyro offsets during calibration
    pub calibrate_gyro: bool,
    /// Compute accelerometer offsets during calibration
    pub calibrate_accel: bool,

    // --- Sampling ---
    /// Minimum spacing between telemetry messages (milliseconds)
    pub sample_interval_ms: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            init_retry_backoff_ms: 100,
            calibration_settle_ms: 1000,
            calibrate_gyro: true,
            calibrate_accel: true,
            sample_interval_ms: 1, // as fast as the loop runs, at most 1 kHz
        }
    }
}

impl TrackerConfig {
    /// Reject values that would turn the loop into a busy spin or a no-op.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.init_retry_backoff_ms == 0 {
            return Err(ConfigError::Invalid("init_retry_backoff_ms must be > 0"));
        }
        if self.sample_interval_ms == 0 {
            return Err(ConfigError::Invalid("sample_interval_ms must be > 0"));
        }
        if !self.calibrate_gyro && !self.calibrate_accel {
            return Err(ConfigError::Invalid(
                "calibration must cover gyro or accelerometer",
            ));
        }
        Ok(())
    }
}
