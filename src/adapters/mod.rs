//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to                 |
//! |----------------|--------------------|-----------------------------|
//! | `hardware`     | SensorDevice       | IMU driver                  |
//! |                | IndicatorPort      | Liveness LED (GPIO)         |
//! | `serial_sink`  | StatusSink         | Encoder + Transport (UART)  |
//! | `sim_imu`      | SensorDevice       | Synthetic motion (no bus)   |
//! | `time`         | TimePort           | ESP32 system timer / host   |

pub mod hardware;
pub mod serial_sink;
pub mod sim_imu;
pub mod time;
