//! Host-side relay: serial status stream in, pose datagrams out.
//!
//! ```text
//!  bytes ──▶ LineDecoder ──▶ decode_line ──▶ Relay ──▶ PosePacket (48 B)
//!                 │                            │
//!          overlong → dropped       non-ready / malformed → skipped
//! ```
//!
//! The decoder accumulates incoming bytes and yields complete lines.  This
//! handles partial reads gracefully: a single read may return part of a
//! line or several lines concatenated.

use log::{debug, info, warn};

use crate::app::message::{StatusMessage, Telemetry};
use crate::codec::{decode_line, MAX_LINE_LEN};

/// Longest line the decoder keeps, terminator excluded.
pub const MAX_RELAY_LINE: usize = MAX_LINE_LEN;

/// Size of one pose datagram: six little-endian `f64`.
pub const POSE_PACKET_LEN: usize = 48;

// ---------------------------------------------------------------------------
// Line decoder
// ---------------------------------------------------------------------------

/// Streaming `\n`-delimited line decoder with a fixed buffer.
///
/// A line longer than [`MAX_RELAY_LINE`] is discarded up to its terminator;
/// decoding resumes cleanly with the next line.
pub struct LineDecoder {
    buf: heapless::Vec<u8, MAX_RELAY_LINE>,
    /// A `\r` seen but not yet stored; it is dropped if `\n` follows.
    pending_cr: bool,
    discarding: bool,
    overlong: u32,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self {
            buf: heapless::Vec::new(),
            pending_cr: false,
            discarding: false,
            overlong: 0,
        }
    }

    /// Feed bytes into the decoder, calling `on_line` once per complete,
    /// non-empty line with its `\r\n` or `\n` stripped.
    pub fn feed(&mut self, data: &[u8], mut on_line: impl FnMut(&[u8])) {
        for &byte in data {
            if byte == b'\n' {
                if self.discarding {
                    self.discarding = false;
                } else if !self.buf.is_empty() {
                    on_line(&self.buf);
                }
                self.buf.clear();
                self.pending_cr = false;
                continue;
            }

            if self.discarding {
                continue;
            }

            if self.pending_cr {
                self.pending_cr = false;
                self.push(b'\r');
                if self.discarding {
                    continue;
                }
            }

            if byte == b'\r' {
                self.pending_cr = true;
            } else {
                self.push(byte);
            }
        }
    }

    fn push(&mut self, byte: u8) {
        if self.buf.push(byte).is_err() {
            self.overlong = self.overlong.saturating_add(1);
            warn!("relay: line exceeds {} bytes, discarding", MAX_RELAY_LINE);
            self.discarding = true;
            self.buf.clear();
        }
    }

    /// Lines dropped for exceeding the buffer.
    pub fn overlong(&self) -> u32 {
        self.overlong
    }

    /// Forget any partial line (e.g. after the port is reopened).
    pub fn reset(&mut self) {
        self.buf.clear();
        self.pending_cr = false;
        self.discarding = false;
    }
}

impl Default for LineDecoder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Pose datagram
// ---------------------------------------------------------------------------

/// Pose forwarded to the consumer.
///
/// Wire layout, all `f64` little-endian:
/// ```text
/// ┌───┬───┬───┬─────┬───────┬──────┐
/// │ x │ y │ z │ yaw │ pitch │ roll │
/// └───┴───┴───┴─────┴───────┴──────┘
///   0   8  16   24     32     40
/// ```
/// The tracker has no position estimate, so `x`, `y` and `z` are zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PosePacket {
    pub position: [f64; 3],
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl PosePacket {
    /// Fused angles, degrees: `angleZ` → yaw, `angleY` → pitch,
    /// `angleX` → roll.
    pub fn from_telemetry(t: &Telemetry) -> Self {
        Self {
            position: [0.0; 3],
            yaw: f64::from(t.angle_z),
            pitch: f64::from(t.angle_y),
            roll: f64::from(t.angle_x),
        }
    }

    pub fn to_bytes(&self) -> [u8; POSE_PACKET_LEN] {
        let mut out = [0u8; POSE_PACKET_LEN];
        let values = [
            self.position[0],
            self.position[1],
            self.position[2],
            self.yaw,
            self.pitch,
            self.roll,
        ];
        for (chunk, v) in out.chunks_exact_mut(8).zip(values) {
            chunk.copy_from_slice(&v.to_le_bytes());
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Relay
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStats {
    pub lines: u64,
    pub forwarded: u64,
    /// Valid lines that carry no telemetry (lifecycle or bare ready).
    pub skipped: u64,
    pub malformed: u64,
}

/// Turns decoded lines into pose packets.
#[derive(Default)]
pub struct Relay {
    stats: RelayStats,
}

impl Relay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle one line.  Returns the packet to forward, if any.
    pub fn handle_line(&mut self, line: &[u8]) -> Option<PosePacket> {
        self.stats.lines += 1;

        let Ok(text) = core::str::from_utf8(line) else {
            self.stats.malformed += 1;
            debug!("relay: non-UTF-8 line skipped");
            return None;
        };

        let msg = match decode_line(text) {
            Ok(msg) => msg,
            Err(e) => {
                self.stats.malformed += 1;
                debug!("relay: {}: {}", e, text);
                return None;
            }
        };

        match msg {
            StatusMessage::Ready(Some(t)) => {
                self.stats.forwarded += 1;
                Some(PosePacket::from_telemetry(&t))
            }
            StatusMessage::Initialising { begin_status } | StatusMessage::Error { begin_status } => {
                self.stats.skipped += 1;
                info!(
                    "tracker: {} (mpu_begin_status={})",
                    msg.status().as_str(),
                    begin_status
                );
                None
            }
            StatusMessage::Calibrating | StatusMessage::Ready(None) => {
                self.stats.skipped += 1;
                info!("tracker: {}", msg.status().as_str());
                None
            }
        }
    }

    pub fn stats(&self) -> RelayStats {
        self.stats
    }
}
