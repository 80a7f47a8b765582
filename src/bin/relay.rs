//! IMU relay — host companion for the tracker.
//!
//! Opens the tracker's serial port at 115200 8N1 (or reads the status
//! stream from stdin when no port is given) and forwards each telemetry
//! line as a 48-byte pose datagram over UDP.
//!
//! Usage:
//! ```bash
//! RUST_LOG=info imu-relay --port /dev/ttyUSB0 [target_addr]
//! RUST_LOG=info imu-relay [target_addr] < capture.log
//! ```
//! `target_addr` defaults to 127.0.0.1:4242.

#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    host::run()
}

// Host-only tool; firmware builds get an empty entry point.
#[cfg(target_os = "espidf")]
fn main() {}

#[cfg(not(target_os = "espidf"))]
mod host {
    use std::io::{ErrorKind, Read};
    use std::net::{SocketAddr, UdpSocket};
    use std::time::Duration;

    use anyhow::{bail, Context, Result};
    use log::{info, warn};

    use imu_tracker::relay::{LineDecoder, Relay};

    const DEFAULT_TARGET: &str = "127.0.0.1:4242";

    /// The tracker's UART console rate.
    const BAUD_RATE: u32 = 115_200;

    /// Read timeout on the serial port; a timeout just means no data yet.
    const READ_TIMEOUT: Duration = Duration::from_millis(100);

    #[derive(Debug, PartialEq, Eq)]
    pub(crate) struct Args {
        pub port: Option<String>,
        pub target: SocketAddr,
    }

    pub(crate) fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args> {
        let mut port = None;
        let mut target = None;
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            if arg == "--port" || arg == "-p" {
                port = Some(args.next().context("--port needs a device path")?);
            } else if arg.starts_with('-') {
                bail!("unknown option {arg}");
            } else if target.is_none() {
                target = Some(arg);
            } else {
                bail!("unexpected argument {arg}");
            }
        }
        let target = target
            .as_deref()
            .unwrap_or(DEFAULT_TARGET)
            .parse()
            .context("target_addr must be host:port")?;
        Ok(Args { port, target })
    }

    fn open_port(path: &str) -> Result<Box<dyn serialport::SerialPort>> {
        serialport::new(path, BAUD_RATE)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .timeout(READ_TIMEOUT)
            .open()
            .with_context(|| format!("opening serial port {path}"))
    }

    pub fn run() -> Result<()> {
        env_logger::init();

        let args = parse_args(std::env::args().skip(1))?;
        let socket = UdpSocket::bind("0.0.0.0:0").context("binding UDP socket")?;

        let (source, name): (Box<dyn Read>, String) = match &args.port {
            Some(path) => (Box::new(open_port(path)?), path.clone()),
            None => (Box::new(std::io::stdin().lock()), "stdin".to_string()),
        };
        info!("relaying {} -> udp://{}", name, args.target);

        let mut decoder = LineDecoder::new();
        let mut relay = Relay::new();
        pump(source, &mut decoder, &mut relay, |bytes| {
            if let Err(e) = socket.send_to(bytes, args.target) {
                warn!("send to {} failed: {}", args.target, e);
            }
        })
        .with_context(|| format!("reading {name}"))?;

        let stats = relay.stats();
        info!(
            "{} closed: {} lines, {} forwarded, {} skipped, {} malformed, {} overlong",
            name,
            stats.lines,
            stats.forwarded,
            stats.skipped,
            stats.malformed,
            decoder.overlong()
        );
        Ok(())
    }

    /// Read `source` to end of stream, handing each pose datagram to `send`.
    /// Read timeouts and interrupts are retried.
    pub(crate) fn pump(
        mut source: impl Read,
        decoder: &mut LineDecoder,
        relay: &mut Relay,
        mut send: impl FnMut(&[u8]),
    ) -> std::io::Result<()> {
        let mut buf = [0u8; 256];
        loop {
            let n = match source.read(&mut buf) {
                Ok(0) => return Ok(()),
                Ok(n) => n,
                Err(e) if matches!(e.kind(), ErrorKind::TimedOut | ErrorKind::Interrupted) => {
                    continue;
                }
                Err(e) => return Err(e),
            };
            decoder.feed(&buf[..n], |line| {
                if let Some(pose) = relay.handle_line(line) {
                    send(&pose.to_bytes());
                }
            });
        }
    }
}
