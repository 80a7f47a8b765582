//! Fuzz target: `LineDecoder::feed` + `Relay::handle_line`
//!
//! Drives arbitrary byte sequences through the relay's streaming line
//! decoder and asserts that it never panics, never yields a line longer
//! than its buffer, never yields a terminator, and recovers after a reset.
//!
//! cargo fuzz run fuzz_line_decoder

#![no_main]

use imu_tracker::relay::{LineDecoder, Relay, MAX_RELAY_LINE};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut decoder = LineDecoder::new();
    let mut relay = Relay::new();

    // Split the input at an arbitrary point to exercise partial reads.
    let split = data.first().map_or(0, |b| usize::from(*b)).min(data.len());
    let (head, tail) = data.split_at(split);

    for chunk in [head, tail] {
        decoder.feed(chunk, |line| {
            assert!(!line.is_empty(), "decoder must not yield empty lines");
            assert!(line.len() <= MAX_RELAY_LINE, "line exceeds buffer");
            assert!(!line.contains(&b'\n'), "line contains terminator");
            let _ = relay.handle_line(line);
        });
    }

    // After a reset the decoder must accept bytes cleanly again.
    decoder.reset();
    decoder.feed(b"{\"data\":{},\"status\":\"ready\"}\n", |line| {
        assert!(relay.handle_line(line).is_none());
    });
});
